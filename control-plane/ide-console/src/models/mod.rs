pub mod filters;
pub mod page;
pub mod responses;

pub use filters::*;
pub use page::*;
pub use responses::*;
