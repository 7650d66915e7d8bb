pub mod connector;
pub mod ids;
pub mod image;
pub mod lifecycle;
pub mod machine;
pub mod runner;
pub mod search;

pub use connector::*;
pub use image::*;
pub use lifecycle::*;
pub use machine::*;
pub use runner::*;
pub use search::*;
