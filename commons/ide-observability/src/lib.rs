pub mod health;
pub mod tracing;

pub use health::*;
pub use self::tracing::*;
