pub mod connector;
pub mod image;
pub mod machine;
pub mod runner;

pub use connector::*;
pub use image::*;
pub use machine::*;
pub use runner::*;

use crate::errors::{ApiError, ConsoleError};
use tracing::{error, warn};

/// Logs `err` at a level matching its cause and converts it for the client.
pub(crate) fn api_error(context: &str, err: ConsoleError) -> ApiError {
    match &err {
        ConsoleError::NotFound { .. }
        | ConsoleError::InvalidState(_)
        | ConsoleError::Validation(_)
        | ConsoleError::InvalidInput(_) => warn!("{}: {}", context, err),
        _ => error!("{}: {}", context, err),
    }
    ApiError::from(err)
}
