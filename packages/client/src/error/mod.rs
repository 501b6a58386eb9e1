pub mod classification;
pub mod constructors;
pub mod helpers;
pub mod types;

pub use constructors::*;
pub use helpers::{ConsumedBody, OperationCanceled, TimedOut};
pub use types::{AbortReason, Cause, Error, ErrorBody, Kind, Result};

pub(crate) use constructors::BoxError;
