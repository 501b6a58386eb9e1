/// A marker type to indicate that an operation timed out.
#[derive(Debug, thiserror::Error)]
#[error("timed out")]
pub struct TimedOut;

/// A marker type to indicate that an operation was canceled.
#[derive(Debug, thiserror::Error)]
#[error("operation canceled")]
pub struct OperationCanceled;

/// A marker type to indicate that a streamed request body was already sent
/// by an earlier execution of the same options.
#[derive(Debug, thiserror::Error)]
#[error("body stream already consumed")]
pub struct ConsumedBody;
