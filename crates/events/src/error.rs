use bugboard_core::error::CoreError;
use bugboard_db::StoreError;

/// Failures raised by the event log and the notification dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EventsResult<T> = Result<T, EventsError>;
