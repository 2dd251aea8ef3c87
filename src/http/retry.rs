//! Classification of failed transport attempts.

use log::warn;

use crate::error::FetchError;
use crate::transport::{TransportError, TransportErrorKind};

/// Default number of attempts for retrying operations.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Failure shapes treated as a missing or dropped network path.
pub const TRANSIENT_KINDS: [TransportErrorKind; 3] = [
    TransportErrorKind::Connect,
    TransportErrorKind::ConnectionLost,
    TransportErrorKind::Request,
];

pub fn is_transient(failure: &TransportError) -> bool {
    TRANSIENT_KINDS.contains(&failure.kind)
}

/// Turns a failed attempt into the error the caller sees.
///
/// Transient failures become [`FetchError::Network`] (the original failure is
/// only logged). Everything else is passed through as [`FetchError::Transport`].
pub fn classify_failure(failure: TransportError) -> FetchError {
    if is_transient(&failure) {
        warn!("Network failure ({:?}): {}", failure.kind, failure);
        FetchError::network(1)
    } else {
        FetchError::Transport(failure)
    }
}
