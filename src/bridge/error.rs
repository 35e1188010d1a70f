use std::error::Error;
use thiserror::Error;

/// Result alias for collaborator boundary calls.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error raised by bridge clients regardless of the underlying transport.
///
/// Classification callers treat every variant identically: the collaborator
/// gave no usable answer and the next fallback rung applies. Only the
/// daltonizer path surfaces these to the user.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The request never produced a response (connection refused, timeout).
    #[error("collaborator unreachable at `{endpoint}`: {message}")]
    Transport {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Short transport-level description.
        message: String,
        /// Underlying transport failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The collaborator answered with a non-success status.
    #[error("collaborator call `{endpoint}` failed with status {status}")]
    Status {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Status code reported by the collaborator.
        status: u16,
    },
    /// The response body could not be parsed into the expected payload.
    #[error("collaborator payload from `{endpoint}` is malformed")]
    MalformedPayload {
        /// Endpoint path that was being called.
        endpoint: String,
        /// Underlying decode failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl BridgeError {
    /// Construct a transport error from any underlying failure.
    pub fn transport(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        BridgeError::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Construct a malformed-payload error from a decode failure.
    pub fn malformed(
        endpoint: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        BridgeError::MalformedPayload {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}
