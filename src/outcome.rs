//! Results returned by lifecycle operations.

use thiserror::Error;

/// Non-terminal outcome of a lifecycle operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The operation finished; the orchestrator may move on.
    Complete,
    /// Provider state blocks the transition; re-invoke the same call later.
    Retry {
        /// Why the retry was requested.
        message: String,
    },
}

impl Outcome {
    pub(crate) fn retry(message: impl Into<String>) -> Self {
        Self::Retry {
            message: message.into(),
        }
    }
}

/// Terminal failure of a lifecycle operation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LifecycleError {
    /// Node configuration contradicts provider reality or is incomplete.
    #[error("{0}")]
    Validation(String),
    /// The operation needs a provider id that was never recorded.
    #[error("cannot {action}: instance has no recorded resource id")]
    MissingResourceId {
        /// Operation that required the id (for example `attach volume`).
        action: String,
    },
    /// The provider rejected a call; its message is kept verbatim.
    #[error("{message}")]
    Provider {
        /// Message returned by the provider.
        message: String,
    },
}

impl LifecycleError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Stable name of the error kind, used in reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::MissingResourceId { .. } => "missing_resource_id",
            Self::Provider { .. } => "provider",
        }
    }
}

/// Result of a lifecycle operation.
pub type LifecycleResult = Result<Outcome, LifecycleError>;
