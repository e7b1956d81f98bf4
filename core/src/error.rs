use thiserror::Error;

use crate::key::Key;

/// Errors raised while mounting, replacing or re-rendering elements.
///
/// Every error is raised at the call site; nothing already attached to the
/// host document is rolled back when a rendering pass aborts halfway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlexError {
    /// An attach was attempted without a parent element.
    #[error("parent doesn't exist")]
    MissingParent,
    /// An attach was attempted without a child element.
    #[error("child doesn't exist")]
    MissingChild,
    /// A replace addressed a key that was never registered.
    #[error("no node is registered under key `{0}`")]
    UnknownKey(Key),
    /// The bootstrap selector matched nothing in the host document.
    #[error("no element matches root selector `{0}`")]
    RootNotFound(String),
    /// The registry that owned a state container has been dropped.
    #[error("no active registry")]
    NoActiveRegistry,
    /// The random key strategy kept drawing keys that are already in use.
    #[error("could not draw an unused key after {attempts} attempts")]
    KeyCollision {
        /// Number of draws that were made.
        attempts: usize,
    },
    /// The host document rejected an operation.
    #[error("host error: {0}")]
    Host(String),
}

impl FlexError {
    /// Wraps a host-side failure message.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

/// Result type used across the crate.
pub type Result<T, E = FlexError> = core::result::Result<T, E>;
