#![allow(clippy::multiple_crate_versions)]
//! Error types for the Hashwatch workspace
//!
//! This crate provides the error handling system shared by the event bus, the
//! revenue modules and their configuration layer. It defines a root
//! [`HashwatchError`] type with one variant per failure mode.
//!
//! Missing data is never an error in Hashwatch: a module that has not yet seen
//! a market quote simply reports a zero value. Errors are reserved for
//! payloads that cannot be decoded, invalid configuration and bus misuse.
//!
//! # Examples
//!
//! ```
//! use hashwatch_error::{HashwatchError, Result};
//!
//! fn resolve(id: &str) -> Result<()> {
//!     if id.is_empty() {
//!         return Err(HashwatchError::config("source identifier must not be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(resolve("").is_err());
//! ```

/// Root error type for all Hashwatch operations
#[derive(Debug, thiserror::Error)]
pub enum HashwatchError {
    /// A topic name could not be built or parsed
    #[error("Invalid topic '{topic}': {reason}")]
    InvalidTopic {
        /// The offending topic text
        topic: String,
        /// Why it was rejected
        reason: String,
    },

    /// Module configuration is unusable
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// A payload received on a topic did not decode into the snapshot
    /// expected for that topic
    ///
    /// The receiving module leaves its state untouched when this happens.
    #[error("Malformed {source_kind} payload on '{topic}': {reason}")]
    MalformedPayload {
        /// Topic the payload arrived on
        topic: String,
        /// Logical source the payload was decoded for (miner, market, technical)
        source_kind: String,
        /// Decoder message
        reason: String,
    },

    /// An update would have produced a result that is not a finite number
    ///
    /// The update is not applied; the previous state and result stay in place.
    #[error("Update on '{topic}' produced a non-finite result ({value})")]
    NonFiniteResult {
        /// Topic of the rejected update
        topic: String,
        /// The computed value
        value: f64,
    },

    /// An unsubscribe referred to a subscription the bus does not know
    #[error("Unknown subscription id {id}")]
    UnknownSubscription {
        /// The id that was not found
        id: u64,
    },

    /// The subject has been closed and cannot accept new items or subscribers
    #[error("Subject is closed")]
    SubjectClosed,

    /// One or more handlers failed while a payload was being delivered
    ///
    /// Delivery continues to the remaining handlers; the failures are
    /// collected and returned to the publisher.
    #[error("{count} handler(s) failed on '{topic}'")]
    HandlerFailures {
        /// Topic that was being published
        topic: String,
        /// Number of failed handlers
        count: usize,
        /// The individual failures
        errors: Vec<HashwatchError>,
    },

    /// Custom error from user code
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HashwatchError {
    /// Create an invalid topic error
    pub fn invalid_topic(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTopic {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with the given message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a malformed payload error
    pub fn malformed_payload(
        topic: impl Into<String>,
        source_kind: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedPayload {
            topic: topic.into(),
            source_kind: source_kind.into(),
            reason: reason.into(),
        }
    }

    /// Create a non-finite result error
    pub fn non_finite_result(topic: impl Into<String>, value: f64) -> Self {
        Self::NonFiniteResult {
            topic: topic.into(),
            value,
        }
    }

    /// Collect handler failures raised while publishing on `topic`
    pub fn handler_failures(topic: impl Into<String>, errors: Vec<HashwatchError>) -> Self {
        Self::HandlerFailures {
            topic: topic.into(),
            count: errors.len(),
            errors,
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Check if this is a recoverable error
    ///
    /// A rejected payload is transient: the next well-formed update for the
    /// same source is accepted normally.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::MalformedPayload { .. } | Self::NonFiniteResult { .. } => true,
            Self::HandlerFailures { errors, .. } => errors.iter().all(Self::is_recoverable),
            _ => false,
        }
    }

    /// Check if this error indicates a permanent failure
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidTopic { .. } | Self::SubjectClosed
        )
    }
}

/// Specialized Result type for Hashwatch operations
pub type Result<T> = std::result::Result<T, HashwatchError>;

/// Extension trait for converting foreign errors into `HashwatchError`
pub trait IntoHashwatchError {
    /// Convert this error into a `HashwatchError`
    fn into_hashwatch(self) -> HashwatchError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoHashwatchError for E {
    fn into_hashwatch(self) -> HashwatchError {
        HashwatchError::user_error(self)
    }
}

/// Helper trait for adding configuration context to `Result`s
///
/// User errors are rewritten into [`HashwatchError::Config`] carrying the
/// context; every other variant passes through untouched.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(HashwatchError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(HashwatchError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<HashwatchError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            HashwatchError::UserError(inner) => HashwatchError::Config {
                message: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}
