// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Topic names used on the event bus.
//!
//! Data feeds publish on `update:data:<sourceId>`; a computing module
//! publishes its aggregate result on the bare `update:data` topic.
//! Subscribers register per exact topic string, so `update:data` never
//! receives per-source updates and vice versa.

use core::fmt;
use hashwatch_error::{HashwatchError, Result};

/// Topic on which aggregate results are published.
pub const UPDATE_DATA: &str = "update:data";

const SOURCE_SEPARATOR: char = ':';

/// An exact-match topic name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Topic(String);

impl Topic {
    /// Builds a topic from arbitrary text.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::InvalidTopic`] for empty names or names
    /// containing whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(HashwatchError::invalid_topic(name, "topic must not be empty"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(HashwatchError::invalid_topic(
                name,
                "topic must not contain whitespace",
            ));
        }
        Ok(Self(name))
    }

    /// The per-source update topic `update:data:<source_id>`.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::InvalidTopic`] if `source_id` is empty or
    /// contains whitespace.
    pub fn data_update(source_id: &str) -> Result<Self> {
        if source_id.is_empty() {
            return Err(HashwatchError::invalid_topic(
                format!("{UPDATE_DATA}{SOURCE_SEPARATOR}"),
                "source identifier must not be empty",
            ));
        }
        Self::new(format!("{UPDATE_DATA}{SOURCE_SEPARATOR}{source_id}"))
    }

    /// The aggregate output topic `update:data`.
    #[must_use]
    pub fn aggregate() -> Self {
        Self(UPDATE_DATA.to_string())
    }

    /// The source identifier of a per-source update topic, if this is one.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.0
            .strip_prefix(UPDATE_DATA)
            .and_then(|rest| rest.strip_prefix(SOURCE_SEPARATOR))
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
