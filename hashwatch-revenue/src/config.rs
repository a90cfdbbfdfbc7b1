// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Module configuration.
//!
//! The JSON shape mirrors what a dashboard layout file carries for one
//! widget:
//!
//! ```json
//! { "miner": ["rig-1", "rig-2"], "market": "nmc-usd", "technical": "nmc-net", "title": "Rigs" }
//! ```
//!
//! `miner` accepts a single identifier or a list. Every source is optional;
//! an absent source is simply never subscribed to.

use crate::Interval;
use hashwatch_core::Payload;
use hashwatch_error::{HashwatchError, IntoHashwatchError, Result, ResultExt};
use serde::{Deserialize, Serialize};

/// One or many miner identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinerIds {
    One(String),
    Many(Vec<String>),
}

impl MinerIds {
    /// Identifiers in configuration order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let ids: &[String] = match self {
            Self::One(id) => core::slice::from_ref(id),
            Self::Many(ids) => ids,
        };
        ids.iter().map(String::as_str)
    }
}

impl From<&str> for MinerIds {
    fn from(id: &str) -> Self {
        Self::One(id.to_string())
    }
}

impl From<String> for MinerIds {
    fn from(id: String) -> Self {
        Self::One(id)
    }
}

impl<S: Into<String>> FromIterator<S> for MinerIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Many(iter.into_iter().map(Into::into).collect())
    }
}

/// Configuration consumed when a revenue module is constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner: Option<MinerIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<String>,
    /// Widget label; absent or empty falls back to the engine's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub interval: Interval,
    /// Pool fee as a fraction in `[0, 1)`. Only the pool engine reads it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
}

impl RevenueConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::Config`] if the text is not a valid
    /// configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(IntoHashwatchError::into_hashwatch)
            .context("revenue config")?;
        config.validate()?;
        Ok(config)
    }

    /// Builds and validates a configuration from an already parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::Config`] if the value is not a valid
    /// configuration.
    pub fn from_value(value: &Payload) -> Result<Self> {
        let config = Self::deserialize(value)
            .map_err(IntoHashwatchError::into_hashwatch)
            .context("revenue config")?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_miner(mut self, id: impl Into<String>) -> Self {
        self.miner = Some(MinerIds::One(id.into()));
        self
    }

    #[must_use]
    pub fn with_miners<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.miner = Some(ids.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_market(mut self, id: impl Into<String>) -> Self {
        self.market = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_technical(mut self, id: impl Into<String>) -> Self {
        self.technical = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = Some(fee);
        self
    }

    /// The configured title, if it is non-empty.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }

    /// Checks identifiers and the fee.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::Config`] for empty identifiers or a fee
    /// outside `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        let named = [("market", self.market.as_deref()), ("technical", self.technical.as_deref())];

        if self.miner.iter().flat_map(|ids| ids.iter()).any(str::is_empty) {
            return Err(HashwatchError::config("miner identifiers must not be empty"));
        }
        for (role, id) in named {
            if id.is_some_and(str::is_empty) {
                return Err(HashwatchError::config(format!("{role} identifier must not be empty")));
            }
        }
        if let Some(fee) = self.fee {
            if !(0.0..1.0).contains(&fee) {
                return Err(HashwatchError::config(format!(
                    "fee must be a fraction in [0, 1), got {fee}"
                )));
            }
        }
        Ok(())
    }
}
