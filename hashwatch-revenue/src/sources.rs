// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Resolution of configured source identifiers into bus subscriptions.
//!
//! Each distinct topic is subscribed exactly once. When one identifier serves
//! several roles (a miner id reused as the market id, or a miner listed
//! twice) the roles are folded into the single binding for that topic.
//! A payload on such a topic updates every role it decodes for; the roles it
//! does not fit are reported as malformed without holding back the others.

use crate::RevenueConfig;
use core::fmt;
use hashwatch_core::Topic;
use hashwatch_error::Result;

/// The logical source a topic feeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceRole {
    Miner(String),
    Market,
    Technical,
}

impl SourceRole {
    /// Short name used in logs and errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Miner(_) => "miner",
            Self::Market => "market",
            Self::Technical => "technical",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miner(id) => write!(f, "miner '{id}'"),
            other => f.write_str(other.kind()),
        }
    }
}

/// One subscription: a topic and every role it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBinding {
    pub topic: Topic,
    pub roles: Vec<SourceRole>,
}

/// All subscriptions derived from a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBindings {
    bindings: Vec<SourceBinding>,
    miner_ids: Vec<String>,
}

impl SourceBindings {
    /// Resolves the topics for `config`: miners in configuration order, then
    /// market, then technical.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn resolve(config: &RevenueConfig) -> Result<Self> {
        config.validate()?;

        let mut resolved = Self::default();

        for id in config.miner.iter().flat_map(|ids| ids.iter()) {
            if !resolved.miner_ids.iter().any(|known| known == id) {
                resolved.miner_ids.push(id.to_string());
            }
            resolved.bind(id, SourceRole::Miner(id.to_string()))?;
        }
        if let Some(id) = config.market.as_deref() {
            resolved.bind(id, SourceRole::Market)?;
        }
        if let Some(id) = config.technical.as_deref() {
            resolved.bind(id, SourceRole::Technical)?;
        }

        Ok(resolved)
    }

    fn bind(&mut self, source_id: &str, role: SourceRole) -> Result<()> {
        let topic = Topic::data_update(source_id)?;
        match self.bindings.iter_mut().find(|b| b.topic == topic) {
            Some(binding) => {
                if !binding.roles.contains(&role) {
                    binding.roles.push(role);
                }
            }
            None => self.bindings.push(SourceBinding {
                topic,
                roles: vec![role],
            }),
        }
        Ok(())
    }

    #[must_use]
    pub fn bindings(&self) -> &[SourceBinding] {
        &self.bindings
    }

    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.bindings.iter().map(|b| &b.topic)
    }

    /// Distinct miner identifiers, in configuration order.
    #[must_use]
    pub fn miner_ids(&self) -> &[String] {
        &self.miner_ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
