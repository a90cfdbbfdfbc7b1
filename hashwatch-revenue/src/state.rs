// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Aggregation state: the latest snapshot of every source a module tracks.

use crate::{MarketSnapshot, MinerSnapshot, SourceRole, TechnicalSnapshot};
use hashwatch_core::{decode, Payload, Topic};
use hashwatch_error::Result;
use std::collections::HashMap;

/// A decoded update for one source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceUpdate {
    Miner { id: String, snapshot: MinerSnapshot },
    Market(MarketSnapshot),
    Technical(TechnicalSnapshot),
}

impl SourceUpdate {
    /// Decodes `payload` as the snapshot expected for `role`.
    ///
    /// # Errors
    ///
    /// Returns a malformed payload error if the payload does not have the
    /// shape of the role's snapshot. Market and technical payloads must carry
    /// every field; miner payloads only need to be an object.
    pub fn decode(role: &SourceRole, topic: &Topic, payload: &Payload) -> Result<Self> {
        Ok(match role {
            SourceRole::Miner(id) => Self::Miner {
                id: id.clone(),
                snapshot: decode(topic, role.kind(), payload)?,
            },
            SourceRole::Market => Self::Market(decode(topic, role.kind(), payload)?),
            SourceRole::Technical => Self::Technical(decode(topic, role.kind(), payload)?),
        })
    }
}

/// Latest known snapshots for one module.
///
/// The set of tracked miners is fixed at construction; updates for any
/// other miner id are ignored. Totals are summed in tracking order, so the
/// result depends only on which snapshots are present, never on the order
/// they arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationState {
    tracked: Vec<String>,
    miners: HashMap<String, MinerSnapshot>,
    market: Option<MarketSnapshot>,
    technical: Option<TechnicalSnapshot>,
}

impl AggregationState {
    /// Empty state tracking `miner_ids`. Duplicate ids are tracked once.
    pub fn new<I, S>(miner_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracked: Vec<String> = Vec::new();
        for id in miner_ids {
            let id = id.into();
            if !tracked.contains(&id) {
                tracked.push(id);
            }
        }
        Self {
            tracked,
            ..Self::default()
        }
    }

    /// Replaces the snapshot addressed by `update`.
    ///
    /// Returns `false` only for a miner this state does not track.
    pub fn apply(&mut self, update: SourceUpdate) -> bool {
        match update {
            SourceUpdate::Miner { id, snapshot } => {
                if !self.tracked.contains(&id) {
                    return false;
                }
                self.miners.insert(id, snapshot);
            }
            SourceUpdate::Market(snapshot) => self.market = Some(snapshot),
            SourceUpdate::Technical(snapshot) => self.technical = Some(snapshot),
        }
        true
    }

    #[must_use]
    pub fn tracked_miners(&self) -> &[String] {
        &self.tracked
    }

    #[must_use]
    pub fn miner(&self, id: &str) -> Option<&MinerSnapshot> {
        self.miners.get(id)
    }

    #[must_use]
    pub const fn market(&self) -> Option<&MarketSnapshot> {
        self.market.as_ref()
    }

    #[must_use]
    pub const fn technical(&self) -> Option<&TechnicalSnapshot> {
        self.technical.as_ref()
    }

    /// Sum of contributions of tracked miners, in feed units.
    ///
    /// Missing snapshots and disconnected miners contribute zero.
    #[must_use]
    pub fn total_hashrate(&self) -> f64 {
        self.tracked
            .iter()
            .filter_map(|id| self.miners.get(id))
            .map(MinerSnapshot::contribution)
            .sum()
    }
}
