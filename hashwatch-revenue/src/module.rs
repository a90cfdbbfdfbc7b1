// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reactive revenue module.
//!
//! A [`RevenueModule`] subscribes to the per-source update topics named by
//! its configuration, keeps the latest snapshot of each source and, after
//! every accepted update, publishes one freshly computed
//! [`RevenueResult`](crate::RevenueResult) on `update:data`.
//!
//! Nothing is computed at construction: the first result follows the first
//! accepted update.
//!
//! ## Accepting updates
//!
//! - A payload is decoded for every role bound to its topic. Roles that
//!   decode are applied; the roles that fail are reported back to the
//!   publisher as [`MalformedPayload`](hashwatch_error::HashwatchError::MalformedPayload).
//!   When no role decodes the state is left untouched and nothing is
//!   published.
//! - An update whose result would not be a finite number is rejected whole
//!   with [`NonFiniteResult`](hashwatch_error::HashwatchError::NonFiniteResult),
//!   and the previous state stays in place.
//! - Once an update is applied it is accepted. Failures while publishing the
//!   result on the output bus are logged and never reported to the inbound
//!   publisher.
//!
//! ## Example
//!
//! ```
//! use hashwatch_core::{EventBus, LocalBus, Topic};
//! use hashwatch_revenue::{RevenueConfig, SoloRevenue};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(LocalBus::new());
//! let config = RevenueConfig::new()
//!     .with_miner("rig")
//!     .with_market("market")
//!     .with_technical("network");
//! let module = SoloRevenue::new(bus.clone(), config).unwrap();
//!
//! bus.publish(&Topic::data_update("network").unwrap(), &json!({ "btcPerBlock": 10.0, "probability": 0.0001 })).unwrap();
//! bus.publish(&Topic::data_update("market").unwrap(), &json!({ "ask": 100.0, "currency": "NMC" })).unwrap();
//! bus.publish(&Topic::data_update("rig").unwrap(), &json!({ "avgHashrate": 1e-6 })).unwrap();
//!
//! let latest = module.latest().unwrap();
//! assert_eq!(latest.value, 8640.0);
//! assert_eq!(latest.currency, "NMC");
//! assert_eq!(latest.interval, "Day");
//! ```

use crate::logging::{debug, warn};
use crate::{
    AggregationState, PoolEngine, RecomputeEngine, RevenueConfig, RevenueResult, SoloEngine,
    SourceBindings, SourceRole, SourceUpdate,
};
use hashwatch_core::{
    encode, handler, EventBus, LocalBus, Payload, PayloadStream, SubscriptionId, Topic,
    TopicSubject,
};
use hashwatch_error::{HashwatchError, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Solo-mining revenue widget.
pub type SoloRevenue = RevenueModule<SoloEngine>;

/// Pool-mining revenue widget.
pub type PoolRevenue = RevenueModule<PoolEngine>;

struct ModuleCore<E> {
    title: String,
    engine: E,
    state: Mutex<AggregationState>,
    latest: Mutex<Option<RevenueResult>>,
    output: Arc<dyn EventBus>,
    output_topic: Topic,
    results: TopicSubject,
}

impl<E: RecomputeEngine> ModuleCore<E> {
    /// Applies one inbound payload and publishes the recomputed result.
    fn accept(&self, topic: &Topic, roles: &[SourceRole], payload: &Payload) -> Result<()> {
        let mut updates = Vec::with_capacity(roles.len());
        let mut rejected = None;
        for role in roles {
            match SourceUpdate::decode(role, topic, payload) {
                Ok(update) => updates.push(update),
                Err(e) => {
                    warn!("'{}' rejected {} update on '{}': {}", self.title, role, topic, e);
                    rejected.get_or_insert(e);
                }
            }
        }
        if updates.is_empty() {
            return rejected.map_or(Ok(()), Err);
        }

        let result = {
            let mut state = self.state.lock();
            let mut next = state.clone();
            for update in updates {
                next.apply(update);
            }

            let result = self.engine.recompute(&next);
            if !result.value.is_finite() {
                warn!(
                    "'{}' rejected update on '{}': result {} is not finite",
                    self.title, topic, result.value
                );
                return Err(HashwatchError::non_finite_result(topic.as_str(), result.value));
            }

            *state = next;
            *self.latest.lock() = Some(result.clone());
            result
        };

        self.emit(&result);
        rejected.map_or(Ok(()), Err)
    }

    fn emit(&self, result: &RevenueResult) {
        let payload = match encode(result) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("'{}' could not encode its result: {}", self.title, e);
                return;
            }
        };

        if let Err(e) = self.output.publish(&self.output_topic, &payload) {
            warn!("'{}' output on '{}' failed: {}", self.title, self.output_topic, e);
        }
        // Closed once the module is detached.
        let _ = self.results.send(&payload);
    }
}

/// A reactive revenue widget parameterized by its revenue model.
pub struct RevenueModule<E: RecomputeEngine = SoloEngine> {
    core: Arc<ModuleCore<E>>,
    inbound: Arc<dyn EventBus>,
    bindings: SourceBindings,
    subscriptions: Vec<SubscriptionId>,
}

impl<E: RecomputeEngine> RevenueModule<E> {
    /// Creates a module that publishes on a private output bus, reachable
    /// through [`events`](Self::events).
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid configuration, or the
    /// inbound bus's subscription error.
    pub fn new(bus: Arc<dyn EventBus>, config: RevenueConfig) -> Result<Self> {
        Self::with_output(bus, Arc::new(LocalBus::new()), config)
    }

    /// Creates a module that publishes its results on `output`.
    ///
    /// `output` may be the inbound bus itself.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_output(
        bus: Arc<dyn EventBus>,
        output: Arc<dyn EventBus>,
        config: RevenueConfig,
    ) -> Result<Self> {
        let engine = E::from_config(&config)?;
        Self::with_engine(bus, output, config, engine)
    }

    /// Creates a module around an already built engine.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn with_engine(
        bus: Arc<dyn EventBus>,
        output: Arc<dyn EventBus>,
        config: RevenueConfig,
        engine: E,
    ) -> Result<Self> {
        let bindings = SourceBindings::resolve(&config)?;
        let title = config
            .title()
            .unwrap_or_else(|| engine.default_title())
            .to_string();

        let core = Arc::new(ModuleCore {
            title,
            engine,
            state: Mutex::new(AggregationState::new(bindings.miner_ids().iter().cloned())),
            latest: Mutex::new(None),
            output,
            output_topic: Topic::aggregate(),
            results: TopicSubject::new(),
        });

        let mut module = Self {
            core,
            inbound: bus,
            bindings,
            subscriptions: Vec::new(),
        };
        module.attach()?;
        Ok(module)
    }

    fn attach(&mut self) -> Result<()> {
        for binding in self.bindings.bindings() {
            let core = Arc::clone(&self.core);
            let roles = binding.roles.clone();
            let id = self.inbound.subscribe(
                &binding.topic,
                handler(move |topic, payload| core.accept(topic, &roles, payload)),
            )?;
            self.subscriptions.push(id);
        }

        debug!(
            "'{}' subscribed to {} topic(s)",
            self.core.title,
            self.subscriptions.len()
        );
        Ok(())
    }

    /// Label shown by the rendering layer.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.core.title
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.core.engine
    }

    /// The most recently published result, if any update was accepted yet.
    #[must_use]
    pub fn latest(&self) -> Option<RevenueResult> {
        self.core.latest.lock().clone()
    }

    /// A copy of the current aggregation state.
    #[must_use]
    pub fn state(&self) -> AggregationState {
        self.core.state.lock().clone()
    }

    /// Topics this module is subscribed to.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.bindings.topics()
    }

    /// Bus the results are published on.
    #[must_use]
    pub fn events(&self) -> Arc<dyn EventBus> {
        Arc::clone(&self.core.output)
    }

    #[must_use]
    pub fn output_topic(&self) -> &Topic {
        &self.core.output_topic
    }

    /// A stream of every result this module publishes from now on, as
    /// payloads. The stream ends when the module is detached or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`HashwatchError::SubjectClosed`] once the module is detached.
    pub fn results(&self) -> Result<PayloadStream> {
        self.core.results.subscribe()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Unsubscribes every inbound handler and ends every
    /// [`results`](Self::results) stream. Later inbound updates are ignored.
    ///
    /// Detaching twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first unsubscribe error; the remaining handlers are still
    /// removed.
    pub fn detach(&mut self) -> Result<()> {
        let mut first_error = None;
        for id in self.subscriptions.drain(..) {
            if let Err(e) = self.inbound.unsubscribe(id) {
                first_error.get_or_insert(e);
            }
        }
        self.core.results.close();
        debug!("'{}' detached", self.core.title);
        first_error.map_or(Ok(()), Err)
    }
}

impl<E: RecomputeEngine> Drop for RevenueModule<E> {
    fn drop(&mut self) {
        if self.is_attached() {
            if let Err(e) = self.detach() {
                warn!("'{}' failed to detach on drop: {}", self.core.title, e);
            }
        }
        self.core.results.close();
    }
}
