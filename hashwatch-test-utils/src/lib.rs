// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for Hashwatch.
//!
//! This crate is for development and testing only.
//!
//! # Key Types
//!
//! - [`fixtures`] - payloads for miners, market quotes and network parameters,
//!   including the reference quote (`ask 100 NMC`) and network
//!   (`10 coins/block, p = 0.0001`) under which one normalized unit of
//!   hashrate earns exactly 8640 NMC per day
//! - [`ResultRecorder`] - collects every result a module publishes
//! - [`helpers`] - publishing shortcuts and float assertions
//!
//! # Example
//!
//! ```rust
//! use hashwatch_core::LocalBus;
//! use hashwatch_revenue::{RevenueConfig, SoloRevenue};
//! use hashwatch_test_utils::fixtures::{market_nmc, miner_hashrate, technical_reference};
//! use hashwatch_test_utils::helpers::publish_data;
//! use hashwatch_test_utils::ResultRecorder;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(LocalBus::new());
//! let config = RevenueConfig::new().with_miner("m").with_market("p").with_technical("t");
//! let module = SoloRevenue::new(bus.clone(), config).unwrap();
//! let recorder = ResultRecorder::attach(&module);
//!
//! publish_data(&*bus, "p", market_nmc());
//! publish_data(&*bus, "t", technical_reference());
//! publish_data(&*bus, "m", miner_hashrate(1e-6));
//!
//! assert_eq!(recorder.count(), 3);
//! assert_eq!(recorder.last().unwrap().value, 8640.0);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fixtures;
pub mod helpers;
pub mod recorder;

pub use helpers::{assert_approx_eq, publish_data};
pub use recorder::ResultRecorder;
