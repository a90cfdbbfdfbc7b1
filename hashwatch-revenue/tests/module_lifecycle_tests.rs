// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use hashwatch_core::{EventBus, HashwatchError, LocalBus, Topic};
use hashwatch_revenue::{
    MarketSnapshot, MinerSnapshot, PoolRevenue, RevenueConfig, RevenueResult, SoloRevenue,
};
use hashwatch_test_utils::fixtures::{
    daily, market_nmc, miner_hashrate, single_miner_config, technical_reference, MARKET_ID,
    MINER_ID, REFERENCE_DAILY_VALUE, TECHNICAL_ID,
};
use hashwatch_test_utils::helpers::try_publish_data;
use hashwatch_test_utils::{assert_approx_eq, publish_data, ResultRecorder};
use serde_json::json;
use std::sync::Arc;

fn primed(bus: &LocalBus) {
    publish_data(bus, MARKET_ID, market_nmc());
    publish_data(bus, TECHNICAL_ID, technical_reference());
    publish_data(bus, MINER_ID, miner_hashrate(1e-6));
}

#[test]
fn malformed_market_payload_is_rejected() {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    let recorder = ResultRecorder::attach(&module);
    primed(&bus);
    recorder.clear();

    let err = try_publish_data(&*bus, MARKET_ID, json!({ "ask": "a lot" })).unwrap_err();

    assert!(matches!(err, HashwatchError::HandlerFailures { count: 1, .. }));
    assert!(err.is_recoverable());
    assert_eq!(recorder.count(), 0);
    assert_eq!(
        module.state().market(),
        Some(&MarketSnapshot::new(100.0, "NMC"))
    );
    assert_eq!(module.latest(), Some(daily(REFERENCE_DAILY_VALUE, "NMC")));
}

#[test]
fn malformed_technical_payload_is_rejected() {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    let recorder = ResultRecorder::attach(&module);

    assert!(try_publish_data(&*bus, TECHNICAL_ID, json!({ "probability": 0.1 })).is_err());

    assert_eq!(recorder.count(), 0);
    assert!(module.state().technical().is_none());
}

#[test]
fn invalid_config_fails_construction() {
    let bus = Arc::new(LocalBus::new());

    let solo = SoloRevenue::new(bus.clone(), RevenueConfig::new().with_miner(""));
    let pool = PoolRevenue::new(bus.clone(), single_miner_config().with_fee(1.5));

    assert!(matches!(solo, Err(HashwatchError::Config { .. })));
    assert!(matches!(pool, Err(HashwatchError::Config { .. })));
    assert!(bus.topics().is_empty());
}

#[test]
fn duplicated_miner_is_counted_once() {
    let bus = Arc::new(LocalBus::new());
    let config = RevenueConfig::new()
        .with_miners([MINER_ID, MINER_ID])
        .with_market(MARKET_ID)
        .with_technical(TECHNICAL_ID);
    let module = SoloRevenue::new(bus.clone(), config).unwrap();
    let recorder = ResultRecorder::attach(&module);

    primed(&bus);

    assert_eq!(bus.subscriber_count(&Topic::data_update(MINER_ID).unwrap()), 1);
    assert_eq!(recorder.count(), 3);
    assert_eq!(recorder.last(), Some(daily(REFERENCE_DAILY_VALUE, "NMC")));
}

#[test]
fn identifier_shared_by_two_roles_updates_both() {
    let bus = Arc::new(LocalBus::new());
    let config = RevenueConfig::new()
        .with_miner("feed")
        .with_market("feed")
        .with_technical(TECHNICAL_ID);
    let module = SoloRevenue::new(bus.clone(), config).unwrap();
    let recorder = ResultRecorder::attach(&module);
    publish_data(&*bus, TECHNICAL_ID, technical_reference());

    publish_data(
        &*bus,
        "feed",
        json!({ "avgHashrate": 1e-6, "ask": 100.0, "currency": "NMC" }),
    );

    assert_eq!(recorder.count(), 2);
    assert_eq!(recorder.last(), Some(daily(REFERENCE_DAILY_VALUE, "NMC")));
    assert_eq!(
        module.state().miner("feed"),
        Some(&MinerSnapshot::with_hashrate(1e-6))
    );
}

#[test]
fn detached_module_ignores_updates() {
    let bus = Arc::new(LocalBus::new());
    let mut module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    let recorder = ResultRecorder::attach(&module);

    module.detach().unwrap();
    module.detach().unwrap();

    assert!(!module.is_attached());
    assert_eq!(publish_data(&*bus, MARKET_ID, market_nmc()), 0);
    assert_eq!(recorder.count(), 0);
    assert!(bus.topics().is_empty());
}

#[test]
fn dropping_module_unsubscribes() {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    assert_eq!(bus.topics().len(), 3);

    drop(module);

    assert!(bus.topics().is_empty());
}

#[test]
fn results_can_share_the_inbound_bus() {
    let bus = Arc::new(LocalBus::new());
    let recorder = ResultRecorder::on(&*bus, &Topic::aggregate());
    let _module = SoloRevenue::with_output(bus.clone(), bus.clone(), single_miner_config()).unwrap();

    primed(&bus);

    assert_eq!(recorder.count(), 3);
    assert_eq!(recorder.last(), Some(daily(REFERENCE_DAILY_VALUE, "NMC")));
}

#[test]
fn two_modules_on_one_bus_are_independent() {
    let bus = Arc::new(LocalBus::new());
    let solo = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    let pool = PoolRevenue::new(bus.clone(), single_miner_config().with_fee(0.02)).unwrap();

    primed(&bus);

    assert_eq!(solo.latest(), Some(daily(REFERENCE_DAILY_VALUE, "NMC")));
    let pooled = pool.latest().unwrap();
    assert_approx_eq(pooled.value, REFERENCE_DAILY_VALUE * 0.98);
    assert_eq!(pool.title(), "Pool Revenue");
    assert_eq!(pool.engine().fee(), 0.02);
}

#[test]
fn untracked_miner_topic_is_never_heard() {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    let recorder = ResultRecorder::attach(&module);

    assert_eq!(publish_data(&*bus, "stranger", miner_hashrate(5.0)), 0);

    assert_eq!(recorder.count(), 0);
    assert!(module.state().miner("stranger").is_none());
}

#[tokio::test]
async fn results_stream_yields_each_publication() -> anyhow::Result<()> {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config())?;
    let mut results = module.results()?;

    primed(&bus);

    let mut values = Vec::new();
    for _ in 0..3 {
        let payload = results.next().await.expect("stream should yield");
        let result: RevenueResult = serde_json::from_value(payload)?;
        values.push(result.value);
    }

    assert_eq!(values, vec![0.0, 0.0, REFERENCE_DAILY_VALUE]);
    Ok(())
}

#[test]
fn modules_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SoloRevenue>();
    assert_send_sync::<PoolRevenue>();
    assert_send_sync::<LocalBus>();
}

#[test]
fn updates_from_other_threads_are_applied() {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();

    std::thread::scope(|scope| {
        let publisher = bus.clone();
        scope.spawn(move || primed(&publisher));
    });

    assert_eq!(module.latest(), Some(daily(REFERENCE_DAILY_VALUE, "NMC")));
}

#[test]
fn publishing_with_no_handler_reaches_nobody() {
    let bus = LocalBus::new();

    assert_eq!(
        bus.publish(&Topic::aggregate(), &json!({ "value": 1.0 })).unwrap(),
        0
    );
}

#[test]
fn results_streams_leave_no_handlers_on_the_output_bus() {
    let bus = Arc::new(LocalBus::new());
    let output = Arc::new(LocalBus::new());
    let module = SoloRevenue::with_output(bus.clone(), output.clone(), single_miner_config()).unwrap();

    for _ in 0..5 {
        drop(module.results().unwrap());
    }
    primed(&bus);

    assert_eq!(output.subscriber_count(&Topic::aggregate()), 0);
    assert_eq!(output.publish(&Topic::aggregate(), &json!({})).unwrap(), 0);
}

#[tokio::test]
async fn results_stream_ends_when_module_detaches() -> anyhow::Result<()> {
    let bus = Arc::new(LocalBus::new());
    let mut module = SoloRevenue::new(bus.clone(), single_miner_config())?;
    let mut results = module.results()?;

    publish_data(&*bus, MARKET_ID, market_nmc());
    module.detach()?;

    assert!(results.next().await.is_some());
    assert!(results.next().await.is_none());
    assert!(matches!(module.results(), Err(HashwatchError::SubjectClosed)));
    Ok(())
}

#[test]
fn overflowing_result_is_rejected_and_state_kept() {
    let bus = Arc::new(LocalBus::new());
    let module = SoloRevenue::new(bus.clone(), single_miner_config()).unwrap();
    let recorder = ResultRecorder::attach(&module);
    publish_data(&*bus, TECHNICAL_ID, json!({ "btcPerBlock": 1e308, "probability": 1.0 }));
    publish_data(&*bus, MARKET_ID, json!({ "ask": 1e308, "currency": "NMC" }));

    let err = try_publish_data(&*bus, MINER_ID, miner_hashrate(1e-6)).unwrap_err();

    match err {
        HashwatchError::HandlerFailures { errors, .. } => assert!(matches!(
            errors.as_slice(),
            [HashwatchError::NonFiniteResult { .. }]
        )),
        other => panic!("unexpected error: {other}"),
    }
    assert!(module.state().miner(MINER_ID).is_none());
    assert_eq!(module.latest(), Some(daily(0.0, "NMC")));
    assert_eq!(recorder.count(), 2);
    assert!(recorder.results().iter().all(|r| r.value.is_finite()));
}

#[test]
fn output_failures_are_not_reported_to_the_inbound_publisher() {
    let bus = Arc::new(LocalBus::new());
    let output = Arc::new(LocalBus::new());
    output
        .subscribe(
            &Topic::aggregate(),
            hashwatch_core::handler(|_topic, _payload| Err(HashwatchError::SubjectClosed)),
        )
        .unwrap();
    let module = SoloRevenue::with_output(bus.clone(), output, single_miner_config()).unwrap();

    assert_eq!(
        try_publish_data(&*bus, MARKET_ID, market_nmc()).unwrap(),
        1
    );
    assert_eq!(module.latest(), Some(daily(0.0, "NMC")));
}

#[test]
fn shared_topic_applies_the_roles_that_fit() {
    let bus = Arc::new(LocalBus::new());
    let config = RevenueConfig::new()
        .with_miner("feed")
        .with_market("feed")
        .with_technical(TECHNICAL_ID);
    let module = SoloRevenue::new(bus.clone(), config).unwrap();
    let recorder = ResultRecorder::attach(&module);

    let err = try_publish_data(&*bus, "feed", miner_hashrate(1e-6)).unwrap_err();

    match err {
        HashwatchError::HandlerFailures { errors, .. } => assert!(matches!(
            errors.as_slice(),
            [HashwatchError::MalformedPayload { source_kind, .. }] if source_kind == "market"
        )),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        module.state().miner("feed"),
        Some(&MinerSnapshot::with_hashrate(1e-6))
    );
    assert!(module.state().market().is_none());
    assert_eq!(recorder.results(), vec![daily(0.0, "")]);
}
