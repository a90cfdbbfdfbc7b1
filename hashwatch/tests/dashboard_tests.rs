// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::StreamExt;
use hashwatch::prelude::*;
use hashwatch::TopicSubject;
use hashwatch_test_utils::fixtures::{
    daily, market_nmc, market_usd, miner_hashrate, technical_reference, two_miner_config,
    MARKET_ID, MINER_ID_1, MINER_ID_2, REFERENCE_DAILY_VALUE, TECHNICAL_ID,
};
use hashwatch_test_utils::{assert_approx_eq, publish_data};
use std::sync::Arc;

#[tokio::test]
async fn dashboard_bus_streams_results_of_every_widget() -> anyhow::Result<()> {
    let bus = Arc::new(LocalBus::new());
    let dashboard = TopicSubject::new();
    dashboard.attach(&*bus, &Topic::aggregate())?;
    let feed = dashboard.subscribe()?;

    let _solo = SoloRevenue::with_output(bus.clone(), bus.clone(), two_miner_config())?;
    let _pool = PoolRevenue::with_output(
        bus.clone(),
        bus.clone(),
        two_miner_config().with_title("Pool").with_fee(0.01),
    )?;

    publish_data(&*bus, MARKET_ID, market_nmc());
    publish_data(&*bus, TECHNICAL_ID, technical_reference());
    publish_data(&*bus, MINER_ID_1, miner_hashrate(0.5e-6));
    publish_data(&*bus, MINER_ID_2, miner_hashrate(0.5e-6));
    dashboard.close();

    let results: Vec<RevenueResult> = feed
        .map(serde_json::from_value)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<std::result::Result<_, _>>()?;

    assert_eq!(results.len(), 8);
    let solo = &results[6];
    let pool = &results[7];
    assert_eq!(solo, &daily(REFERENCE_DAILY_VALUE, "NMC"));
    assert_approx_eq(pool.value, REFERENCE_DAILY_VALUE * 0.99);
    Ok(())
}

#[test]
fn weekly_config_from_json() -> Result<()> {
    let bus = Arc::new(LocalBus::new());
    let config = RevenueConfig::from_json_str(
        r#"{ "miner": "minerId1", "market": "marketId", "technical": "technicalId", "interval": "Week" }"#,
    )?;
    let module = SoloRevenue::new(bus.clone(), config)?;

    publish_data(&*bus, TECHNICAL_ID, technical_reference());
    publish_data(&*bus, MINER_ID_1, miner_hashrate(1e-6));
    publish_data(&*bus, MARKET_ID, market_usd());

    let latest = module.latest().expect("a result was published");
    assert_eq!(latest.interval, Interval::Week.label());
    assert_eq!(latest.currency, "USD");
    assert_approx_eq(latest.value, REFERENCE_DAILY_VALUE * 2.5 * 7.0);
    Ok(())
}
