// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use hashwatch_core::{decode, encode, HashwatchError, Topic};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Quote {
    ask: f64,
    currency: String,
}

#[test]
fn decode_reads_matching_shape() {
    let topic = Topic::data_update("market").unwrap();
    let quote: Quote = decode(&topic, "market", &json!({ "ask": 100.0, "currency": "NMC" })).unwrap();

    assert_eq!(
        quote,
        Quote {
            ask: 100.0,
            currency: "NMC".to_string()
        }
    );
}

#[test]
fn decode_reports_topic_and_source_on_failure() {
    let topic = Topic::data_update("market").unwrap();
    let err = decode::<Quote>(&topic, "market", &json!({ "currency": "NMC" })).unwrap_err();

    match err {
        HashwatchError::MalformedPayload {
            topic,
            source_kind,
            reason,
        } => {
            assert_eq!(topic, "update:data:market");
            assert_eq!(source_kind, "market");
            assert!(reason.contains("ask"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn encode_uses_serde_field_names() {
    let payload = encode(&Quote {
        ask: 2.5,
        currency: "BTC".to_string(),
    })
    .unwrap();

    assert_eq!(payload, json!({ "ask": 2.5, "currency": "BTC" }));
}
