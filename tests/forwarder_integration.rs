//! End-to-end invocation scenarios against an injected in-memory stream.

mod common;

use std::sync::Arc;

use cdc_forwarder::{
    ChangeEvent, Forwarder, ForwarderConfig, InvocationSummary, PutOutcome,
};
use common::FakeStream;

fn forwarder_with(client: Arc<FakeStream>) -> Forwarder {
    Forwarder::new(ForwarderConfig::default(), client).unwrap()
}

fn events_from(json: &str) -> Vec<ChangeEvent> {
    serde_json::from_str(json).expect("test events parse")
}

#[tokio::test]
async fn insert_event_is_forwarded_with_its_city_key() {
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = forwarder_with(client.clone());
    let events = events_from(
        r#"[{"eventKind": "INSERT",
             "newImage": {"city": {"S": "Austin"}, "temp_c": {"N": "21.5"}}}]"#,
    );

    let summary = forwarder.handle(&events).await.unwrap();

    assert_eq!(
        summary,
        InvocationSummary {
            records_processed: 1,
            failed: 0
        }
    );
    assert_eq!(client.call_count(), 1);
    assert_eq!(client.calls()[0].stream_name, "cdc-events-dev");
    assert_eq!(client.partition_keys(), vec!["Austin"]);
    assert_eq!(
        client.payloads(),
        vec!["{\"city\":\"Austin\",\"temp_c\":21.5}\n"]
    );
}

#[tokio::test]
async fn modify_event_publishes_nothing() {
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = forwarder_with(client.clone());
    let events = events_from(
        r#"[{"eventKind": "MODIFY", "newImage": {"city": {"S": "Austin"}}}]"#,
    );

    let summary = forwarder.handle(&events).await.unwrap();

    assert_eq!(summary, InvocationSummary::default());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn missing_partition_field_resolves_to_unknown() {
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = forwarder_with(client.clone());
    let events = events_from(
        r#"[{"eventKind": "INSERT", "newImage": {"temp_c": {"N": "21.5"}}}]"#,
    );

    forwarder.handle(&events).await.unwrap();

    assert_eq!(client.partition_keys(), vec!["unknown"]);
}

#[tokio::test]
async fn partial_batch_failure_shows_up_in_the_summary() {
    let client = Arc::new(FakeStream::scripted(vec![Ok(vec![
        PutOutcome::ok(),
        PutOutcome::rejected("ProvisionedThroughputExceededException", "slow down"),
        PutOutcome::ok(),
        PutOutcome::rejected("InternalFailure", ""),
        PutOutcome::ok(),
    ])]));
    let forwarder = forwarder_with(client.clone());
    let events: Vec<ChangeEvent> = events_from(
        r#"[
            {"eventKind": "INSERT", "newImage": {"city": {"S": "Austin"}}},
            {"eventKind": "INSERT", "newImage": {"city": {"S": "Boston"}}},
            {"eventKind": "INSERT", "newImage": {"city": {"S": "Chicago"}}},
            {"eventKind": "INSERT", "newImage": {"city": {"S": "Denver"}}},
            {"eventKind": "INSERT", "newImage": {"city": {"S": "El Paso"}}}
        ]"#,
    );

    let summary = forwarder.handle(&events).await.unwrap();

    assert_eq!(
        summary,
        InvocationSummary {
            records_processed: 5,
            failed: 2
        }
    );
}

#[tokio::test]
async fn empty_invocation_returns_zero_summary_without_network() {
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = forwarder_with(client.clone());

    let summary = forwarder.handle(&[]).await.unwrap();

    assert_eq!(summary, InvocationSummary::default());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn filters_apply_per_event_within_one_invocation() {
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = forwarder_with(client.clone());
    let events = events_from(
        r#"[
            {"eventKind": "INSERT", "newImage": {"city": {"S": "Austin"}}},
            {"eventKind": "REMOVE"},
            {"eventKind": "INSERT"},
            {"eventKind": "MODIFY", "newImage": {"city": {"S": "Boston"}}},
            {"eventKind": "TRUNCATE", "newImage": {"city": {"S": "Dallas"}}},
            {"eventKind": "INSERT", "newImage": {"city": {"S": "Chicago"}}}
        ]"#,
    );

    let summary = forwarder.handle(&events).await.unwrap();

    assert_eq!(summary.records_processed, 2);
    assert_eq!(client.partition_keys(), vec!["Austin", "Chicago"]);
}

#[tokio::test]
async fn large_invocation_is_chunked_but_summarized_once() {
    let config = ForwarderConfig {
        max_batch_records: 100,
        ..ForwarderConfig::default()
    };
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = Forwarder::new(config, client.clone()).unwrap();

    let events: Vec<ChangeEvent> = (0..250)
        .map(|i| {
            serde_json::from_str(&format!(
                r#"{{"eventKind": "INSERT", "newImage": {{"city": {{"S": "city-{i}"}}}}}}"#
            ))
            .unwrap()
        })
        .collect();

    let summary = forwarder.handle(&events).await.unwrap();

    assert_eq!(summary.records_processed, 250);
    assert_eq!(summary.failed, 0);
    let sizes: Vec<usize> = client.calls().iter().map(|c| c.items.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[tokio::test]
async fn custom_partition_field_and_stream_name_are_honored() {
    let config = ForwarderConfig {
        stream_name: "cdc-events-prod".into(),
        partition_key_field: "station_id".into(),
        ..ForwarderConfig::default()
    };
    let client = Arc::new(FakeStream::accepting_all());
    let forwarder = Forwarder::new(config, client.clone()).unwrap();
    let events = events_from(
        r#"[{"eventKind": "INSERT",
             "newImage": {"station_id": {"N": "42"}, "city": {"S": "Austin"}}}]"#,
    );

    forwarder.handle(&events).await.unwrap();

    assert_eq!(client.calls()[0].stream_name, "cdc-events-prod");
    assert_eq!(client.partition_keys(), vec!["42"]);
}
