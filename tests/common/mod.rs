//! Shared test double for the stream client.

#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use cdc_forwarder::{PublishError, PublishItem, PutOutcome, StreamClient};

/// In-memory stream client: records every request, replays scripted
/// outcomes, and optionally stalls to exercise the publish deadline.
#[derive(Default)]
pub struct FakeStream {
    calls: Mutex<Vec<Call>>,
    script: Mutex<Vec<Result<Vec<PutOutcome>, PublishError>>>,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub stream_name: String,
    pub items: Vec<PublishItem>,
}

impl FakeStream {
    /// Accepts every record.
    pub fn accepting_all() -> Self {
        Self::default()
    }

    /// Replays the given per-call results in order, then accepts everything.
    pub fn scripted(script: Vec<Result<Vec<PutOutcome>, PublishError>>) -> Self {
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    /// Sleeps before answering each call.
    pub fn stalling(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All partition keys sent, across calls, in submission order.
    pub fn partition_keys(&self) -> Vec<String> {
        self.calls()
            .iter()
            .flat_map(|call| call.items.iter().map(|i| i.partition_key.clone()))
            .collect()
    }

    /// All payloads sent, across calls, decoded as UTF-8.
    pub fn payloads(&self) -> Vec<String> {
        self.calls()
            .iter()
            .flat_map(|call| {
                call.items
                    .iter()
                    .map(|i| String::from_utf8(i.payload.to_vec()).unwrap())
            })
            .collect()
    }
}

#[async_trait]
impl StreamClient for FakeStream {
    async fn put_records(
        &self,
        stream_name: &str,
        items: &[PublishItem],
    ) -> Result<Vec<PutOutcome>, PublishError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(Call {
            stream_name: stream_name.to_string(),
            items: items.to_vec(),
        });
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            Ok(vec![PutOutcome::ok(); items.len()])
        } else {
            script.remove(0)
        }
    }
}
