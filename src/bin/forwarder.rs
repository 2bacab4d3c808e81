//! Operational entry point.
//!
//! Reads one invocation (a JSON array of change events) from stdin, forwards
//! it, and prints the invocation summary as JSON on stdout:
//!
//! ```text
//! echo '[{"eventKind":"INSERT","newImage":{"city":{"S":"Austin"}}}]' | forwarder
//! ```

use std::error::Error;
use std::io::Read;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cdc_forwarder::{ChangeEvent, Forwarder, ForwarderConfig, KinesisStreamClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ForwarderConfig::from_env()?;
    let client = Arc::new(KinesisStreamClient::from_env().await);
    let forwarder = Forwarder::new(config, client)?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let events: Vec<ChangeEvent> = serde_json::from_str(&input)?;

    let summary = forwarder.handle(&events).await?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
