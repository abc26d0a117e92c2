//! Quickstart: capture one decision and show that the call is non-blocking.
//!
//! Start the toy collector first (`cargo run -p provit-mockd`), then run
//! `cargo run -p provit-sdk --example capture` and watch the evidence arrive.

use std::time::Instant;

use provit_sdk::{ClientConfig, ProvitClient};

fn main() -> anyhow::Result<()> {
    let client = ProvitClient::new(
        ClientConfig::new("demo-api-key-123")
            .api_url("http://127.0.0.1:8080")
            .debug(true),
    )?;

    // Mock decision context
    let decision_id = format!("txn-{}", chrono::Utc::now().timestamp());
    println!("[app] processing transaction: {}", decision_id);

    // ... AI inference happens here ...
    let label = "legitimate";
    let confidence = 0.985;
    println!("[app] model result: {} ({})", label, confidence);

    let start = Instant::now();
    client.capture(&decision_id, "fraud_detection_model", "v2.3.1", label, confidence);
    println!("[app] capture returned in {:?}", start.elapsed());
    println!("[app] continuing business logic immediately...");

    // Orderly exit: flush whatever is still pending (bounded)
    let drained = client.shutdown();
    println!("[app] shutdown drained cleanly: {}", drained);
    Ok(())
}
