//! Integration tests for the capture → queue → transmit pipeline
//!
//! Each test runs a real `ProvitClient` against an in-process mock collector
//! (a minimal HTTP/1.1 responder on a loopback port) and inspects what
//! arrived on the wire.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use provit_sdk::{ClientConfig, ProvitClient};

/// Initialize logging for tests (logs to the test writer)
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One request as seen by the mock collector
#[derive(Debug, Clone)]
struct ReceivedEvent {
    authorization: Option<String>,
    user_agent: Option<String>,
    body: serde_json::Value,
}

/// Minimal in-process stand-in for the ProVit collector.
///
/// Accepts connections on a loopback port, records each POST body and its
/// auth header, and answers with a fixed status. Responses carry
/// `connection: close` so the client reconnects per request, which keeps the
/// accept loop trivially sequential.
struct MockCollector {
    base_url: String,
    received: Arc<Mutex<Vec<ReceivedEvent>>>,
}

impl MockCollector {
    fn start() -> Self {
        Self::start_with(200, Duration::ZERO)
    }

    fn start_with(status: u16, response_delay: Duration) -> Self {
        init_logging();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock collector");
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let received: Arc<Mutex<Vec<ReceivedEvent>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                if let Some(event) = handle_connection(stream, status, response_delay) {
                    sink.lock().unwrap().push(event);
                }
            }
        });

        Self { base_url, received }
    }

    fn events(&self) -> Vec<ReceivedEvent> {
        self.received.lock().unwrap().clone()
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig::new("test-api-key")
            .api_url(&self.base_url)
            .debug(true)
            .drain_timeout(Duration::from_secs(10))
    }
}

/// Read one HTTP request, record it, answer with `status`.
fn handle_connection(
    mut stream: std::net::TcpStream,
    status: u16,
    response_delay: Duration,
) -> Option<ReceivedEvent> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut authorization = None;
    let mut user_agent = None;
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        let (name, value) = line.split_once(':')?;
        let value = value.trim().to_string();
        match name.to_ascii_lowercase().as_str() {
            "authorization" => authorization = Some(value),
            "user-agent" => user_agent = Some(value),
            "content-length" => content_length = value.parse().ok()?,
            _ => {}
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).ok()?;

    if !response_delay.is_zero() {
        std::thread::sleep(response_delay);
    }

    let (reason, payload) = match status {
        200 => ("OK", r#"{"status":"received"}"#),
        401 => ("Unauthorized", r#"{"error":"unauthorized"}"#),
        _ => ("Internal Server Error", r#"{"error":"boom"}"#),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        reason,
        payload.len(),
        payload
    );
    stream.write_all(response.as_bytes()).ok()?;

    Some(ReceivedEvent {
        authorization,
        user_agent,
        body: serde_json::from_slice(&body).ok()?,
    })
}

// ============================================
// Round-trip and wire format
// ============================================

#[test]
fn test_end_to_end_transmission() {
    let collector = MockCollector::start();
    let client = ProvitClient::new(collector.client_config()).unwrap();

    client.capture("test-decision-001", "fraud-v1", "1.0.0", "Reject", 0.95);
    assert!(client.flush(Duration::from_secs(10)));

    let events = collector.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];

    assert_eq!(event.authorization.as_deref(), Some("Bearer test-api-key"));
    assert!(event
        .user_agent
        .as_deref()
        .unwrap()
        .starts_with("provit-sdk-rust/"));

    let body = &event.body;
    assert_eq!(body["event_type"], "ai.runtime");
    assert_eq!(body["decision_id"], "test-decision-001");
    assert_eq!(body["payload"]["model"]["name"], "fraud-v1");
    assert_eq!(body["payload"]["model"]["version"], "1.0.0");
    // Normalization is on by default: "Reject" goes out lower-cased
    assert_eq!(body["payload"]["recommendation"]["label"], "reject");
    assert_eq!(body["payload"]["recommendation"]["confidence_score"], 0.95);
    assert_eq!(body["meta"]["language"], "rust");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(!body["event_id"].as_str().unwrap().is_empty());

    client.shutdown();
}

#[test]
fn test_type_coercion_on_the_wire() {
    let collector = MockCollector::start();
    let client = ProvitClient::new(collector.client_config()).unwrap();

    // Integer label, string confidence: both must be coerced, not rejected
    client.capture("type-test", "m", "v", 100, "0.88");
    assert!(client.flush(Duration::from_secs(10)));

    let events = collector.events();
    assert_eq!(events.len(), 1);
    let rec = &events[0].body["payload"]["recommendation"];
    assert_eq!(rec["label"], "100");
    assert_eq!(rec["confidence_score"], 0.88);

    client.shutdown();
}

#[test]
fn test_normalization_disabled_passes_label_verbatim() {
    let collector = MockCollector::start();
    let client =
        ProvitClient::new(collector.client_config().normalize_labels(false)).unwrap();

    client.capture("d", "m", "v", "  APPROVE  ", 0.5);
    assert!(client.flush(Duration::from_secs(10)));

    let events = collector.events();
    assert_eq!(
        events[0].body["payload"]["recommendation"]["label"],
        "  APPROVE  "
    );

    client.shutdown();
}

// ============================================
// Ordering
// ============================================

#[test]
fn test_events_arrive_in_capture_order() {
    let collector = MockCollector::start();
    let client = ProvitClient::new(collector.client_config()).unwrap();

    for i in 0..20 {
        client.capture(&format!("seq-{:02}", i), "m", "v", "ok", 0.5);
    }
    assert!(client.flush(Duration::from_secs(10)));

    let ids: Vec<String> = collector
        .events()
        .iter()
        .map(|e| e.body["decision_id"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (0..20).map(|i| format!("seq-{:02}", i)).collect();
    assert_eq!(ids, expected);

    client.shutdown();
}

// ============================================
// Fail-safe behavior
// ============================================

#[test]
fn test_capture_against_closed_port_is_fast_and_silent() {
    init_logging();

    // Grab a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ProvitClient::new(
        ClientConfig::new("k")
            .api_url(dead_url)
            .drain_timeout(Duration::from_secs(10)),
    )
    .unwrap();

    let start = Instant::now();
    client.capture("fail-test", "m", "v", "l", 0.1);
    assert!(
        start.elapsed() < Duration::from_millis(50),
        "capture blocked for {:?}",
        start.elapsed()
    );

    // Subsequent calls still work and shutdown still drains
    client.capture("fail-test-2", "m", "v", "l", 0.2);
    assert!(client.shutdown());
}

#[test]
fn test_capture_latency_independent_of_slow_collector() {
    let collector = MockCollector::start_with(200, Duration::from_millis(500));
    let client = ProvitClient::new(collector.client_config()).unwrap();

    let start = Instant::now();
    client.capture("slow-test", "m", "v", "l", 0.5);
    assert!(
        start.elapsed() < Duration::from_millis(50),
        "capture waited on the network: {:?}",
        start.elapsed()
    );

    assert!(client.flush(Duration::from_secs(10)));
    assert_eq!(collector.events().len(), 1);

    client.shutdown();
}

#[test]
fn test_unauthorized_responses_do_not_stall_the_worker() {
    let collector = MockCollector::start_with(401, Duration::ZERO);
    let client = ProvitClient::new(collector.client_config()).unwrap();

    client.capture("unauth-1", "m", "v", "l", 0.1);
    client.capture("unauth-2", "m", "v", "l", 0.2);
    assert!(client.flush(Duration::from_secs(10)));

    // Both attempts were made; the first 401 did not kill the worker
    let events = collector.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].body["decision_id"], "unauth-2");

    client.shutdown();
}

#[test]
fn test_non_numeric_confidence_is_dropped_before_the_queue() {
    let collector = MockCollector::start();
    let client = ProvitClient::new(collector.client_config()).unwrap();

    client.capture("bad-score", "m", "v", "l", "very confident");
    client.capture("good-score", "m", "v", "l", "0.75");
    assert!(client.flush(Duration::from_secs(10)));

    let events = collector.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].body["decision_id"], "good-score");

    client.shutdown();
}

// ============================================
// Shutdown drain
// ============================================

#[test]
fn test_shutdown_drains_queued_events() {
    let collector = MockCollector::start();
    let client = ProvitClient::new(collector.client_config()).unwrap();

    for i in 0..10 {
        client.capture(&format!("drain-{}", i), "m", "v", "l", 0.5);
    }

    assert!(client.shutdown());
    assert_eq!(collector.events().len(), 10);
}

#[test]
fn test_drop_drains_queued_events() {
    let collector = MockCollector::start();
    let client = ProvitClient::new(collector.client_config()).unwrap();

    for i in 0..5 {
        client.capture(&format!("drop-{}", i), "m", "v", "l", 0.5);
    }
    drop(client);

    assert_eq!(collector.events().len(), 5);
}

#[test]
fn test_concurrent_producers_all_delivered() {
    let collector = MockCollector::start();
    let client = Arc::new(ProvitClient::new(collector.client_config()).unwrap());

    let mut handles = Vec::new();
    for t in 0..4 {
        let client = Arc::clone(&client);
        handles.push(std::thread::spawn(move || {
            for i in 0..25 {
                client.capture(&format!("t{}-{}", t, i), "m", "v", "l", 0.5);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let client = Arc::try_unwrap(client).expect("all producer threads joined");
    assert!(client.shutdown());
    assert_eq!(collector.events().len(), 100);
}
