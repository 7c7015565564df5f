use std::cell::Cell;
use std::io;
use std::net::{Ipv4Addr, TcpListener};
use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};
use slogx::{Config, LogLevel, Logger, SlogxError};
use slogx_test_support::{ViewerClient, free_port, init_test_logging, wait_for};
use tracing_subscriber::layer::SubscriberExt;

const WAIT: Duration = Duration::from_secs(5);

#[derive(slogx::Inspect)]
struct Account {
    #[allow(non_snake_case)]
    Public: &'static str,
    private: &'static str,
}

#[derive(serde::Serialize)]
struct Quote {
    symbol: &'static str,
    price: f64,
}

struct Connection;

#[derive(Debug)]
struct PaymentError {
    order: u32,
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "payment for order {} declined", self.order)
    }
}

impl std::error::Error for PaymentError {}

fn charge(order: u32) -> Result<(), PaymentError> {
    Err(PaymentError { order })
}

async fn start(service: &str) -> Result<Logger> {
    init_test_logging();
    let config = Config::new(true)
        .with_port(free_port()?)
        .with_service_name(service);
    let logger = Logger::start(&config).await?;
    logger.ok_or_else(|| anyhow::anyhow!("enabled config must start a logger"))
}

async fn connect(logger: &Logger) -> Result<ViewerClient> {
    let viewer = ViewerClient::connect(logger.local_addr()).await?;
    let expected = logger.session_count() + 1;
    assert!(wait_for(WAIT, || logger.session_count() == expected).await);
    Ok(viewer)
}

#[tokio::test]
async fn error_argument_record_carries_its_stack() -> Result<()> {
    let logger = start("billing").await?;
    let mut viewer = connect(&logger).await?;

    let err = io::Error::other("boom");
    logger.error(slogx::args!("failed", err));

    let entry = viewer.next_entry(WAIT).await?;
    assert_eq!(entry["level"], json!("ERROR"));
    assert_eq!(entry["args"][0], json!("failed"));
    let record = &entry["args"][1];
    assert_eq!(record["name"], json!("Error"));
    assert_eq!(record["message"], json!("boom"));
    let stack = record["stack"].as_str().unwrap_or_default();
    assert!(stack.starts_with("Error: boom"), "unexpected stack {stack}");
    assert_eq!(entry["stacktrace"], record["stack"]);

    let metadata = &entry["metadata"];
    assert_eq!(metadata["file"], json!("logging.rs"));
    assert_eq!(metadata["lang"], json!("rust"));
    assert_eq!(metadata["service"], json!("billing"));
    assert!(metadata["line"].as_u64().is_some_and(|line| line > 0));
    let func = metadata["func"].as_str().unwrap_or_default();
    assert!(
        func.contains("error_argument_record_carries_its_stack"),
        "unexpected func {func}"
    );
    Ok(())
}

#[tokio::test]
async fn arguments_are_classified_by_capability() -> Result<()> {
    let logger = start("classify").await?;
    let mut viewer = connect(&logger).await?;

    let account = Account {
        Public: "x",
        private: "y",
    };
    let quote = Quote {
        symbol: "ACME",
        price: 12.5,
    };
    let missing: Option<Vec<u8>> = None;
    let (sender, _receiver) = tokio::sync::mpsc::channel::<String>(1);
    logger.info(slogx::args!(
        { "a": 1, "b": { "c": 2 } },
        account,
        quote,
        missing,
        Vec::<u8>::new(),
        sender,
        Connection,
        [1, 2],
    ));

    let entry = viewer.next_entry(WAIT).await?;
    assert_eq!(
        entry["args"],
        json!([
            {"a": 1, "b": {"c": 2}},
            {"Public": "x", "private": "y"},
            {"symbol": "ACME", "price": 12.5},
            null,
            [],
            "<chan String>",
            "<opaque Connection>",
            [1, 2]
        ])
    );
    Ok(())
}

#[tokio::test]
async fn borrowed_errors_are_logged_as_records() -> Result<()> {
    let logger = start("payments").await?;
    let mut viewer = connect(&logger).await?;

    let err = PaymentError { order: 7 };
    logger.error(slogx::args!("failed", &err));
    let outcome = charge(8);
    if let Err(declined) = &outcome {
        logger.error(slogx::args!("retry failed", declined));
    }

    let first = viewer.next_entry(WAIT).await?;
    assert_eq!(first["args"][1]["name"], json!("PaymentError"));
    assert_eq!(
        first["args"][1]["message"],
        json!("payment for order 7 declined")
    );
    let second = viewer.next_entry(WAIT).await?;
    assert_eq!(second["args"][1]["name"], json!("PaymentError"));
    assert_eq!(second["stacktrace"], second["args"][1]["stack"]);
    Ok(())
}

#[tokio::test]
async fn error_like_values_become_records() -> Result<()> {
    let logger = start("errors").await?;
    let mut viewer = connect(&logger).await?;

    let wrapped = anyhow::anyhow!("pool exhausted").context("query failed");
    let boxed: Box<dyn std::error::Error + Send + Sync> = "disk full".into();
    logger.warn(slogx::args!(wrapped, boxed));

    let entry = viewer.next_entry(WAIT).await?;
    assert_eq!(entry["level"], json!("WARN"));
    assert_eq!(entry["args"][0]["message"], json!("query failed"));
    assert_eq!(entry["args"][0]["cause"]["message"], json!("pool exhausted"));
    assert_eq!(entry["args"][1]["message"], json!("disk full"));
    assert_eq!(entry["stacktrace"], entry["args"][1]["stack"]);
    Ok(())
}

#[tokio::test]
async fn nothing_is_converted_without_viewers() -> Result<()> {
    let logger = start("quiet").await?;
    let converted = Cell::new(false);
    logger.log_with(LogLevel::Info, || {
        converted.set(true);
        Vec::new()
    });
    assert!(!converted.get());
    Ok(())
}

#[tokio::test]
async fn entries_without_arguments_are_allowed() -> Result<()> {
    let logger = start("empty").await?;
    let mut viewer = connect(&logger).await?;
    logger.debug(Vec::new());
    let entry = viewer.next_entry(WAIT).await?;
    assert_eq!(entry["args"], json!([]));
    assert_eq!(entry["level"], json!("DEBUG"));
    Ok(())
}

#[tokio::test]
async fn timestamps_never_go_backwards() -> Result<()> {
    let logger = start("clock").await?;
    let first = logger.build_entry(LogLevel::Info, Vec::new());
    let second = logger.build_entry(LogLevel::Info, Vec::new());
    assert!(first.timestamp <= second.timestamp);
    assert_ne!(first.id, second.id);
    assert!(first.timestamp.ends_with('Z'));
    Ok(())
}

#[tokio::test]
async fn disabled_config_opens_no_socket() -> Result<()> {
    let port = free_port()?;
    let logger = Logger::start(&Config::new(false).with_port(port)).await?;
    assert!(logger.is_none());
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))?;
    drop(listener);
    Ok(())
}

#[tokio::test]
async fn occupied_port_is_reported_with_its_number() -> Result<()> {
    let occupied = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
    let port = occupied.local_addr()?.port();
    let result = Logger::start(&Config::new(true).with_port(port)).await;
    let err = result.err().ok_or_else(|| anyhow::anyhow!("bind must fail"))?;
    assert!(matches!(err, SlogxError::Transport { .. }));
    assert!(err.to_string().contains(&port.to_string()), "{err}");
    Ok(())
}

#[tokio::test]
async fn invalid_config_is_rejected_before_binding() -> Result<()> {
    let config = Config::new(true)
        .with_port(free_port()?)
        .with_service_name("  ");
    let result = Logger::start(&config).await;
    assert!(matches!(result, Err(SlogxError::Config { .. })));
    Ok(())
}

#[tokio::test]
async fn tracing_events_are_forwarded() -> Result<()> {
    let logger = start("traced").await?;
    let mut viewer = connect(&logger).await?;

    let subscriber = tracing_subscriber::registry().with(logger.layer());
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "slogx_transport", "internal chatter");
        tracing::info!(user = "ada", attempts = 2, "signed in");
        tracing::trace!("fine grained");
    });

    let signed_in = viewer.next_entry(WAIT).await?;
    assert_eq!(signed_in["level"], json!("INFO"));
    assert_eq!(
        signed_in["args"],
        json!(["signed in", {"user": "ada", "attempts": 2}])
    );
    assert_eq!(signed_in["metadata"]["file"], json!("logging.rs"));
    assert_eq!(signed_in["metadata"]["func"], json!("logging"));
    assert!(signed_in.get("stacktrace").is_none());

    let trace = viewer.next_entry(WAIT).await?;
    assert_eq!(trace["level"], json!("DEBUG"));
    assert_eq!(trace["args"], json!(["fine grained"]));
    assert!(viewer.is_silent(Duration::from_millis(100)).await);
    Ok(())
}

#[tokio::test]
async fn entries_reach_every_viewer() -> Result<()> {
    let logger = start("fanout").await?;
    let mut first = connect(&logger).await?;
    let mut second = connect(&logger).await?;

    logger.info(slogx::args!("hello"));

    let one: Value = first.next_entry(WAIT).await?;
    let two: Value = second.next_entry(WAIT).await?;
    assert_eq!(one, two);
    assert_eq!(one["args"], json!(["hello"]));

    let metrics = logger.metrics();
    assert_eq!(metrics.sessions_open, 2);
    assert_eq!(metrics.entries_broadcast_total, 1);
    assert!(wait_for(WAIT, || logger.metrics().frames_sent_total == 2).await);
    Ok(())
}
