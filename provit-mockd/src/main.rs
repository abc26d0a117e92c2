//! provit-mockd - toy ProVit collector for manual SDK testing
//!
//! Simulates the platform's `/v1/events` endpoint: enforces the Bearer
//! token, validates the JSON body, and pretty-prints every piece of
//! evidence it receives. Not a real collector; it stores nothing.

use std::convert::Infallible;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "provit-mockd")]
#[command(about = "Toy ProVit collector - prints evidence received from the SDK")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .context("invalid bind address")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "mock ProVit collector listening, waiting for SDK events");

    loop {
        let (stream, peer) = listener.accept().await?;
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            if let Err(e) = http1::Builder::new()
                .serve_connection(io, service_fn(handle))
                .await
            {
                warn!(%peer, error = %e, "connection error");
            }
        });
    }
}

async fn handle(req: Request<Incoming>) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    Ok(respond(req).await)
}

async fn respond(req: Request<Incoming>) -> Response<Full<Bytes>> {
    if req.method() != Method::POST || req.uri().path() != "/v1/events" {
        return json_response(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#);
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        warn!("unauthorized request (missing bearer token)");
        return json_response(StatusCode::UNAUTHORIZED, r#"{"error":"unauthorized"}"#);
    };

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!(error = %e, "failed to read request body");
            return json_response(StatusCode::BAD_REQUEST, r#"{"error":"bad body"}"#);
        }
    };

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(event) => {
            info!(token = %token, "received AI evidence");
            println!(
                "{}",
                serde_json::to_string_pretty(&event).unwrap_or_default()
            );
            json_response(StatusCode::OK, r#"{"status":"received"}"#)
        }
        Err(e) => {
            warn!(error = %e, "invalid JSON received");
            json_response(StatusCode::BAD_REQUEST, r#"{"error":"invalid json"}"#)
        }
    }
}

fn json_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .expect("static response parts are valid")
}
