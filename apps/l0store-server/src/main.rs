//! L0 Store Server - API identifiers, signed browser uploads and version listing.
//!
//! Serves the JSON API from `l0store-http`, keeps API identifiers in memory,
//! signs POST policies for direct browser uploads to Wasabi and lists stored
//! object versions per identifier.
//!
//! # Usage
//!
//! ```text
//! WASABI_KEY=.. WASABI_SECRET=.. WASABI_BUCKET=l0 l0store-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `WASABI_KEY` | *(required)* | Access key |
//! | `WASABI_SECRET` | *(required)* | Secret key |
//! | `WASABI_BUCKET` | *(required)* | Upload bucket |
//! | `WASABI_REGION` | `us-east-1` | Bucket region |
//! | `WASABI_DOMAIN` | `wasabisys.com` | Endpoint base domain |
//! | `UPLOAD_EXPIRY_SECONDS` | `900` | Policy lifetime |
//! | `OBJECT_LOCK_DAYS` | `30` | Governance lock duration |
//! | `MAX_PAGE_SIZE` | `100` | Largest identifier page |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use l0store_auth::SigningCredentials;
use l0store_core::{L0StoreConfig, MAX_OBJECT_LOCK_DAYS, MAX_UPLOAD_EXPIRY_SECS};
use l0store_http::{L0StoreHandler, L0StoreHttpConfig, L0StoreHttpService};
use l0store_registry::{ApiIdService, InMemoryApiIdStore};
use l0store_wasabi::{WasabiClient, endpoint_host};

use crate::handler::{ApiHandler, UploadWindow};

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Convert the configured lifetimes into an [`UploadWindow`].
fn upload_window(config: &L0StoreConfig) -> Result<UploadWindow> {
    anyhow::ensure!(
        config.upload_expiry_secs <= MAX_UPLOAD_EXPIRY_SECS,
        "UPLOAD_EXPIRY_SECONDS must be at most {MAX_UPLOAD_EXPIRY_SECS}"
    );
    anyhow::ensure!(
        config.object_lock_days <= MAX_OBJECT_LOCK_DAYS,
        "OBJECT_LOCK_DAYS must be at most {MAX_OBJECT_LOCK_DAYS}"
    );
    let expiry_secs = i64::try_from(config.upload_expiry_secs)
        .context("UPLOAD_EXPIRY_SECONDS is too large")?;
    let expires_in =
        Duration::try_seconds(expiry_secs).context("UPLOAD_EXPIRY_SECONDS is out of range")?;
    let retain_for = Duration::try_days(i64::from(config.object_lock_days))
        .context("OBJECT_LOCK_DAYS is out of range")?;
    Ok(UploadWindow {
        expires_in,
        retain_for,
    })
}

/// Wire the registry, signer and Wasabi client into a handler.
fn build_handler(config: &L0StoreConfig) -> Result<ApiHandler> {
    let credentials = Arc::new(
        SigningCredentials::new(
            config.wasabi_key.as_str(),
            config.wasabi_secret.as_str(),
            config.wasabi_region.as_str(),
            config.wasabi_bucket.as_str(),
        )
        .context("invalid Wasabi credentials")?,
    );
    let lister = Arc::new(WasabiClient::new(
        Arc::clone(&credentials),
        &config.wasabi_domain,
    ));
    let registry = ApiIdService::new(Arc::new(InMemoryApiIdStore::new()), config.max_page_size);
    let upload_url = format!(
        "https://{}/",
        endpoint_host(
            &config.wasabi_bucket,
            &config.wasabi_region,
            &config.wasabi_domain
        )
    );

    Ok(ApiHandler::new(
        registry,
        credentials,
        lister,
        upload_url,
        upload_window(config)?,
    ))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: L0StoreHandler>(
    listener: TcpListener,
    service: L0StoreHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Request `/health` from the running server.
///
/// Exits with code 0 if healthy, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = L0StoreConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = L0StoreConfig::from_env();

    init_tracing(&config.log_level)?;
    config.validate().context("invalid configuration")?;

    info!(
        gateway_listen = %config.gateway_listen,
        wasabi_bucket = %config.wasabi_bucket,
        wasabi_region = %config.wasabi_region,
        wasabi_domain = %config.wasabi_domain,
        upload_expiry_secs = config.upload_expiry_secs,
        object_lock_days = config.object_lock_days,
        version = VERSION,
        "starting L0 Store Server",
    );

    let handler = build_handler(&config)?;
    let http_config = L0StoreHttpConfig {
        version: VERSION.to_owned(),
        ..L0StoreHttpConfig::default()
    };
    let service = L0StoreHttpService::new(Arc::new(handler), http_config);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
