use std::io;

use lunchmeny_mcp::{McpServer, init_logging};
use rmcp::transport::{
    StreamableHttpServerConfig, StreamableHttpService,
    streamable_http_server::session::local::LocalSessionManager,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8055";
const MCP_PATH: &str = "/mcp";

fn bind_address() -> String {
    std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
}

/// Cancels every open MCP session once `signal` resolves. If the signal
/// handler could not be installed the server keeps running until it is killed.
async fn shutdown_on(signal: impl Future<Output = io::Result<()>>, ct: CancellationToken) {
    if let Err(e) = signal.await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
    ct.cancel();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let ct = CancellationToken::new();
    let service = StreamableHttpService::new(
        || McpServer::new().map_err(|e| io::Error::other(format!("Failed to init mcp server: {e:?}"))),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            cancellation_token: ct.child_token(),
            ..Default::default()
        },
    );

    let router = axum::Router::new()
        .nest_service(MCP_PATH, service)
        .layer(CorsLayer::permissive());

    let address = bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    log::info!("Serving lunchmeny tools on http://{address}{MCP_PATH}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c(), ct))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_cancels_sessions() {
        let ct = CancellationToken::new();
        shutdown_on(async { Ok(()) }, ct.clone()).await;
        assert!(ct.is_cancelled());
    }

    #[tokio::test]
    async fn test_failed_signal_listener_keeps_serving() {
        let ct = CancellationToken::new();
        let handle = tokio::spawn(shutdown_on(
            async { Err(io::Error::other("signal handler unavailable")) },
            ct.clone(),
        ));

        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(!ct.is_cancelled());
        assert!(!handle.is_finished());
        handle.abort();
    }
}
