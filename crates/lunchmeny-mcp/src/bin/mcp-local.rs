use lunchmeny_mcp::{McpServer, init_logging};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let server = McpServer::new()?;
    log::info!("Serving lunchmeny tools over stdio");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| log::error!("Serve error: {e:?}"))?;

    let reason = service.waiting().await?;
    log::info!("MCP session ended: {reason:?}");

    Ok(())
}
