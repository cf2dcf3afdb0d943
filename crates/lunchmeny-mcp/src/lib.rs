mod mcp;

pub use mcp::McpServer;

/// Logs go to stderr without colours; stdout may be the MCP transport.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Stderr)
        .write_style(env_logger::WriteStyle::Never)
        .init();
}
