mod cache;
mod config;
mod css;
mod elements;
mod error;
mod listing;
mod loader;
mod model;
mod pwa;
mod resolver;
mod search;
mod server;
#[cfg(test)]
mod test_support;
mod validate;
mod webidl;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cache::DatasetCache;
use config::Config;
use server::WebStandardsServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting web-standards MCP server");

    let config = Config::from_env()?;
    info!(
        data_path = %config.data_path,
        on_load_failure = ?config.on_load_failure,
        tcp = config.tcp_listen_addr.is_some(),
        "configuration loaded"
    );

    let cache = Arc::new(DatasetCache::new(config.data_path(), config.on_load_failure));
    cache.preload_all().await?;

    let server = WebStandardsServer::new(cache);

    if let Some(addr) = config.tcp_listen_addr {
        let listener = TcpListener::bind(&addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    } else {
        info!("MCP server ready, serving on stdio");
        let service = server.serve(stdio()).await.inspect_err(|e| {
            tracing::error!(error = %e, "MCP server error");
        })?;
        service.waiting().await?;
        info!("MCP server shut down");
    }
    Ok(())
}
