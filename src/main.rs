use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::oneshot;

use rxledger::api::rest::RestApi;
use rxledger::config::load_config;
use rxledger::lifecycle::{PrescriptionService, QueryEngine};
use rxledger::storage::{FileStore, RecordStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = load_config(Path::new("config.yaml"))?;

    println!("Starting rxledger with storage path: {}", config.storage.path);

    let store: Arc<dyn RecordStore> = Arc::new(FileStore::new(&config.storage.path)?);
    let service = Arc::new(PrescriptionService::new(
        Arc::clone(&store),
        config.lifecycle.clone(),
    ));
    let query_engine = Arc::new(QueryEngine::new(Arc::clone(&store), config.lifecycle.clone()));
    let api = RestApi::new(service, query_engine, config.lifecycle.clone());

    println!("Starting server on {}:{}", config.api.host, config.api.port);

    // Create a channel for shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let routes = api.routes();
    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port).parse()?;

    // Set up server with graceful shutdown
    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async move {
        shutdown_rx.await.ok();
        println!("Shutting down server...");
    });

    let server_handle = tokio::spawn(server);

    // Wait for Ctrl+C
    signal::ctrl_c().await?;
    println!("Ctrl+C received, starting graceful shutdown");

    shutdown_tx.send(()).ok();
    server_handle.await?;

    println!("Server shutdown complete");
    Ok(())
}
