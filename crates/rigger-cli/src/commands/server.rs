//! `rigger server` — Start the rigger HTTP control plane.

pub async fn run(host: String, port: u16, sequential_async: bool) -> Result<(), String> {
    let config = rigger_server::ServerConfig {
        host: host.clone(),
        port,
        concurrent_async: !sequential_async,
    };

    println!("Starting rigger server on {}:{}...", host, port);

    let addr = rigger_server::start_server(config).await?;
    println!("rigger server listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
