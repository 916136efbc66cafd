use booking_server::{Config, Server, ServerState, init_logger, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // 1. Load configuration
    let config = Config::from_env();

    // 2. Set up logging (file logging in production, stdout otherwise)
    let _guard = if config.is_production() {
        Some(init_logger_with_file(&config.log_dir())?)
    } else {
        init_logger();
        None
    };

    tracing::info!("Booking server starting...");

    // 3. Initialize server state
    let state = ServerState::initialize(&config).await?;

    // 4. Run the HTTP server (also starts background tasks)
    let server = Server::with_state(config, state);
    server.run().await
}
