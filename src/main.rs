use clap::Parser;
use std::net::TcpListener;
use std::sync::Arc;
use chirpy::clock::SystemClock;
use chirpy::configuration::get_configuration;
use chirpy::startup::run;
use chirpy::store::Db;
use chirpy::telemetry::init_telemetry;

#[derive(Parser)]
#[command(name = "chirpy", about = "Chirpy API server")]
struct Cli {
    /// Delete the document before starting
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; real environment variables still apply
    let _ = dotenvy::dotenv();
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    if configuration.jwt.secret.is_empty() {
        tracing::warn!("JWT secret is empty; logins will fail until APP_JWT__SECRET is set");
    }

    let db_path = configuration.database.path.clone();
    if cli.debug {
        match tokio::fs::remove_file(&db_path).await {
            Ok(()) => tracing::info!(path = %db_path, "Debug mode: removed existing document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    let db = Db::open(&db_path).await.map_err(|e| {
        tracing::error!("Failed to open document store: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Document store error")
    })?;
    tracing::info!(path = %db_path, "Document store ready");

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(
        listener,
        Arc::new(db),
        configuration.jwt.clone(),
        configuration.polka.clone(),
        Arc::new(SystemClock),
    )?;
    tracing::info!("Server started successfully");

    server.await
}
