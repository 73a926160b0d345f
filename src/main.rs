use chirpy::configuration::get_configuration;
use chirpy::startup::run;
use chirpy::store::Database;
use chirpy::telemetry::init_telemetry;
use std::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    if let Err(e) = configuration.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            e.to_string(),
        ));
    }
    tracing::info!("Configuration loaded successfully");

    let database = Database::new(configuration.database.path.clone())
        .await
        .map_err(|e| {
            tracing::error!("Failed to open database document: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?;
    tracing::info!(path = %database.path().display(), "Database document ready");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, database, configuration)?;
    server.await
}
