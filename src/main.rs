use video_dl_web::{Config, api, logging};

/// Configuration file used when no path is given on the command line.
const DEFAULT_CONFIG: &str = "video-dl-web.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging()?;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let config = if std::path::Path::new(&path).exists() {
        tracing::info!(path = %path, "Loading configuration");
        Config::from_file(&path)?
    } else {
        tracing::warn!(path = %path, "Configuration file not found, using defaults");
        Config::default()
    };

    api::start_server(config).await?;
    Ok(())
}
