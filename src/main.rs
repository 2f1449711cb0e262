use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use rent_predictor::config::{ArtifactSettings, Settings};
use rent_predictor::core::RentPredictor;
use rent_predictor::routes::{self, predict::{json_config, AppState}};
use rent_predictor::services::{load_artifacts, ArtifactError, ArtifactFetcher, Artifacts};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

/// Download missing artifacts, then load and check all three
async fn prepare_artifacts(settings: &ArtifactSettings) -> Result<Artifacts, ArtifactError> {
    let fetcher = ArtifactFetcher::new(Duration::from_secs(settings.download_timeout_secs))?;
    fetcher.ensure_all(settings).await?;
    load_artifacts(settings)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting rent prediction service...");

    let artifacts = match prepare_artifacts(&settings.artifacts).await {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("Failed to load model/scaler/features: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "All artifacts loaded ({} features, model expects {})",
        artifacts.schema.len(),
        artifacts.model.n_features()
    );

    let predictor = RentPredictor::new(artifacts.schema, artifacts.scaler, artifacts.model)
        .with_reject_unknown_categories(settings.encoding.reject_unknown_categories);

    let app_state = AppState { predictor };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(json_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
