use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use story_share_api::infrastructure::config::AppConfig;
use story_share_api::infrastructure::logging::init_logging;
use story_share_api::presentation::handlers::AppState;
use story_share_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use story_share_api::presentation::routes::configure;
use tracing::{error, info, warn};

fn build_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins {
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            error!(error = %e, "Invalid configuration");
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    init_logging(&config.log_level);
    info!(log_level = %config.log_level, "Logging initialized");
    if config.uses_dev_secret() {
        warn!("JWT_SECRET not set, falling back to insecure development secret");
    }

    let state = web::Data::new(AppState::in_memory(
        config.jwt_secret.clone(),
        config.jwt_ttl_secs,
    ));
    info!("Application state initialized with in-memory stores");

    let jwt_secret = config.jwt_secret.clone();
    let allowed_origins = config.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(build_cors(&allowed_origins))
            .configure(configure)
    });

    let bind_addr = config.bind_address();
    let server = server.bind((config.host.as_str(), config.port))?;
    info!(address = %bind_addr, origins = ?config.cors_allowed_origins, "Starting HTTP server");
    server.run().await
}
