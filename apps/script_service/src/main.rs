use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Extension, Router};
use dotenvy::dotenv;
use script_service::{
    app_module::AppState,
    app_router::application_router,
    config::{AppConfig, DatabaseConfig},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = AppConfig::from_env()?;

    let subscriber_builder = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE);

    if config.is_dev() {
        tracing::subscriber::set_global_default(
            subscriber_builder
                .compact()
                .pretty()
                .with_ansi(true)
                .finish(),
        )?;
    } else {
        tracing::subscriber::set_global_default(
            subscriber_builder.json().with_ansi(false).finish(),
        )?;
    }

    let database = match &config.database {
        Some(database_config) => Some(setup_mongodb(database_config).await?),
        None => {
            tracing::warn!("DATABASE_URI not set, signed-in users cannot save scripts");
            None
        }
    };

    let state = AppState::new(&config, database);
    let request_timeout = config.request_timeout;

    let app = Router::new().merge(application_router()).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|error: BoxError| async move {
                if error.is::<tower::timeout::error::Elapsed>() {
                    Ok(StatusCode::REQUEST_TIMEOUT)
                } else {
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Unhandled internal error: {}", error),
                    ))
                }
            }))
            .timeout(request_timeout)
            .layer(TraceLayer::new_for_http())
            .layer(Extension(state))
            .layer(
                CorsLayer::new()
                    .allow_origin(tower_http::cors::Any)
                    .allow_methods(tower_http::cors::Any)
                    .allow_headers(tower_http::cors::Any),
            )
            .into_inner(),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    tracing::info!("Server started, listening on {}", config.bind_address);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn setup_mongodb(config: &DatabaseConfig) -> anyhow::Result<mongodb::Database> {
    let client = mongodb::Client::with_uri_str(&config.uri).await?;
    tracing::info!("Using database {}", config.name);
    Ok(client.database(&config.name))
}
