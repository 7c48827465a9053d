use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use history_service::{
    api::{
        http_routes::{routes, AppState},
        response::ApiResponse,
    },
    config::Settings,
    infrastructure::{
        kafka_consumer::EventConsumer, persistence::history_repository::PostgresHistoryRepository,
    },
    use_cases::{
        get_user_activity::GetUserActivityUseCase, get_wallet_history::GetWalletHistoryUseCase,
        project_event::ProjectEventUseCase,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        history_service::api::http_routes::get_wallet_history,
        history_service::api::http_routes::get_user_activity
    ),
    components(schemas(
        history_service::api::http_routes::HistoryEventDto,
        history_service::api::http_routes::WalletHistoryResponse,
        history_service::api::http_routes::UserActivityResponse,
        ApiResponse<serde_json::Value>
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("starting history service");

    let settings = Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    info!("connected to database");

    let history_repo = Arc::new(PostgresHistoryRepository::new(pool));

    let get_wallet_history_use_case = GetWalletHistoryUseCase::new(history_repo.clone());
    let get_user_activity_use_case = GetUserActivityUseCase::new(history_repo.clone());
    let project_event_use_case = ProjectEventUseCase::new(history_repo.clone());

    let app_state = Arc::new(AppState {
        get_wallet_history_use_case,
        get_user_activity_use_case,
    });

    let app = routes(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let consumer = EventConsumer::new(
        &settings.kafka_broker,
        &settings.kafka_topic,
        &settings.consumer_group,
        settings.batch_size,
    )?;
    let shutdown = consumer.shutdown_handle();

    let consumer_task = tokio::spawn(async move {
        consumer.run(project_event_use_case).await;
    });

    let addr = settings.bind_addr();
    info!(%addr, "http server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.store(true, std::sync::atomic::Ordering::SeqCst);
    if tokio::time::timeout(Duration::from_secs(30), consumer_task)
        .await
        .is_err()
    {
        warn!("event consumer did not drain within 30s, forcing shutdown");
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}
