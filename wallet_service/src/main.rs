use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wallet_service::{
    api::{
        http_routes::{routes, AppState},
        response::ApiResponse,
    },
    config::Settings,
    infrastructure::{kafka::KafkaEventPublisher, persistence::wallet_repository::PostgresWalletRepository},
    use_cases::{
        create_wallet::CreateWalletUseCase, fund_wallet::FundWalletUseCase,
        get_user_wallets::GetWalletsUseCase, get_wallet::GetWalletUseCase,
        transfer_funds::TransferFundsUseCase,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        wallet_service::api::http_routes::create_wallet,
        wallet_service::api::http_routes::fund_wallet,
        wallet_service::api::http_routes::transfer_funds,
        wallet_service::api::http_routes::get_wallet_details,
        wallet_service::api::http_routes::list_user_wallets
    ),
    components(schemas(
        wallet_service::api::http_routes::CreateWalletRequest,
        wallet_service::api::http_routes::FundWalletRequest,
        wallet_service::api::http_routes::TransferRequest,
        wallet_service::api::http_routes::WalletResponse,
        wallet_service::api::http_routes::WalletListResponse,
        wallet_service::api::http_routes::TransferResponse,
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

    info!("starting wallet service");

    let settings = Settings::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    info!("connected to database");

    let wallet_repo = Arc::new(PostgresWalletRepository::new(pool.clone()));
    let publisher = Arc::new(
        KafkaEventPublisher::new(&settings.kafka_broker, settings.kafka_topic.clone()).await?,
    );

    let create_wallet_use_case = CreateWalletUseCase::new(wallet_repo.clone(), publisher.clone());
    let fund_wallet_use_case = FundWalletUseCase::new(wallet_repo.clone(), publisher.clone());
    let transfer_funds_use_case = TransferFundsUseCase::new(wallet_repo.clone(), publisher.clone());
    let get_wallet_use_case = GetWalletUseCase::new(wallet_repo.clone());
    let get_user_wallets_use_case = GetWalletsUseCase::new(wallet_repo.clone());

    let app_state = Arc::new(AppState {
        create_wallet_use_case,
        fund_wallet_use_case,
        transfer_funds_use_case,
        get_wallet_use_case,
        get_user_wallets_use_case,
    });

    let app = routes(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = settings.bind_addr();
    info!(%addr, "http server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
