use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::response::ApiResponse;
use crate::domain::entities::Wallet;
use crate::domain::types::{UserId, WalletId};
use crate::use_cases::{
    create_wallet::CreateWalletUseCase, fund_wallet::FundWalletUseCase,
    get_user_wallets::GetWalletsUseCase, get_wallet::GetWalletUseCase,
    transfer_funds::TransferFundsUseCase,
};

/// Estado compartido de la aplicación, inyectado vía el extractor `State` de axum.
pub struct AppState {
    pub create_wallet_use_case: CreateWalletUseCase,
    pub fund_wallet_use_case: FundWalletUseCase,
    pub transfer_funds_use_case: TransferFundsUseCase,
    pub get_wallet_use_case: GetWalletUseCase,
    pub get_user_wallets_use_case: GetWalletsUseCase,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/wallets", post(create_wallet))
        .route("/wallets/{id}", get(get_wallet_details))
        .route("/wallets/{id}/fund", post(fund_wallet))
        .route("/wallets/{id}/transfer", post(transfer_funds))
        .route("/users/{id}/wallets", get(list_user_wallets))
        .with_state(state)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWalletRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FundWalletRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub to_wallet_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletResponse {
    pub id: String,
    pub user_id: String,
    pub balance: Decimal,
    pub version: i32,
}

impl From<Wallet> for WalletResponse {
    fn from(w: Wallet) -> Self {
        Self {
            id: w.id().to_string(),
            user_id: w.user_id().to_string(),
            balance: w.balance(),
            version: w.version(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletListResponse {
    pub wallets: Vec<WalletResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponse {
    pub from_wallet_id: String,
    pub to_wallet_id: String,
    pub amount: Decimal,
}

/// Crea una nueva billetera para un usuario.
#[utoipa::path(
    post,
    path = "/wallets",
    request_body = CreateWalletRequest,
    responses((status = 200, description = "Wallet created", body = ApiResponse<WalletResponse>))
)]
pub async fn create_wallet(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateWalletRequest>,
) -> Result<Json<ApiResponse<WalletResponse>>, ApiError> {
    let user_id = UserId::from_str(&payload.user_id)
        .map_err(|e| crate::domain::error::WalletError::InvalidData(e.to_string()))?;

    let wallet = state.create_wallet_use_case.execute(user_id).await?;

    Ok(Json(ApiResponse::success(wallet.into())))
}

/// Abona fondos a una billetera existente.
#[utoipa::path(
    post,
    path = "/wallets/{id}/fund",
    request_body = FundWalletRequest,
    responses((status = 200, description = "Wallet funded", body = ApiResponse<WalletResponse>))
)]
pub async fn fund_wallet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<FundWalletRequest>,
) -> Result<Json<ApiResponse<WalletResponse>>, ApiError> {
    let wallet_id = WalletId::from_str(&id)
        .map_err(|e| crate::domain::error::WalletError::InvalidData(e.to_string()))?;

    let wallet = state
        .fund_wallet_use_case
        .execute(wallet_id, payload.amount)
        .await?;

    Ok(Json(ApiResponse::success(wallet.into())))
}

/// Transfiere fondos entre dos billeteras.
#[utoipa::path(
    post,
    path = "/wallets/{id}/transfer",
    request_body = TransferRequest,
    responses((status = 200, description = "Transfer completed", body = ApiResponse<TransferResponse>))
)]
pub async fn transfer_funds(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TransferRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, ApiError> {
    let from_id = WalletId::from_str(&id)
        .map_err(|e| crate::domain::error::WalletError::InvalidData(e.to_string()))?;
    let to_id = WalletId::from_str(&payload.to_wallet_id)
        .map_err(|e| crate::domain::error::WalletError::InvalidData(e.to_string()))?;

    let receipt = state
        .transfer_funds_use_case
        .execute(from_id, to_id, payload.amount)
        .await?;

    Ok(Json(ApiResponse::success(TransferResponse {
        from_wallet_id: receipt.from_wallet_id.to_string(),
        to_wallet_id: receipt.to_wallet_id.to_string(),
        amount: receipt.amount,
    })))
}

/// Consulta los detalles de una billetera.
#[utoipa::path(
    get,
    path = "/wallets/{id}",
    responses((status = 200, description = "Wallet details", body = ApiResponse<WalletResponse>))
)]
pub async fn get_wallet_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WalletResponse>>, ApiError> {
    let wallet_id = WalletId::from_str(&id)
        .map_err(|e| crate::domain::error::WalletError::InvalidData(e.to_string()))?;

    let wallet = state.get_wallet_use_case.execute(wallet_id).await?;

    Ok(Json(ApiResponse::success(wallet.into())))
}

/// Lista todas las billeteras de un usuario.
#[utoipa::path(
    get,
    path = "/users/{id}/wallets",
    responses((status = 200, description = "User wallets", body = ApiResponse<WalletListResponse>))
)]
pub async fn list_user_wallets(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WalletListResponse>>, ApiError> {
    let user_id = UserId::from_str(&id)
        .map_err(|e| crate::domain::error::WalletError::InvalidData(e.to_string()))?;

    let wallets = state.get_user_wallets_use_case.execute(user_id).await?;

    Ok(Json(ApiResponse::success(WalletListResponse {
        wallets: wallets.into_iter().map(Into::into).collect(),
    })))
}
