use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::domain::entities::HistoryRecord;
use crate::use_cases::{
    get_user_activity::GetUserActivityUseCase, get_wallet_history::GetWalletHistoryUseCase,
};

const DEFAULT_LIMIT: i64 = 50;
const DEFAULT_OFFSET: i64 = 0;

pub struct AppState {
    pub get_wallet_history_use_case: GetWalletHistoryUseCase,
    pub get_user_activity_use_case: GetUserActivityUseCase,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/history/wallets/{wallet_id}", get(get_wallet_history))
        .route("/history/users/{user_id}", get(get_user_activity))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEventDto {
    pub wallet_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub event_type: String,
    #[schema(value_type = Object)]
    pub event_data: Value,
}

impl From<&HistoryRecord> for HistoryEventDto {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            wallet_id: record.wallet_id().to_string(),
            user_id: record.user_id().to_string(),
            amount: record.amount(),
            event_type: record.event_type().to_string(),
            event_data: record.event_data().clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WalletHistoryResponse {
    pub wallet_id: String,
    pub events: Vec<HistoryEventDto>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserActivityResponse {
    pub user_id: String,
    pub events: Vec<HistoryEventDto>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// GET /history/wallets/{wallet_id}
#[utoipa::path(
    get,
    path = "/history/wallets/{wallet_id}",
    params(("wallet_id" = String, Path), ("limit" = Option<i64>, Query), ("offset" = Option<i64>, Query)),
    responses((status = 200, body = WalletHistoryResponse), (status = 422, description = "invalid pagination parameters"))
)]
pub async fn get_wallet_history(
    State(state): State<Arc<AppState>>,
    Path(wallet_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<WalletHistoryResponse>, ApiError> {
    let limit = page.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = page.offset.unwrap_or(DEFAULT_OFFSET);

    let page = state
        .get_wallet_history_use_case
        .execute(&wallet_id, limit, offset)
        .await?;

    Ok(Json(WalletHistoryResponse {
        wallet_id,
        events: page.records.iter().map(HistoryEventDto::from).collect(),
        total: page.total,
        limit,
        offset,
    }))
}

/// GET /history/users/{user_id}
#[utoipa::path(
    get,
    path = "/history/users/{user_id}",
    params(("user_id" = String, Path), ("limit" = Option<i64>, Query), ("offset" = Option<i64>, Query)),
    responses((status = 200, body = UserActivityResponse), (status = 422, description = "invalid pagination parameters"))
)]
pub async fn get_user_activity(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<UserActivityResponse>, ApiError> {
    let limit = page.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = page.offset.unwrap_or(DEFAULT_OFFSET);

    let page = state
        .get_user_activity_use_case
        .execute(&user_id, limit, offset)
        .await?;

    Ok(Json(UserActivityResponse {
        user_id,
        events: page.records.iter().map(HistoryEventDto::from).collect(),
        total: page.total,
        limit,
        offset,
    }))
}
