use chrono::{DateTime, Utc};
use common::EventType;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::entities::HistoryRecord;
use crate::domain::error::HistoryError;

#[derive(Debug, FromRow)]
pub struct HistoryRecordModel {
    pub id: Uuid,
    pub wallet_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub event_type: String,
    pub transaction_id: String,
    pub event_data: Value,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryRecordModel {
    pub fn into_entity(self) -> Result<HistoryRecord, HistoryError> {
        let event_type = event_type_from_str(&self.event_type).ok_or_else(|| {
            HistoryError::RepositoryError(format!("unknown event_type column value: {}", self.event_type))
        })?;

        Ok(HistoryRecord::reconstitute(
            self.id,
            self.wallet_id,
            self.user_id,
            self.amount,
            event_type,
            self.transaction_id,
            self.event_data,
            self.recorded_at,
        ))
    }
}

/// `EventType` lives in `common` alongside the wire format and isn't tied to any
/// storage engine, so the text mapping for the `event_type` column is kept local to
/// this persistence module rather than derived with `sqlx::Type`.
pub fn event_type_as_str(event_type: EventType) -> &'static str {
    match event_type {
        EventType::WalletCreated => "WALLET_CREATED",
        EventType::WalletFunded => "WALLET_FUNDED",
        EventType::TransferCompleted => "TRANSFER_COMPLETED",
        EventType::TransferFailed => "TRANSFER_FAILED",
    }
}

pub fn event_type_from_str(s: &str) -> Option<EventType> {
    match s {
        "WALLET_CREATED" => Some(EventType::WalletCreated),
        "WALLET_FUNDED" => Some(EventType::WalletFunded),
        "TRANSFER_COMPLETED" => Some(EventType::TransferCompleted),
        "TRANSFER_FAILED" => Some(EventType::TransferFailed),
        _ => None,
    }
}
