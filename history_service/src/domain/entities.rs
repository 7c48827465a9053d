use chrono::{DateTime, Utc};
use common::EventType;
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

/// A flattened, deduplicated projection of one `WalletEvent`.
///
/// `transaction_id` is the idempotency key the History Store enforces uniqueness on;
/// a TRANSFER_COMPLETED event produces two of these (one per side), each carrying its
/// own transaction id out of the pair the event holds.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    id: Uuid,
    wallet_id: String,
    user_id: String,
    amount: Decimal,
    event_type: EventType,
    transaction_id: String,
    event_data: Value,
    recorded_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(
        wallet_id: String,
        user_id: String,
        amount: Decimal,
        event_type: EventType,
        transaction_id: String,
        event_data: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            user_id,
            amount,
            event_type,
            transaction_id,
            event_data,
            recorded_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: Uuid,
        wallet_id: String,
        user_id: String,
        amount: Decimal,
        event_type: EventType,
        transaction_id: String,
        event_data: Value,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            user_id,
            amount,
            event_type,
            transaction_id,
            event_data,
            recorded_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn wallet_id(&self) -> &str {
        &self.wallet_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn event_data(&self) -> &Value {
        &self.event_data
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn new_record_carries_supplied_fields() {
        let record = HistoryRecord::new(
            "wallet-1".into(),
            "user-1".into(),
            dec!(10.50),
            EventType::WalletFunded,
            "txn-1".into(),
            json!({"event_type": "WALLET_FUNDED"}),
        );

        assert_eq!(record.wallet_id(), "wallet-1");
        assert_eq!(record.transaction_id(), "txn-1");
        assert_eq!(record.amount(), dec!(10.50));
    }
}
