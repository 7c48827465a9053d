use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator shared between the wire format and the log lines emitted by both
/// services. Kept as its own small enum (rather than derived purely from `WalletEvent`)
/// because the Wallet Service wants to log it before it has built the full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "WALLET_CREATED")]
    WalletCreated,
    #[serde(rename = "WALLET_FUNDED")]
    WalletFunded,
    #[serde(rename = "TRANSFER_COMPLETED")]
    TransferCompleted,
    #[serde(rename = "TRANSFER_FAILED")]
    TransferFailed,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventType::WalletCreated => "WALLET_CREATED",
            EventType::WalletFunded => "WALLET_FUNDED",
            EventType::TransferCompleted => "TRANSFER_COMPLETED",
            EventType::TransferFailed => "TRANSFER_FAILED",
        };
        write!(f, "{s}")
    }
}

/// The single wire-format union for everything published to the event log.
///
/// Internally tagged on `event_type` so a consumer can deserialize straight into this
/// enum without a separate discriminator lookup — `serde` dispatches on the tag value
/// and the rest of the object is decoded as the matching variant's fields. Any field
/// not named below is ignored rather than rejected, so producers may add fields ahead
/// of consumers picking them up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum WalletEvent {
    #[serde(rename = "WALLET_CREATED")]
    WalletCreated {
        wallet_id: String,
        user_id: String,
        transaction_id: String,
        initial_balance: Decimal,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "WALLET_FUNDED")]
    WalletFunded {
        wallet_id: String,
        user_id: String,
        transaction_id: String,
        amount: Decimal,
        new_balance: Decimal,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "TRANSFER_COMPLETED")]
    TransferCompleted {
        from_wallet_id: String,
        to_wallet_id: String,
        from_user_id: String,
        to_user_id: String,
        amount: Decimal,
        from_transaction_id: String,
        to_transaction_id: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "TRANSFER_FAILED")]
    TransferFailed {
        from_wallet_id: String,
        to_wallet_id: String,
        from_user_id: Option<String>,
        amount: Decimal,
        reason: String,
        transaction_id: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl WalletEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            WalletEvent::WalletCreated { .. } => EventType::WalletCreated,
            WalletEvent::WalletFunded { .. } => EventType::WalletFunded,
            WalletEvent::TransferCompleted { .. } => EventType::TransferCompleted,
            WalletEvent::TransferFailed { .. } => EventType::TransferFailed,
        }
    }

    /// Partition keys this event must be published under. Single-wallet events get one
    /// key; transfer events get two (from and to), so each side's partition observes the
    /// transfer in order relative to its own other events (see Wallet Engine §4.2).
    pub fn partition_keys(&self) -> Vec<String> {
        match self {
            WalletEvent::WalletCreated { wallet_id, .. } => vec![wallet_id.clone()],
            WalletEvent::WalletFunded { wallet_id, .. } => vec![wallet_id.clone()],
            WalletEvent::TransferCompleted {
                from_wallet_id,
                to_wallet_id,
                ..
            } => vec![from_wallet_id.clone(), to_wallet_id.clone()],
            WalletEvent::TransferFailed {
                from_wallet_id,
                to_wallet_id,
                ..
            } => vec![from_wallet_id.clone(), to_wallet_id.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_funded_round_trips_through_json() {
        let event = WalletEvent::WalletFunded {
            wallet_id: "w-1".into(),
            user_id: "u-1".into(),
            transaction_id: "t-1".into(),
            amount: Decimal::new(1050, 2),
            new_balance: Decimal::new(2050, 2),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "WALLET_FUNDED");
        assert_eq!(json["amount"], "10.50");

        let decoded: WalletEvent = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.event_type(), EventType::WalletFunded);
    }

    #[test]
    fn transfer_completed_keys_both_sides() {
        let event = WalletEvent::TransferCompleted {
            from_wallet_id: "w-a".into(),
            to_wallet_id: "w-b".into(),
            from_user_id: "u-a".into(),
            to_user_id: "u-b".into(),
            amount: Decimal::new(100, 0),
            from_transaction_id: "t-out".into(),
            to_transaction_id: "t-in".into(),
            timestamp: Utc::now(),
        };

        assert_eq!(event.partition_keys(), vec!["w-a".to_string(), "w-b".to_string()]);
    }

    #[test]
    fn unknown_fields_on_the_wire_are_tolerated() {
        let raw = serde_json::json!({
            "event_type": "WALLET_CREATED",
            "wallet_id": "w-1",
            "user_id": "u-1",
            "transaction_id": "t-1",
            "initial_balance": "0.0000",
            "timestamp": Utc::now().to_rfc3339(),
            "schema_version": 7
        });

        let decoded: WalletEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(decoded.event_type(), EventType::WalletCreated);
    }
}
