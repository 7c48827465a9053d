use std::sync::Arc;

use common::{EventType, WalletEvent};
use tracing::{info, warn};

use crate::domain::entities::HistoryRecord;
use crate::domain::error::HistoryError;
use crate::domain::repository::{HistoryRepository, StoreOutcome};

/// The Event Projector (C7): turns one deserialized `WalletEvent` into 0, 1, or 2
/// `HistoryRecord`s and applies them idempotently. Dispatch is exhaustive over the
/// shared event enum — no string-based branching once the event is typed.
#[derive(Clone)]
pub struct ProjectEventUseCase {
    history_repo: Arc<dyn HistoryRepository>,
}

impl ProjectEventUseCase {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }

    #[tracing::instrument(name = "ProjectEventUseCase::execute", skip(self, event))]
    pub async fn execute(&self, event: &WalletEvent) -> Result<(), HistoryError> {
        let event_data = serde_json::to_value(event)
            .map_err(|e| HistoryError::SerializationError(e.to_string()))?;

        match event {
            WalletEvent::WalletCreated {
                wallet_id,
                user_id,
                transaction_id,
                initial_balance,
                ..
            } => {
                let record = HistoryRecord::new(
                    wallet_id.clone(),
                    user_id.clone(),
                    *initial_balance,
                    EventType::WalletCreated,
                    transaction_id.clone(),
                    event_data,
                );
                self.apply_single(record).await
            }
            WalletEvent::WalletFunded {
                wallet_id,
                user_id,
                transaction_id,
                amount,
                ..
            } => {
                let record = HistoryRecord::new(
                    wallet_id.clone(),
                    user_id.clone(),
                    *amount,
                    EventType::WalletFunded,
                    transaction_id.clone(),
                    event_data,
                );
                self.apply_single(record).await
            }
            WalletEvent::TransferCompleted {
                from_wallet_id,
                to_wallet_id,
                from_user_id,
                to_user_id,
                amount,
                from_transaction_id,
                to_transaction_id,
                ..
            } => {
                let out_record = HistoryRecord::new(
                    from_wallet_id.clone(),
                    from_user_id.clone(),
                    *amount,
                    EventType::TransferCompleted,
                    from_transaction_id.clone(),
                    event_data.clone(),
                );
                let in_record = HistoryRecord::new(
                    to_wallet_id.clone(),
                    to_user_id.clone(),
                    *amount,
                    EventType::TransferCompleted,
                    to_transaction_id.clone(),
                    event_data,
                );
                match self
                    .history_repo
                    .store_transfer_events(out_record, in_record)
                    .await?
                {
                    StoreOutcome::Inserted => {
                        info!(%from_wallet_id, %to_wallet_id, "transfer projected");
                    }
                    StoreOutcome::AlreadyApplied => {
                        info!(%from_wallet_id, %to_wallet_id, "transfer already projected, skipping");
                    }
                }
                Ok(())
            }
            WalletEvent::TransferFailed {
                from_wallet_id,
                from_user_id,
                amount,
                transaction_id,
                timestamp,
                ..
            } => {
                let txn_id = transaction_id.clone().unwrap_or_else(|| {
                    format!("failed-{}-{}", timestamp.to_rfc3339(), from_wallet_id)
                });
                let record = HistoryRecord::new(
                    from_wallet_id.clone(),
                    from_user_id.clone().unwrap_or_default(),
                    *amount,
                    EventType::TransferFailed,
                    txn_id,
                    event_data,
                );
                self.apply_single(record).await
            }
        }
    }

    async fn apply_single(&self, record: HistoryRecord) -> Result<(), HistoryError> {
        match self.history_repo.store_event(record.clone()).await? {
            StoreOutcome::Inserted => {
                info!(wallet_id = %record.wallet_id(), event_type = %record.event_type(), "event projected");
            }
            StoreOutcome::AlreadyApplied => {
                warn!(transaction_id = %record.transaction_id(), "event already projected, skipping");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockHistoryRepository;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn wallet_created_stores_one_record() {
        let mut mock = MockHistoryRepository::new();
        mock.expect_store_event()
            .withf(|r| r.transaction_id() == "txn-1" && r.amount() == dec!(0))
            .times(1)
            .returning(|_| Ok(StoreOutcome::Inserted));

        let use_case = ProjectEventUseCase::new(Arc::new(mock));
        let event = WalletEvent::WalletCreated {
            wallet_id: "w-1".into(),
            user_id: "u-1".into(),
            transaction_id: "txn-1".into(),
            initial_balance: dec!(0),
            timestamp: Utc::now(),
        };

        use_case.execute(&event).await.unwrap();
    }

    #[tokio::test]
    async fn transfer_completed_stores_both_sides() {
        let mut mock = MockHistoryRepository::new();
        mock.expect_store_transfer_events()
            .withf(|out, inn| out.transaction_id() == "t-out" && inn.transaction_id() == "t-in")
            .times(1)
            .returning(|_, _| Ok(StoreOutcome::Inserted));

        let use_case = ProjectEventUseCase::new(Arc::new(mock));
        let event = WalletEvent::TransferCompleted {
            from_wallet_id: "w-a".into(),
            to_wallet_id: "w-b".into(),
            from_user_id: "u-a".into(),
            to_user_id: "u-b".into(),
            amount: dec!(25),
            from_transaction_id: "t-out".into(),
            to_transaction_id: "t-in".into(),
            timestamp: Utc::now(),
        };

        use_case.execute(&event).await.unwrap();
    }

    #[tokio::test]
    async fn redelivered_transfer_is_a_no_op() {
        let mut mock = MockHistoryRepository::new();
        mock.expect_store_transfer_events()
            .times(1)
            .returning(|_, _| Ok(StoreOutcome::AlreadyApplied));

        let use_case = ProjectEventUseCase::new(Arc::new(mock));
        let event = WalletEvent::TransferCompleted {
            from_wallet_id: "w-a".into(),
            to_wallet_id: "w-b".into(),
            from_user_id: "u-a".into(),
            to_user_id: "u-b".into(),
            amount: dec!(25),
            from_transaction_id: "t-out".into(),
            to_transaction_id: "t-in".into(),
            timestamp: Utc::now(),
        };

        use_case.execute(&event).await.unwrap();
    }

    #[tokio::test]
    async fn transfer_failed_synthesizes_a_key_when_missing() {
        let mut mock = MockHistoryRepository::new();
        mock.expect_store_event()
            .withf(|r| r.transaction_id().starts_with("failed-"))
            .times(1)
            .returning(|_| Ok(StoreOutcome::Inserted));

        let use_case = ProjectEventUseCase::new(Arc::new(mock));
        let event = WalletEvent::TransferFailed {
            from_wallet_id: "w-a".into(),
            to_wallet_id: "w-b".into(),
            from_user_id: Some("u-a".into()),
            amount: dec!(999),
            reason: "insufficient funds".into(),
            transaction_id: None,
            timestamp: Utc::now(),
        };

        use_case.execute(&event).await.unwrap();
    }
}
