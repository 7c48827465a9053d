use async_trait::async_trait;

use crate::domain::entities::HistoryRecord;
use crate::domain::error::HistoryError;

/// Whether a store call actually inserted a row or found the idempotency key already
/// applied. Lets the Projector (C7) decide whether there is anything new to log without
/// re-deriving it from row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Inserted,
    AlreadyApplied,
}

/// Port for the History Store (C3). Every store method is idempotent on
/// `transaction_id` — at-least-once delivery from the Event Log means the same
/// `HistoryRecord` may be offered more than once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    async fn store_event(&self, record: HistoryRecord) -> Result<StoreOutcome, HistoryError>;

    /// Stores both sides of a TRANSFER_COMPLETED event. Per §4.4, if either
    /// transaction id already exists the whole event is treated as already applied
    /// and neither row is written.
    async fn store_transfer_events(
        &self,
        out_record: HistoryRecord,
        in_record: HistoryRecord,
    ) -> Result<StoreOutcome, HistoryError>;

    async fn get_wallet_history(
        &self,
        wallet_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<HistoryRecord>, i64), HistoryError>;

    async fn get_user_activity(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<HistoryRecord>, i64), HistoryError>;
}
