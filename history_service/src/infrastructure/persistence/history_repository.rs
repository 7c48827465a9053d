use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::HistoryRecord;
use crate::domain::error::HistoryError;
use crate::domain::repository::{HistoryRepository, StoreOutcome};
use crate::infrastructure::persistence::models::{event_type_as_str, HistoryRecordModel};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PostgresHistoryRepository {
    pool: PgPool,
}

impl PostgresHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION))
}

async fn insert_record(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    record: &HistoryRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO history_records
            (id, wallet_id, user_id, amount, event_type, transaction_id, event_data, recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(record.id())
    .bind(record.wallet_id())
    .bind(record.user_id())
    .bind(record.amount())
    .bind(event_type_as_str(record.event_type()))
    .bind(record.transaction_id())
    .bind(record.event_data())
    .bind(record.recorded_at())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl HistoryRepository for PostgresHistoryRepository {
    async fn store_event(&self, record: HistoryRecord) -> Result<StoreOutcome, HistoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM history_records WHERE transaction_id = $1)",
        )
        .bind(record.transaction_id())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        if exists {
            tx.rollback()
                .await
                .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;
            return Ok(StoreOutcome::AlreadyApplied);
        }

        if let Err(e) = insert_record(&mut tx, &record).await {
            if is_unique_violation(&e) {
                tx.rollback()
                    .await
                    .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;
                return Ok(StoreOutcome::AlreadyApplied);
            }
            return Err(HistoryError::RepositoryError(e.to_string()));
        }

        tx.commit()
            .await
            .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        Ok(StoreOutcome::Inserted)
    }

    async fn store_transfer_events(
        &self,
        out_record: HistoryRecord,
        in_record: HistoryRecord,
    ) -> Result<StoreOutcome, HistoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        let keys = [out_record.transaction_id(), in_record.transaction_id()];
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM history_records WHERE transaction_id = ANY($1))",
        )
        .bind(&keys[..])
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        if exists {
            tx.rollback()
                .await
                .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;
            return Ok(StoreOutcome::AlreadyApplied);
        }

        for record in [&out_record, &in_record] {
            if let Err(e) = insert_record(&mut tx, record).await {
                if is_unique_violation(&e) {
                    tx.rollback()
                        .await
                        .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;
                    return Ok(StoreOutcome::AlreadyApplied);
                }
                return Err(HistoryError::RepositoryError(e.to_string()));
            }
        }

        tx.commit()
            .await
            .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        Ok(StoreOutcome::Inserted)
    }

    async fn get_wallet_history(
        &self,
        wallet_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<HistoryRecord>, i64), HistoryError> {
        let rows = sqlx::query_as::<_, HistoryRecordModel>(
            r#"
            SELECT id, wallet_id, user_id, amount, event_type, transaction_id, event_data, recorded_at
            FROM history_records
            WHERE wallet_id = $1
            ORDER BY recorded_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(wallet_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM history_records WHERE wallet_id = $1")
                .bind(wallet_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        let records = rows
            .into_iter()
            .map(HistoryRecordModel::into_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }

    async fn get_user_activity(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<HistoryRecord>, i64), HistoryError> {
        let rows = sqlx::query_as::<_, HistoryRecordModel>(
            r#"
            SELECT id, wallet_id, user_id, amount, event_type, transaction_id, event_data, recorded_at
            FROM history_records
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM history_records WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| HistoryError::RepositoryError(e.to_string()))?;

        let records = rows
            .into_iter()
            .map(HistoryRecordModel::into_entity)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }
}
