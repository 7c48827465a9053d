use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{Wallet, WalletTransaction};
use crate::domain::error::WalletError;
use crate::domain::repository::{FundOutcome, TransferOutcome, WalletRepository};
use crate::domain::types::{UserId, WalletId};
use crate::infrastructure::persistence::models::WalletModel;

/// Repositorio de Billeteras basado en PostgreSQL.
///
/// `fund` aplica un único intento de CAS (sin bucle interno — el reintento vive en
/// `FundWalletUseCase`); `transfer` bloquea ambas filas en una sola sentencia
/// `SELECT ... FOR UPDATE` ordenada lexicográficamente por id, eliminando el clásico
/// deadlock A→B / B→A.
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_ledger_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &WalletTransaction,
    ) -> Result<(), WalletError> {
        sqlx::query(
            r#"
            INSERT INTO wallet_transactions
                (id, wallet_id, amount, kind, status, counterpart_wallet_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id())
        .bind(entry.wallet_id())
        .bind(entry.amount())
        .bind(entry.kind())
        .bind(entry.status())
        .bind(entry.counterpart_wallet_id())
        .bind(entry.created_at())
        .execute(&mut **tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: WalletId,
    ) -> Result<Option<Wallet>, WalletError> {
        let model = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT id, user_id, balance, version, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(model.map(WalletModel::into_entity))
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    async fn create(
        &self,
        wallet: Wallet,
        ledger_entry: WalletTransaction,
    ) -> Result<Wallet, WalletError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        let model = sqlx::query_as::<_, WalletModel>(
            r#"
            INSERT INTO wallets (id, user_id, balance, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, balance, version, created_at, updated_at
            "#,
        )
        .bind(wallet.id())
        .bind(wallet.user_id())
        .bind(wallet.balance())
        .bind(wallet.version())
        .bind(wallet.created_at())
        .bind(wallet.updated_at())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        self.insert_ledger_entry(&mut tx, &ledger_entry).await?;

        tx.commit()
            .await
            .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(model.into_entity())
    }

    async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, WalletError> {
        let model = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT id, user_id, balance, version, created_at, updated_at
            FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(model.map(WalletModel::into_entity))
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Wallet>, WalletError> {
        let models = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT id, user_id, balance, version, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(models.into_iter().map(WalletModel::into_entity).collect())
    }

    async fn fund(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        expected_version: i32,
    ) -> Result<FundOutcome, WalletError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        let wallet = self
            .find_by_id_in_tx(&mut tx, wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        let new_balance = wallet.balance_after_funding(amount);
        let new_version = wallet.version() + 1;

        let rows_affected = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1, version = $2, updated_at = now()
            WHERE id = $3 AND version = $4
            "#,
        )
        .bind(new_balance)
        .bind(new_version)
        .bind(wallet_id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?
        .rows_affected();

        if rows_affected == 0 {
            tx.rollback()
                .await
                .map_err(|e| WalletError::RepositoryError(e.to_string()))?;
            return Ok(FundOutcome::VersionConflict);
        }

        let ledger_entry = WalletTransaction::new(
            wallet_id,
            amount,
            crate::domain::entities::TransactionKind::Fund,
            crate::domain::entities::TransactionStatus::Completed,
            None,
        );
        self.insert_ledger_entry(&mut tx, &ledger_entry).await?;

        let updated = self
            .find_by_id_in_tx(&mut tx, wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))?;

        tx.commit()
            .await
            .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(FundOutcome::Applied(updated, ledger_entry))
    }

    async fn transfer(
        &self,
        from_id: WalletId,
        to_id: WalletId,
        amount: Decimal,
    ) -> Result<TransferOutcome, WalletError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        // Orden determinista para evitar el deadlock clásico A->B / B->A: se ordenan
        // los ids lexicográficamente y una única sentencia FOR UPDATE bloquea ambas
        // filas en ese orden de escaneo.
        let (first_id, second_id) = if from_id.0 <= to_id.0 {
            (from_id, to_id)
        } else {
            (to_id, from_id)
        };

        let models = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT id, user_id, balance, version, created_at, updated_at
            FROM wallets
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind([first_id.0, second_id.0])
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        if models.len() != 2 {
            let missing = if models.iter().any(|m| m.id == from_id) {
                to_id
            } else {
                from_id
            };
            return Err(WalletError::NotFound(missing));
        }

        let mut wallets = models
            .into_iter()
            .map(WalletModel::into_entity)
            .collect::<Vec<_>>();

        let (mut from_wallet, mut to_wallet) = if wallets[0].id() == from_id {
            (wallets.remove(0), wallets.remove(0))
        } else {
            let to = wallets.remove(0);
            let from = wallets.remove(0);
            (from, to)
        };

        if from_wallet.balance() < amount {
            tx.rollback()
                .await
                .map_err(|e| WalletError::RepositoryError(e.to_string()))?;
            return Ok(TransferOutcome::InsufficientFunds {
                from: from_wallet,
                to: to_wallet,
            });
        }

        let new_from_balance = from_wallet.balance() - amount;
        let new_to_balance = to_wallet.balance() + amount;

        sqlx::query(
            r#"UPDATE wallets SET balance = $1, version = version + 1, updated_at = now() WHERE id = $2"#,
        )
        .bind(new_from_balance)
        .bind(from_wallet.id())
        .execute(&mut *tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        sqlx::query(
            r#"UPDATE wallets SET balance = $1, version = version + 1, updated_at = now() WHERE id = $2"#,
        )
        .bind(new_to_balance)
        .bind(to_wallet.id())
        .execute(&mut *tx)
        .await
        .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        let out_tx = WalletTransaction::new(
            from_wallet.id(),
            amount,
            crate::domain::entities::TransactionKind::TransferOut,
            crate::domain::entities::TransactionStatus::Completed,
            Some(to_wallet.id()),
        );
        let in_tx = WalletTransaction::new(
            to_wallet.id(),
            amount,
            crate::domain::entities::TransactionKind::TransferIn,
            crate::domain::entities::TransactionStatus::Completed,
            Some(from_wallet.id()),
        );
        self.insert_ledger_entry(&mut tx, &out_tx).await?;
        self.insert_ledger_entry(&mut tx, &in_tx).await?;

        from_wallet = self
            .find_by_id_in_tx(&mut tx, from_wallet.id())
            .await?
            .ok_or(WalletError::NotFound(from_id))?;
        to_wallet = self
            .find_by_id_in_tx(&mut tx, to_wallet.id())
            .await?
            .ok_or(WalletError::NotFound(to_id))?;

        tx.commit()
            .await
            .map_err(|e| WalletError::RepositoryError(e.to_string()))?;

        Ok(TransferOutcome::Applied {
            from: from_wallet,
            to: to_wallet,
            out_tx,
            in_tx,
        })
    }
}

