use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::entities::{TransactionKind, TransactionStatus, Wallet, WalletTransaction};
use crate::domain::types::{TransactionId, UserId, WalletId};

/// Modelo de fila para la tabla `wallets`.
#[derive(Debug, FromRow)]
pub struct WalletModel {
    pub id: WalletId,
    pub user_id: UserId,
    pub balance: Decimal,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalletModel {
    pub fn into_entity(self) -> Wallet {
        Wallet::reconstitute(
            self.id,
            self.user_id,
            self.balance,
            self.version,
            self.created_at,
            self.updated_at,
        )
    }
}

/// Modelo de fila para la tabla `wallet_transactions` (libro mayor interno, append-only).
#[derive(Debug, FromRow)]
pub struct WalletTransactionModel {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub counterpart_wallet_id: Option<WalletId>,
    pub created_at: DateTime<Utc>,
}

impl From<WalletTransactionModel> for WalletTransaction {
    fn from(m: WalletTransactionModel) -> Self {
        WalletTransaction::reconstitute(
            m.id,
            m.wallet_id,
            m.amount,
            m.kind,
            m.status,
            m.counterpart_wallet_id,
            m.created_at,
        )
    }
}
