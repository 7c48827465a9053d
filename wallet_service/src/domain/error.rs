use crate::domain::types::{UserId, WalletId};
use thiserror::Error;

/// Taxonomía de errores de dominio de la Wallet Engine (§7 del diseño).
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet not found with id: {0}")]
    NotFound(WalletId),

    #[error("invalid wallet data: {0}")]
    InvalidData(String),

    #[error("insufficient funds in wallet: {0}")]
    InsufficientFunds(WalletId),

    #[error("optimistic lock exhausted after {attempts} attempts on wallet {wallet_id}")]
    OptimisticLockExhausted { wallet_id: WalletId, attempts: u8 },

    #[error("self-transfer is not allowed for wallet: {0}")]
    SelfTransfer(WalletId),

    #[error("owning user mismatch for wallet: {0}")]
    UserMismatch(UserId),

    #[error("repository error: {0}")]
    RepositoryError(String),

    #[error("event publication error: {0}")]
    PublicationError(String),
}
