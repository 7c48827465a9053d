use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::entities::{Wallet, WalletTransaction};
use crate::domain::error::WalletError;
use crate::domain::types::{UserId, WalletId};

/// Resultado de un intento de abono optimista (§4.1 Fund).
pub enum FundOutcome {
    /// La actualización condicional afectó exactamente una fila: el abono se aplicó.
    Applied(Wallet, WalletTransaction),
    /// `affected-row-count` fue 0: otra escritura cambió la versión leída. El llamador
    /// decide si reintenta.
    VersionConflict,
}

/// Resultado de una transferencia pessimistically-locked (§4.1 Transfer).
pub enum TransferOutcome {
    Applied {
        from: Wallet,
        to: Wallet,
        out_tx: WalletTransaction,
        in_tx: WalletTransaction,
    },
    /// Los saldos fueron releídos bajo el lock y resultaron insuficientes; ninguna fila
    /// del libro mayor fue insertada y ningún saldo fue mutado.
    InsufficientFunds { from: Wallet, to: Wallet },
}

/// Puerto (Port) de persistencia de billeteras. La implementación es responsable de la
/// atomicidad de cada operación (transacción local por llamada).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn create(
        &self,
        wallet: Wallet,
        ledger_entry: WalletTransaction,
    ) -> Result<Wallet, WalletError>;

    async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, WalletError>;

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Wallet>, WalletError>;

    /// Aplica un único intento de abono CAS. No reintenta — el bucle de reintento vive
    /// en el caso de uso (§4.1: solo el use-case observa el presupuesto de 3 intentos).
    async fn fund(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
        expected_version: i32,
    ) -> Result<FundOutcome, WalletError>;

    /// Bloquea ambas billeteras en orden determinista (ids ordenados lexicográficamente)
    /// y aplica la transferencia dentro de una única transacción.
    async fn transfer(
        &self,
        from_id: WalletId,
        to_id: WalletId,
        amount: Decimal,
    ) -> Result<TransferOutcome, WalletError>;
}
