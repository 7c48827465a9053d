use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::WalletError;
use crate::domain::types::{TransactionId, UserId, WalletId};

/// Modelo de Entidad: Wallet.
/// Representa una billetera de un usuario e implementa optimistic locking vía `version`
/// (§3: identidad, `user_id`, balance, versión, timestamps — sin campos de divisa ni
/// etiqueta, que no forman parte del modelo de datos especificado).
///
/// # Examples
/// ```
/// use wallet_service::domain::entities::Wallet;
/// use wallet_service::domain::types::UserId;
///
/// let wallet = Wallet::builder().user_id(UserId::new()).build();
/// assert!(wallet.is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    id: WalletId,
    user_id: UserId,
    balance: Decimal,
    version: i32, // Optimistic locking
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Inicia la construcción de una instancia `Wallet` con el patrón Builder.
    pub fn builder() -> WalletBuilder {
        WalletBuilder::default()
    }

    /// Reconstruye una billetera cargada desde la persistencia.
    pub fn reconstitute(
        id: WalletId,
        user_id: UserId,
        balance: Decimal,
        version: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            balance,
            version,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> WalletId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Monto resultante de aplicar un abono; no muta `self` — el repositorio es la única
    /// capa que persiste una nueva versión, esta es una proyección puramente aritmética
    /// usada por los casos de uso para construir la fila a escribir.
    pub fn balance_after_funding(&self, amount: Decimal) -> Decimal {
        self.balance + amount
    }
}

/// Builder que asegura que, al instanciar `Wallet`, las reglas de negocio base
/// se cumplen (presencia de `user_id`).
#[derive(Default)]
pub struct WalletBuilder {
    user_id: Option<UserId>,
}

impl WalletBuilder {
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn build(self) -> Result<Wallet, WalletError> {
        let user_id = self
            .user_id
            .ok_or_else(|| WalletError::InvalidData("el campo user_id es obligatorio".into()))?;
        let now = Utc::now();

        Ok(Wallet {
            id: WalletId::new(),
            user_id,
            balance: Decimal::ZERO,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Tipo de movimiento registrado en el libro mayor interno.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Fund,
    TransferOut,
    TransferIn,
}

/// Resultado final de un movimiento. Una transacción fallida todavía se registra para
/// fines de auditoría (ver `TransferFailed`), pero nunca muta el saldo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Completed,
    Failed,
}

/// Registro de transacción del libro mayor interno (append-only).
/// Su identificador es el que se propaga como `transaction_id` en los eventos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    id: TransactionId,
    wallet_id: WalletId,
    amount: Decimal,
    kind: TransactionKind,
    status: TransactionStatus,
    counterpart_wallet_id: Option<WalletId>,
    created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(
        wallet_id: WalletId,
        amount: Decimal,
        kind: TransactionKind,
        status: TransactionStatus,
        counterpart_wallet_id: Option<WalletId>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            wallet_id,
            amount,
            kind,
            status,
            counterpart_wallet_id,
            created_at: Utc::now(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TransactionId,
        wallet_id: WalletId,
        amount: Decimal,
        kind: TransactionKind,
        status: TransactionStatus,
        counterpart_wallet_id: Option<WalletId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            wallet_id,
            amount,
            kind,
            status,
            counterpart_wallet_id,
            created_at,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn wallet_id(&self) -> WalletId {
        self.wallet_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn counterpart_wallet_id(&self) -> Option<WalletId> {
        self.counterpart_wallet_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_user_id() {
        let result = WalletBuilder::default().build();

        assert!(matches!(result, Err(WalletError::InvalidData(_))));
    }

    #[test]
    fn builder_produces_zeroed_wallet() {
        let wallet = Wallet::builder().user_id(UserId::new()).build().unwrap();

        assert_eq!(wallet.balance(), Decimal::ZERO);
        assert_eq!(wallet.version(), 0);
    }
}
