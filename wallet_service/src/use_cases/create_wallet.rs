use std::sync::Arc;

use common::WalletEvent;

use crate::domain::entities::{TransactionKind, TransactionStatus, Wallet, WalletTransaction};
use crate::domain::error::WalletError;
use crate::domain::event_publisher::EventPublisher;
use crate::domain::repository::WalletRepository;
use crate::domain::types::UserId;

/// Caso de uso que gestiona la creación de una Wallet (§4.1 Create).
///
/// Inserta la billetera y una fila de libro mayor FUND de monto cero en una sola
/// transacción, y solo después de que el repositorio confirma el commit emite
/// `WALLET_CREATED`.
pub struct CreateWalletUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateWalletUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            wallet_repo,
            publisher,
        }
    }

    #[tracing::instrument(name = "CreateWalletUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: UserId) -> Result<Wallet, WalletError> {
        let wallet = Wallet::builder().user_id(user_id).build()?;

        let ledger_entry = WalletTransaction::new(
            wallet.id(),
            rust_decimal::Decimal::ZERO,
            TransactionKind::Fund,
            TransactionStatus::Completed,
            None,
        );

        let created = self
            .wallet_repo
            .create(wallet, ledger_entry.clone())
            .await?;

        let event = WalletEvent::WalletCreated {
            wallet_id: created.id().to_string(),
            user_id: created.user_id().to_string(),
            transaction_id: ledger_entry.id().to_string(),
            initial_balance: created.balance(),
            timestamp: chrono::Utc::now(),
        };

        if let Err(e) = self.publisher.publish(&event).await {
            tracing::error!(error = %e, wallet_id = %created.id(), "failed to publish WALLET_CREATED");
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event_publisher::MockEventPublisher;
    use crate::domain::repository::MockWalletRepository;

    #[tokio::test]
    async fn creates_wallet_and_publishes_event() {
        let mut mock_repo = MockWalletRepository::new();
        let mut mock_publisher = MockEventPublisher::new();
        let user_id = UserId::new();

        mock_repo
            .expect_create()
            .returning(|wallet, _ledger| Ok(wallet));
        mock_publisher.expect_publish().returning(|_| Ok(()));

        let use_case = CreateWalletUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(user_id).await;

        assert!(result.is_ok());
        let wallet = result.unwrap();
        assert_eq!(wallet.user_id(), user_id);
        assert_eq!(wallet.balance(), rust_decimal::Decimal::ZERO);
    }

    #[tokio::test]
    async fn publication_failure_does_not_fail_the_operation() {
        let mut mock_repo = MockWalletRepository::new();
        let mut mock_publisher = MockEventPublisher::new();
        let user_id = UserId::new();

        mock_repo
            .expect_create()
            .returning(|wallet, _ledger| Ok(wallet));
        mock_publisher
            .expect_publish()
            .returning(|_| Err(crate::domain::event_publisher::PublicationError::BrokerUnreachable("down".into())));

        let use_case = CreateWalletUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(user_id).await;

        assert!(result.is_ok());
    }
}
