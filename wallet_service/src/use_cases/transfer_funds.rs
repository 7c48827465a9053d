use std::sync::Arc;

use chrono::Utc;
use common::WalletEvent;
use rust_decimal::Decimal;

use crate::domain::error::WalletError;
use crate::domain::event_publisher::EventPublisher;
use crate::domain::repository::{TransferOutcome, WalletRepository};
use crate::domain::types::WalletId;

/// Receipt devuelto por una transferencia completada.
pub struct TransferReceipt {
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Decimal,
}

/// Caso de uso de transferencia, pessimistically-locked (§4.1 Transfer).
///
/// El bloqueo determinista de ambas filas (orden lexicográfico de `WalletId`) ocurre
/// dentro del repositorio; este caso de uso solo decide qué evento publicar según el
/// resultado — `TRANSFER_COMPLETED` si se aplicó, `TRANSFER_FAILED` (publicado antes de
/// devolver el error) si el saldo era insuficiente.
pub struct TransferFundsUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl TransferFundsUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            wallet_repo,
            publisher,
        }
    }

    #[tracing::instrument(name = "TransferFundsUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        from_id: WalletId,
        to_id: WalletId,
        amount: Decimal,
    ) -> Result<TransferReceipt, WalletError> {
        if amount <= Decimal::ZERO || amount.scale() > 4 {
            return Err(WalletError::InvalidData(
                "amount must be strictly positive with at most 4 decimal places".into(),
            ));
        }
        if from_id == to_id {
            return Err(WalletError::SelfTransfer(from_id));
        }

        match self.wallet_repo.transfer(from_id, to_id, amount).await? {
            TransferOutcome::Applied {
                from,
                to,
                out_tx,
                in_tx,
            } => {
                let event = WalletEvent::TransferCompleted {
                    from_wallet_id: from.id().to_string(),
                    to_wallet_id: to.id().to_string(),
                    from_user_id: from.user_id().to_string(),
                    to_user_id: to.user_id().to_string(),
                    amount,
                    from_transaction_id: out_tx.id().to_string(),
                    to_transaction_id: in_tx.id().to_string(),
                    timestamp: Utc::now(),
                };

                if let Err(e) = self.publisher.publish(&event).await {
                    tracing::error!(error = %e, from = %from.id(), to = %to.id(), "failed to publish TRANSFER_COMPLETED");
                }

                Ok(TransferReceipt {
                    from_wallet_id: from.id(),
                    to_wallet_id: to.id(),
                    amount,
                })
            }
            TransferOutcome::InsufficientFunds { from, to } => {
                let event = WalletEvent::TransferFailed {
                    from_wallet_id: from.id().to_string(),
                    to_wallet_id: to.id().to_string(),
                    from_user_id: Some(from.user_id().to_string()),
                    amount,
                    reason: "insufficient balance".to_string(),
                    transaction_id: None,
                    timestamp: Utc::now(),
                };

                if let Err(e) = self.publisher.publish(&event).await {
                    tracing::error!(error = %e, from = %from.id(), "failed to publish TRANSFER_FAILED");
                }

                Err(WalletError::InsufficientFunds(from.id()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{TransactionKind, TransactionStatus, Wallet, WalletTransaction};
    use crate::domain::event_publisher::MockEventPublisher;
    use crate::domain::repository::MockWalletRepository;
    use crate::domain::types::UserId;
    use rust_decimal_macros::dec;

    fn wallet(id: WalletId, user_id: UserId, balance: Decimal) -> Wallet {
        Wallet::reconstitute(id, user_id, balance, 0, chrono::Utc::now(), chrono::Utc::now())
    }

    #[tokio::test]
    async fn rejects_self_transfer_without_touching_repository() {
        let mock_repo = MockWalletRepository::new();
        let mock_publisher = MockEventPublisher::new();
        let id = WalletId::new();

        let use_case = TransferFundsUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(id, id, dec!(10.00)).await;

        assert!(matches!(result, Err(WalletError::SelfTransfer(_))));
    }

    #[tokio::test]
    async fn completed_transfer_publishes_transfer_completed() {
        let mut mock_repo = MockWalletRepository::new();
        let mut mock_publisher = MockEventPublisher::new();
        let from_id = WalletId::new();
        let to_id = WalletId::new();
        let user_a = UserId::new();
        let user_b = UserId::new();

        mock_repo.expect_transfer().times(1).returning(move |from, to, amount| {
            let from_wallet = wallet(from, user_a, dec!(90.00));
            let to_wallet = wallet(to, user_b, dec!(110.00));
            let out_tx = WalletTransaction::new(from, amount, TransactionKind::TransferOut, TransactionStatus::Completed, Some(to));
            let in_tx = WalletTransaction::new(to, amount, TransactionKind::TransferIn, TransactionStatus::Completed, Some(from));
            Ok(TransferOutcome::Applied {
                from: from_wallet,
                to: to_wallet,
                out_tx,
                in_tx,
            })
        });
        mock_publisher.expect_publish().returning(|event| {
            assert!(matches!(event, common::WalletEvent::TransferCompleted { .. }));
            Ok(())
        });

        let use_case = TransferFundsUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(from_id, to_id, dec!(10.00)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn insufficient_balance_publishes_transfer_failed_and_raises_error() {
        let mut mock_repo = MockWalletRepository::new();
        let mut mock_publisher = MockEventPublisher::new();
        let from_id = WalletId::new();
        let to_id = WalletId::new();
        let user_a = UserId::new();
        let user_b = UserId::new();

        mock_repo.expect_transfer().times(1).returning(move |from, to, _amount| {
            Ok(TransferOutcome::InsufficientFunds {
                from: wallet(from, user_a, dec!(5.00)),
                to: wallet(to, user_b, dec!(0.00)),
            })
        });
        mock_publisher.expect_publish().returning(|event| {
            assert!(matches!(event, common::WalletEvent::TransferFailed { .. }));
            Ok(())
        });

        let use_case = TransferFundsUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(from_id, to_id, dec!(100.00)).await;

        assert!(matches!(result, Err(WalletError::InsufficientFunds(id)) if id == from_id));
    }
}
