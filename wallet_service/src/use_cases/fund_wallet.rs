use std::sync::Arc;

use common::WalletEvent;
use rust_decimal::Decimal;

use crate::domain::entities::Wallet;
use crate::domain::error::WalletError;
use crate::domain::event_publisher::EventPublisher;
use crate::domain::repository::{FundOutcome, WalletRepository};
use crate::domain::types::WalletId;

const MAX_FUND_ATTEMPTS: u8 = 3;

/// Caso de uso de abono con control de concurrencia optimista (§4.1 Fund).
///
/// Solo reintenta cuando el repositorio reporta `VersionConflict` (conflicto de
/// versión, cero filas afectadas). Cualquier otro error aborta el bucle de inmediato
/// y se propaga sin reintento.
pub struct FundWalletUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl FundWalletUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            wallet_repo,
            publisher,
        }
    }

    #[tracing::instrument(name = "FundWalletUseCase::execute", skip(self))]
    pub async fn execute(&self, wallet_id: WalletId, amount: Decimal) -> Result<Wallet, WalletError> {
        if amount <= Decimal::ZERO || amount.scale() > 4 {
            return Err(WalletError::InvalidData(
                "amount must be strictly positive with at most 4 decimal places".into(),
            ));
        }

        let mut attempts: u8 = 0;
        loop {
            let current = self
                .wallet_repo
                .find_by_id(wallet_id)
                .await?
                .ok_or(WalletError::NotFound(wallet_id))?;

            attempts += 1;
            match self
                .wallet_repo
                .fund(wallet_id, amount, current.version())
                .await?
            {
                FundOutcome::Applied(wallet, ledger_entry) => {
                    let event = WalletEvent::WalletFunded {
                        wallet_id: wallet.id().to_string(),
                        user_id: wallet.user_id().to_string(),
                        transaction_id: ledger_entry.id().to_string(),
                        amount,
                        new_balance: wallet.balance(),
                        timestamp: chrono::Utc::now(),
                    };

                    if let Err(e) = self.publisher.publish(&event).await {
                        tracing::error!(error = %e, wallet_id = %wallet.id(), "failed to publish WALLET_FUNDED");
                    }

                    return Ok(wallet);
                }
                FundOutcome::VersionConflict => {
                    if attempts >= MAX_FUND_ATTEMPTS {
                        return Err(WalletError::OptimisticLockExhausted {
                            wallet_id,
                            attempts,
                        });
                    }
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{TransactionKind, TransactionStatus, WalletTransaction};
    use crate::domain::event_publisher::MockEventPublisher;
    use crate::domain::repository::MockWalletRepository;
    use crate::domain::types::UserId;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU8, Ordering};

    fn sample_wallet(wallet_id: WalletId, user_id: UserId, balance: Decimal, version: i32) -> Wallet {
        Wallet::reconstitute(wallet_id, user_id, balance, version, chrono::Utc::now(), chrono::Utc::now())
    }

    #[tokio::test]
    async fn applies_on_first_attempt() {
        let mut mock_repo = MockWalletRepository::new();
        let mut mock_publisher = MockEventPublisher::new();
        let wallet_id = WalletId::new();
        let user_id = UserId::new();

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_wallet(wallet_id, user_id, dec!(10.00), 0))));
        mock_repo.expect_fund().times(1).returning(move |id, amount, _version| {
            let wallet = sample_wallet(id, user_id, dec!(10.00) + amount, 1);
            let ledger = WalletTransaction::new(id, amount, TransactionKind::Fund, TransactionStatus::Completed, None);
            Ok(FundOutcome::Applied(wallet, ledger))
        });
        mock_publisher.expect_publish().returning(|_| Ok(()));

        let use_case = FundWalletUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(wallet_id, dec!(5.00)).await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap().balance(), dec!(15.00));
    }

    #[tokio::test]
    async fn retries_on_version_conflict_then_succeeds() {
        let mut mock_repo = MockWalletRepository::new();
        let mut mock_publisher = MockEventPublisher::new();
        let wallet_id = WalletId::new();
        let user_id = UserId::new();
        let call_count = Arc::new(AtomicU8::new(0));
        let call_count_clone = call_count.clone();

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_wallet(wallet_id, user_id, dec!(10.00), 0))));
        mock_repo.expect_fund().times(2).returning(move |id, amount, _version| {
            let attempt = call_count_clone.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                Ok(FundOutcome::VersionConflict)
            } else {
                let wallet = sample_wallet(id, user_id, dec!(10.00) + amount, 1);
                let ledger =
                    WalletTransaction::new(id, amount, TransactionKind::Fund, TransactionStatus::Completed, None);
                Ok(FundOutcome::Applied(wallet, ledger))
            }
        });
        mock_publisher.expect_publish().returning(|_| Ok(()));

        let use_case = FundWalletUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(wallet_id, dec!(5.00)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn exhausts_retry_budget_after_three_attempts() {
        let mut mock_repo = MockWalletRepository::new();
        let mock_publisher = MockEventPublisher::new();
        let wallet_id = WalletId::new();
        let user_id = UserId::new();

        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_wallet(wallet_id, user_id, dec!(10.00), 0))));
        mock_repo
            .expect_fund()
            .times(3)
            .returning(|_, _, _| Ok(FundOutcome::VersionConflict));

        let use_case = FundWalletUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(wallet_id, dec!(5.00)).await;

        assert!(matches!(
            result,
            Err(WalletError::OptimisticLockExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let mock_repo = MockWalletRepository::new();
        let mock_publisher = MockEventPublisher::new();
        let wallet_id = WalletId::new();

        let use_case = FundWalletUseCase::new(Arc::new(mock_repo), Arc::new(mock_publisher));
        let result = use_case.execute(wallet_id, dec!(0.00)).await;

        assert!(matches!(result, Err(WalletError::InvalidData(_))));
    }
}
