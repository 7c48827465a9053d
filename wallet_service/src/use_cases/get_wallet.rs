use std::sync::Arc;

use crate::domain::{
    entities::Wallet, error::WalletError, repository::WalletRepository, types::WalletId,
};

/// Caso de uso para obtener los detalles de una billetera en particular.
#[derive(Clone)]
pub struct GetWalletUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl GetWalletUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }

    #[tracing::instrument(name = "GetWalletUseCase::execute", skip(self))]
    pub async fn execute(&self, wallet_id: WalletId) -> Result<Wallet, WalletError> {
        self.wallet_repo
            .find_by_id(wallet_id)
            .await?
            .ok_or(WalletError::NotFound(wallet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{repository::MockWalletRepository, types::UserId};

    #[tokio::test]
    async fn test_get_wallet_success() {
        let mut mock_repo = MockWalletRepository::new();
        let wallet_id = WalletId::new();
        let user_id = UserId::new();

        mock_repo
            .expect_find_by_id()
            .withf(move |id| *id == wallet_id)
            .times(1)
            .returning(move |_| Ok(Some(Wallet::builder().user_id(user_id).build().unwrap())));

        let use_case = GetWalletUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute(wallet_id).await;

        assert!(result.is_ok());
        let wallet = result.unwrap();
        assert_eq!(wallet.user_id(), user_id);
    }

    #[tokio::test]
    async fn test_get_wallet_not_found() {
        let mut mock_repo = MockWalletRepository::new();
        let wallet_id = WalletId::new();

        mock_repo
            .expect_find_by_id()
            .withf(move |id| *id == wallet_id)
            .times(1)
            .returning(|_| Ok(None));

        let use_case = GetWalletUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute(wallet_id).await;

        match result.unwrap_err() {
            WalletError::NotFound(id) => assert_eq!(id, wallet_id),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_wallet_repository_error() {
        let mut mock_repo = MockWalletRepository::new();
        let wallet_id = WalletId::new();

        mock_repo
            .expect_find_by_id()
            .withf(move |id| *id == wallet_id)
            .times(1)
            .returning(|_| Err(WalletError::RepositoryError("DB disconnected".to_string())));

        let use_case = GetWalletUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute(wallet_id).await;

        match result.unwrap_err() {
            WalletError::RepositoryError(_) => (),
            other => panic!("expected RepositoryError, got {other:?}"),
        }
    }
}
