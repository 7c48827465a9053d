use std::sync::Arc;

use crate::domain::{
    entities::Wallet, error::WalletError, repository::WalletRepository, types::UserId,
};

/// Caso de uso para obtener todas las billeteras asociadas a un usuario.
#[derive(Clone)]
pub struct GetWalletsUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl GetWalletsUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }

    #[tracing::instrument(name = "GetWalletsUseCase::execute", skip(self))]
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<Wallet>, WalletError> {
        self.wallet_repo.find_by_user_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockWalletRepository;

    #[tokio::test]
    async fn test_get_wallets_success_empty() {
        let mut mock_repo = MockWalletRepository::new();
        let user_id = UserId::new();

        mock_repo
            .expect_find_by_user_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Ok(vec![]));

        let use_case = GetWalletsUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute(user_id).await;

        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_wallets_success_with_items() {
        let mut mock_repo = MockWalletRepository::new();
        let user_id = UserId::new();

        mock_repo
            .expect_find_by_user_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| {
                Ok(vec![
                    Wallet::builder().user_id(user_id).build().unwrap(),
                    Wallet::builder().user_id(user_id).build().unwrap(),
                ])
            });

        let use_case = GetWalletsUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute(user_id).await;

        let wallets = result.unwrap();
        assert_eq!(wallets.len(), 2);
    }

    #[tokio::test]
    async fn test_get_wallets_repository_error() {
        let mut mock_repo = MockWalletRepository::new();
        let user_id = UserId::new();

        mock_repo
            .expect_find_by_user_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(|_| Err(WalletError::RepositoryError("DB disconnected".to_string())));

        let use_case = GetWalletsUseCase::new(Arc::new(mock_repo));
        let result = use_case.execute(user_id).await;

        match result.unwrap_err() {
            WalletError::RepositoryError(_) => (),
            other => panic!("expected RepositoryError, got {other:?}"),
        }
    }
}
