use std::sync::Arc;

use crate::domain::entities::HistoryRecord;
use crate::domain::error::HistoryError;
use crate::domain::repository::HistoryRepository;

pub struct HistoryPage {
    pub records: Vec<HistoryRecord>,
    pub total: i64,
}

/// Paginated read of every history record projected for one wallet, newest first.
#[derive(Clone)]
pub struct GetWalletHistoryUseCase {
    history_repo: Arc<dyn HistoryRepository>,
}

impl GetWalletHistoryUseCase {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }

    #[tracing::instrument(name = "GetWalletHistoryUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        wallet_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<HistoryPage, HistoryError> {
        if !(1..=100).contains(&limit) {
            return Err(HistoryError::InvalidQuery(
                "limit must be between 1 and 100".into(),
            ));
        }
        if offset < 0 {
            return Err(HistoryError::InvalidQuery("offset must be >= 0".into()));
        }

        let (records, total) = self
            .history_repo
            .get_wallet_history(wallet_id, limit, offset)
            .await?;

        Ok(HistoryPage { records, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockHistoryRepository;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(101, 0)]
    #[case(50, -1)]
    #[case(-5, 10)]
    #[tokio::test]
    async fn rejects_out_of_range_pagination(#[case] limit: i64, #[case] offset: i64) {
        let use_case = GetWalletHistoryUseCase::new(Arc::new(MockHistoryRepository::new()));

        let err = use_case.execute("w-1", limit, offset).await.unwrap_err();
        assert!(matches!(err, HistoryError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn returns_repository_page() {
        let mut mock = MockHistoryRepository::new();
        mock.expect_get_wallet_history()
            .withf(|id, limit, offset| id == "w-1" && *limit == 50 && *offset == 0)
            .returning(|_, _, _| Ok((vec![], 0)));

        let use_case = GetWalletHistoryUseCase::new(Arc::new(mock));
        let page = use_case.execute("w-1", 50, 0).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }
}
