use std::sync::Arc;

use crate::domain::error::HistoryError;
use crate::domain::repository::HistoryRepository;
use crate::use_cases::get_wallet_history::HistoryPage;

/// Paginated read of every history record projected across all of a user's wallets,
/// newest first.
#[derive(Clone)]
pub struct GetUserActivityUseCase {
    history_repo: Arc<dyn HistoryRepository>,
}

impl GetUserActivityUseCase {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }

    #[tracing::instrument(name = "GetUserActivityUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: &str,
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
            .get_user_activity(user_id, limit, offset)
            .await?;

        Ok(HistoryPage { records, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockHistoryRepository;

    #[tokio::test]
    async fn returns_repository_page() {
        let mut mock = MockHistoryRepository::new();
        mock.expect_get_user_activity()
            .withf(|id, limit, offset| id == "u-1" && *limit == 50 && *offset == 0)
            .returning(|_, _, _| Ok((vec![], 3)));

        let use_case = GetUserActivityUseCase::new(Arc::new(mock));
        let page = use_case.execute("u-1", 50, 0).await.unwrap();
        assert_eq!(page.total, 3);
    }
}
