//! Lending coordinator
//!
//! Issues and returns book copies. Each operation is a single atomic
//! check-and-mutate against the store (see `repository::lending`); the
//! per-pair state machine is NOT_ISSUED --issue--> ISSUED and
//! ISSUED --return--> NOT_ISSUED, and any other transition fails rather
//! than silently normalizing.

use crate::{error::AppResult, models::user::UserDetails, repository::Repository};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Issue a book to a user and return the updated user view
    pub async fn issue_book(&self, user_id: i64, book_id: i64) -> AppResult<UserDetails> {
        self.repository.lending.issue(user_id, book_id).await?;
        tracing::info!(user_id, book_id, "book issued");
        self.repository.users.get_details(user_id).await
    }

    /// Return a book from a user and return the updated user view
    pub async fn return_book(&self, user_id: i64, book_id: i64) -> AppResult<UserDetails> {
        self.repository.lending.return_book(user_id, book_id).await?;
        tracing::info!(user_id, book_id, "book returned");
        self.repository.users.get_details(user_id).await
    }
}
