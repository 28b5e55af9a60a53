//! Lending repository: the transactional core of the issue/return workflow
//!
//! Every book copy is accounted for either by the book's available counter
//! or by exactly one row in issued_books, never both, never neither. This
//! module is the only code path that mutates either side of that invariant.

use sqlx::{Pool, Postgres, Transaction};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct LendingRepository {
    pool: Pool<Postgres>,
}

impl LendingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Issue a copy of a book to a user.
    ///
    /// The whole check-and-mutate sequence runs in one transaction with row
    /// locks on both records, so concurrent issues for the same book
    /// serialize and the available counter can never go negative.
    pub async fn issue(&self, user_id: i64, book_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let available = lock_pair(&mut tx, user_id, book_id).await?;
        if available == 0 {
            return Err(AppError::NoAvailableCopies);
        }

        let already_issued: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM issued_books WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_issued {
            return Err(AppError::BookAlreadyIssued);
        }

        sqlx::query("INSERT INTO issued_books (user_id, book_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE books SET available = available - 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Return a previously issued copy of a book from a user.
    pub async fn return_book(&self, user_id: i64, book_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        lock_pair(&mut tx, user_id, book_id).await?;

        let removed = sqlx::query("DELETE FROM issued_books WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        if removed.rows_affected() == 0 {
            return Err(AppError::BookNotIssued);
        }

        sqlx::query("UPDATE books SET available = available + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Lock the user row, then the book row, and report the book's current
/// available count. Lock order is user first on every code path so that
/// concurrent issue and return calls cannot deadlock.
async fn lock_pair(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    book_id: i64,
) -> AppResult<i32> {
    let user: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
    if user.is_none() {
        return Err(AppError::UserNotFound(user_id));
    }

    let available: Option<i32> =
        sqlx::query_scalar("SELECT available FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut **tx)
            .await?;

    available.ok_or(AppError::BookNotFound(book_id))
}
