//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        page::page_offset,
        user::{CreateUser, User, UserDetails, UserPageQuery, UserSummary},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound(id))
    }

    /// Get user by ID together with the books currently issued to them
    pub async fn get_details(&self, id: i64) -> AppResult<UserDetails> {
        let user = self.get_by_id(id).await?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.*
            FROM books b
            JOIN issued_books ib ON ib.book_id = b.id
            WHERE ib.user_id = $1
            ORDER BY b.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserDetails {
            id: user.id,
            username: user.username,
            email: user.email,
            books,
        })
    }

    /// Fetch one sorted page of users plus the total count.
    /// Pages past the end come back empty, not as an error.
    pub async fn find_page(&self, query: &UserPageQuery) -> AppResult<(Vec<UserSummary>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let offset = match page_offset(query.page, query.size) {
            Some(offset) => offset,
            None => return Ok((Vec::new(), total)),
        };

        // Sort column and direction come from allow-list enums, never raw input
        let select_query = format!(
            "SELECT id, username, email FROM users ORDER BY {} {} LIMIT $1 OFFSET $2",
            query.sort_by.column(),
            query.order.sql()
        );

        let users = sqlx::query_as::<_, UserSummary>(&select_query)
            .bind(query.size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }

    /// Check if a user with this username or email already exists
    pub async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Check if a different user already uses this email
    pub async fn exists_by_email_excluding(&self, email: &str, exclude_id: i64) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id != $2)")
                .bind(email)
                .bind(exclude_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Insert a new user and return the persisted record
    pub async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist merged update values for an existing user
    pub async fn update(&self, id: i64, email: &str, password: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = $2, password = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(email)
        .bind(password)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound(id))
    }

    /// Delete a user unless they currently hold issued books.
    ///
    /// The row lock keeps a concurrent issue from slipping in between the
    /// held-books check and the delete.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::UserNotFound(id));
        }

        let holds_books: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM issued_books WHERE user_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if holds_books {
            return Err(AppError::UserHasIssuedBooks);
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
