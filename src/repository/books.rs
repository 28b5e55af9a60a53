//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPageQuery, CreateBook},
    models::page::page_offset,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    /// Fetch one sorted page of books plus the total count.
    /// Pages past the end come back empty, not as an error.
    pub async fn find_page(&self, query: &BookPageQuery) -> AppResult<(Vec<Book>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let offset = match page_offset(query.page, query.size) {
            Some(offset) => offset,
            None => return Ok((Vec::new(), total)),
        };

        // Sort column and direction come from allow-list enums, never raw input
        let select_query = format!(
            "SELECT * FROM books ORDER BY {} {} LIMIT $1 OFFSET $2",
            query.sort_by.column(),
            query.order.sql()
        );

        let books = sqlx::query_as::<_, Book>(&select_query)
            .bind(query.size)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Check if a book with this author and name already exists
    pub async fn exists_by_author_and_name(&self, author: &str, name: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE author = $1 AND name = $2)")
                .bind(author)
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Check if a different book already uses this author and name
    pub async fn exists_by_author_and_name_excluding(
        &self,
        author: &str,
        name: &str,
        exclude_id: i64,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE author = $1 AND name = $2 AND id != $3)",
        )
        .bind(author)
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new book and return the persisted record
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            "INSERT INTO books (author, name, available) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&book.author)
        .bind(&book.name)
        .bind(book.available)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist merged update values for an existing book
    pub async fn update(&self, id: i64, author: &str, name: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "UPDATE books SET author = $2, name = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(author)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::BookNotFound(id))
    }

    /// Delete a book unless a copy is currently issued.
    ///
    /// The row lock keeps a concurrent issue from slipping in between the
    /// holder check and the delete.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::BookNotFound(id));
        }

        let issued: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM issued_books WHERE book_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if issued {
            return Err(AppError::BookIssued);
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
