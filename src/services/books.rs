//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPageQuery, CreateBook, UpdateBook},
    models::page::validate_page_params,
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Get a sorted page of books
    pub async fn get_sorted_page(&self, query: &BookPageQuery) -> AppResult<(Vec<Book>, i64)> {
        validate_page_params(query.page, query.size)?;
        self.repository.books.find_page(query).await
    }

    /// Create a new book
    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;

        if self
            .repository
            .books
            .exists_by_author_and_name(&book.author, &book.name)
            .await?
        {
            return Err(AppError::BookAlreadyExists);
        }

        self.repository.books.create(&book).await
    }

    /// Update an existing book.
    ///
    /// Fields absent from the request keep their persisted values; the
    /// uniqueness check runs against the effective post-merge values,
    /// excluding the record itself.
    pub async fn update(&self, id: i64, update: UpdateBook) -> AppResult<Book> {
        update.validate()?;

        let persisted = self.repository.books.get_by_id(id).await?;
        let merged = update.apply(&persisted);

        if self
            .repository
            .books
            .exists_by_author_and_name_excluding(&merged.author, &merged.name, id)
            .await?
        {
            return Err(AppError::BookAlreadyExists);
        }

        self.repository
            .books
            .update(id, &merged.author, &merged.name)
            .await
    }

    /// Delete a book. Fails if any copy is currently issued.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
