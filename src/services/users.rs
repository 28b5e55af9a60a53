//! User management service

use crate::{
    error::{AppError, AppResult},
    models::page::validate_page_params,
    models::user::{CreateUser, UpdateUser, UserDetails, UserPageQuery, UserSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get user by ID, including their currently held books
    pub async fn get_by_id(&self, id: i64) -> AppResult<UserDetails> {
        self.repository.users.get_details(id).await
    }

    /// Get a sorted page of users
    pub async fn get_sorted_page(
        &self,
        query: &UserPageQuery,
    ) -> AppResult<(Vec<UserSummary>, i64)> {
        validate_page_params(query.page, query.size)?;
        self.repository.users.find_page(query).await
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> AppResult<UserDetails> {
        user.validate()?;

        if self
            .repository
            .users
            .exists_by_username_or_email(&user.username, &user.email)
            .await?
        {
            return Err(AppError::UserAlreadyExists);
        }

        let created = self.repository.users.create(&user).await?;

        Ok(UserDetails {
            id: created.id,
            username: created.username,
            email: created.email,
            books: Vec::new(),
        })
    }

    /// Update an existing user.
    ///
    /// Fields absent from the request keep their persisted values; the email
    /// uniqueness check runs against the effective post-merge value,
    /// excluding the record itself. The username is fixed at creation.
    pub async fn update(&self, id: i64, update: UpdateUser) -> AppResult<UserDetails> {
        update.validate()?;

        let persisted = self.repository.users.get_by_id(id).await?;
        let merged = update.apply(&persisted);

        if self
            .repository
            .users
            .exists_by_email_excluding(&merged.email, id)
            .await?
        {
            return Err(AppError::UserAlreadyExists);
        }

        self.repository
            .users
            .update(id, &merged.email, &merged.password)
            .await?;

        self.repository.users.get_details(id).await
    }

    /// Delete a user. Fails if they currently hold issued books.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
