//! User model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::book::Book;
use super::page::{default_size, SortOrder};

// Username: alphanumeric edges, 5 to 10 chars total, single . _ - separators.
// The charset and length live in the regex; the no-doubled-separator rule is
// checked separately (the regex crate has no lookahead).
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._-]{3,8}[a-zA-Z0-9]$").unwrap());

// Email: the charset gate restricts the whole address (note: no +) and
// carries the 6-255 length bounds; the shape regex checks local@domain.tld.
static EMAIL_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._@%-]{6,255}$").unwrap());

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").unwrap());

static PASSWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9@$!%*#?&]{8,32}$").unwrap());

/// User row from the database. The password column is write-only; none of
/// the serialized views below carry it.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User view for paginated listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Full user view including currently held books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDetails {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Books currently checked out by this user
    pub books: Vec<Book>,
}

/// Create user request. The identifier is server-assigned.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    #[schema(write_only)]
    pub password: String,
}

impl CreateUser {
    pub fn validate(&self) -> AppResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

/// Partial update for a user.
///
/// Omitted fields keep their persisted values; the username is fixed at
/// creation and not part of the update surface.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub email: Option<String>,
    #[schema(write_only)]
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }
        if let Some(ref password) = self.password {
            validate_password(password)?;
        }
        Ok(())
    }

    /// Merge present fields onto the persisted record. A null field means
    /// "leave unchanged", never "clear".
    pub fn apply(&self, current: &User) -> User {
        User {
            id: current.id,
            username: current.username.clone(),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            password: self
                .password
                .clone()
                .unwrap_or_else(|| current.password.clone()),
        }
    }
}

/// Fields a user listing may be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserSortField {
    #[default]
    Id,
    Username,
    Email,
}

impl UserSortField {
    /// Column name for the ORDER BY clause, restricted to this allow-list
    pub fn column(self) -> &'static str {
        match self {
            UserSortField::Id => "id",
            UserSortField::Username => "username",
            UserSortField::Email => "email",
        }
    }
}

/// Query parameters for the paginated user listing
#[derive(Debug, Deserialize)]
pub struct UserPageQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default, rename = "sortBy")]
    pub sort_by: UserSortField,
    #[serde(default)]
    pub order: SortOrder,
}

fn is_separator(b: u8) -> bool {
    matches!(b, b'.' | b'_' | b'-')
}

fn has_doubled_separator(s: &str) -> bool {
    s.as_bytes()
        .windows(2)
        .any(|w| is_separator(w[0]) && is_separator(w[1]))
}

fn validate_username(username: &str) -> AppResult<()> {
    if !USERNAME_RE.is_match(username) || has_doubled_separator(username) {
        return Err(AppError::Validation(
            "username must be 5-10 characters, alphanumeric with single . _ - separators"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    if !EMAIL_CHARSET_RE.is_match(email) || !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> AppResult<()> {
    let has_letter = password.bytes().any(|b| b.is_ascii_alphabetic());
    let has_digit = password.bytes().any(|b| b.is_ascii_digit());
    let has_special = password
        .bytes()
        .any(|b| matches!(b, b'@' | b'$' | b'!' | b'%' | b'*' | b'#' | b'?' | b'&'));
    if !PASSWORD_RE.is_match(password) || !has_letter || !has_digit || !has_special {
        return Err(AppError::Validation(
            "password must be 8-32 characters with at least one letter, one digit and one special character"
                .to_string(),
        ));
    }
    Ok(())
}
