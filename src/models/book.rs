//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::page::{default_size, SortOrder};

/// Book record from the database.
///
/// The holder set is not stored on the book itself; it is derived from the
/// issued_books relation when needed (delete guard, user views).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub name: String,
    /// Copies currently not checked out. Never negative.
    pub available: i32,
}

/// Create book request. The identifier is server-assigned.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub author: String,
    pub name: String,
    pub available: i32,
}

impl CreateBook {
    pub fn validate(&self) -> AppResult<()> {
        if self.author.trim().is_empty() {
            return Err(AppError::Validation("author must not be blank".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be blank".to_string()));
        }
        if self.available < 1 {
            return Err(AppError::Validation("available must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Partial update for a book.
///
/// Omitted fields keep their persisted values. The available counter is not
/// part of the update surface; only the lending workflow moves it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub author: Option<String>,
    pub name: Option<String>,
}

impl UpdateBook {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref author) = self.author {
            if author.trim().is_empty() {
                return Err(AppError::Validation("author must not be blank".to_string()));
            }
        }
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name must not be blank".to_string()));
            }
        }
        Ok(())
    }

    /// Merge present fields onto the persisted record. A null field means
    /// "leave unchanged", never "clear".
    pub fn apply(&self, current: &Book) -> Book {
        Book {
            id: current.id,
            author: self
                .author
                .clone()
                .unwrap_or_else(|| current.author.clone()),
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            available: current.available,
        }
    }
}

/// Fields a book listing may be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookSortField {
    #[default]
    Id,
    Author,
    Name,
}

impl BookSortField {
    /// Column name for the ORDER BY clause. Restricted to this allow-list;
    /// never interpolate caller input directly.
    pub fn column(self) -> &'static str {
        match self {
            BookSortField::Id => "id",
            BookSortField::Author => "author",
            BookSortField::Name => "name",
        }
    }
}

/// Query parameters for the paginated book listing
#[derive(Debug, Deserialize)]
pub struct BookPageQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
    #[serde(default, rename = "sortBy")]
    pub sort_by: BookSortField,
    #[serde(default)]
    pub order: SortOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted() -> Book {
        Book {
            id: 3,
            author: "A. Writer".to_string(),
            name: "A Title".to_string(),
            available: 4,
        }
    }

    #[test]
    fn test_create_validation() {
        let book = CreateBook {
            author: "A. Writer".to_string(),
            name: "A Title".to_string(),
            available: 1,
        };
        assert!(book.validate().is_ok());

        let blank_author = CreateBook {
            author: "  ".to_string(),
            ..book_like("A Title", 1)
        };
        assert!(blank_author.validate().is_err());

        let zero_copies = book_like("A Title", 0);
        assert!(zero_copies.validate().is_err());
    }

    fn book_like(name: &str, available: i32) -> CreateBook {
        CreateBook {
            author: "A. Writer".to_string(),
            name: name.to_string(),
            available,
        }
    }

    #[test]
    fn test_update_merges_present_fields() {
        let update = UpdateBook {
            author: Some("B. Writer".to_string()),
            name: None,
        };
        let merged = update.apply(&persisted());
        assert_eq!(merged.id, 3);
        assert_eq!(merged.author, "B. Writer");
        assert_eq!(merged.name, "A Title");
        assert_eq!(merged.available, 4);
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let merged = UpdateBook::default().apply(&persisted());
        assert_eq!(merged.author, "A. Writer");
        assert_eq!(merged.name, "A Title");
        assert_eq!(merged.available, 4);
    }

    #[test]
    fn test_sort_field_columns() {
        assert_eq!(BookSortField::Id.column(), "id");
        assert_eq!(BookSortField::Author.column(), "author");
        assert_eq!(BookSortField::Name.column(), "name");
    }
}
