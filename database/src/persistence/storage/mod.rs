use async_trait::async_trait;
use thiserror::Error;

use crate::{
    consts::consts::{PersonId, AVATAR_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN},
    model::person::{Change, Person, PersonDraft, PersonOrder},
};

pub mod memory;
pub mod postgres;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    // Constraints
    #[error("Cannot add row as a person already exists with this email: {0}")]
    UniqueConstraintViolation(String),

    #[error("Value for column {column} is longer than {max} characters")]
    ValueTooLong { column: &'static str, max: usize },

    #[error("Cannot update, person does not exist: {0}")]
    NotFound(PersonId),
}

/// Result of applying a change set, rows are in the order of the changes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitResult {
    pub inserted: Vec<Person>,
    pub updated: Vec<Person>,
}

/// Persistence gateway over the `persons` table.
///
/// Reads take `&self` so a store can be shared between HTTP workers, `commit` needs exclusive
/// access and applies the whole change set or nothing.
#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>>;
    async fn get(&self, id: PersonId) -> StoreResult<Option<Person>>;
    async fn count(&self) -> StoreResult<usize>;
    /// Lists a window of rows, `order` is applied before `offset` / `limit`
    async fn list(
        &self,
        order: &[PersonOrder],
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Person>>;

    async fn commit(&mut self, changes: Vec<Change>) -> StoreResult<CommitResult>;
}

/// Column widths of the `persons` table, the first column that is too long is reported
pub(crate) fn check_lengths(draft: &PersonDraft) -> StoreResult<()> {
    let checks = [
        ("email", Some(&draft.email), EMAIL_MAX_LEN),
        ("first_name", draft.first_name.as_ref(), NAME_MAX_LEN),
        ("last_name", draft.last_name.as_ref(), NAME_MAX_LEN),
        ("avatar", draft.avatar.as_ref(), AVATAR_MAX_LEN),
    ];

    for (column, value, max) in checks {
        if value.map_or(false, |v| v.chars().count() > max) {
            return Err(StoreError::ValueTooLong { column, max });
        }
    }

    Ok(())
}
