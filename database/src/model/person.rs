use serde::{Deserialize, Serialize};

use crate::consts::consts::PersonId;

/// A stored row of the `persons` table
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl Person {
    pub fn new_test(id: i32, email: &str, first_name: &str, last_name: &str, avatar: &str) -> Self {
        Person {
            id: PersonId(id),
            email: email.to_string(),
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            avatar: Some(avatar.to_string()),
        }
    }

    pub fn to_draft(&self) -> PersonDraft {
        PersonDraft {
            id: Some(self.id),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Mutable working copy of a person held by a session until commit.
///
/// `id` is `None` until the storage layer has inserted the row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PersonDraft {
    pub id: Option<PersonId>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl PersonDraft {
    pub fn new(email: impl Into<String>) -> Self {
        PersonDraft {
            id: None,
            email: email.into(),
            first_name: None,
            last_name: None,
            avatar: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// A single write handed to the storage layer on commit
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Insert(PersonDraft),
    Update(Person),
}

impl Change {
    pub fn email(&self) -> &str {
        match self {
            Change::Insert(draft) => &draft.email,
            Change::Update(person) => &person.email,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonColumn {
    Id,
    Email,
    FirstName,
    LastName,
    Avatar,
}

impl PersonColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            PersonColumn::Id => "id",
            PersonColumn::Email => "email",
            PersonColumn::FirstName => "first_name",
            PersonColumn::LastName => "last_name",
            PersonColumn::Avatar => "avatar",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersonOrder {
    pub column: PersonColumn,
    pub direction: SortDirection,
}

impl PersonOrder {
    pub fn new(column: PersonColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn asc(column: PersonColumn) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    pub fn desc(column: PersonColumn) -> Self {
        Self::new(column, SortDirection::Desc)
    }
}

/// Appends `id ASC` as a tie breaker so paging over a sort is stable
pub fn with_tiebreak(order: &[PersonOrder]) -> Vec<PersonOrder> {
    let mut ordering = order.to_vec();

    if !ordering.iter().any(|o| o.column == PersonColumn::Id) {
        ordering.push(PersonOrder::asc(PersonColumn::Id));
    }

    ordering
}
