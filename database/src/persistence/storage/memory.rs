use std::{cmp::Ordering, collections::BTreeMap};

use async_trait::async_trait;

use crate::{
    consts::consts::{PersonId, START_AT_ID},
    model::person::{
        with_tiebreak, Change, Person, PersonColumn, PersonDraft, PersonOrder, SortDirection,
    },
};

use super::{check_lengths, CommitResult, PersonStore, StoreError, StoreResult};

/// In-process store with the same constraints as the `persons` table
#[derive(Debug, Clone)]
pub struct MemoryStore {
    rows: BTreeMap<PersonId, Person>,
    next_id: PersonId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: START_AT_ID,
        }
    }

    /// Seeds the store, ids are assigned in order starting at 1
    pub fn with_people(people: Vec<PersonDraft>) -> StoreResult<Self> {
        let mut store = Self::new();
        store.apply(people.into_iter().map(Change::Insert).collect())?;
        Ok(store)
    }

    pub fn people(&self) -> Vec<Person> {
        self.rows.values().cloned().collect()
    }

    // Applies onto a copy so a failing change leaves the store untouched
    fn apply(&mut self, changes: Vec<Change>) -> StoreResult<CommitResult> {
        let mut rows = self.rows.clone();
        let mut next_id = self.next_id;
        let mut result = CommitResult::default();

        for change in changes {
            match change {
                Change::Insert(draft) => {
                    check_lengths(&draft)?;
                    check_unique_email(&rows, &draft.email, None)?;

                    let person = Person {
                        id: next_id,
                        email: draft.email,
                        first_name: draft.first_name,
                        last_name: draft.last_name,
                        avatar: draft.avatar,
                    };

                    next_id = next_id.increment();
                    rows.insert(person.id, person.clone());
                    result.inserted.push(person);
                }
                Change::Update(person) => {
                    check_lengths(&person.to_draft())?;

                    if !rows.contains_key(&person.id) {
                        return Err(StoreError::NotFound(person.id));
                    }

                    check_unique_email(&rows, &person.email, Some(person.id))?;

                    rows.insert(person.id, person.clone());
                    result.updated.push(person);
                }
            }
        }

        self.rows = rows;
        self.next_id = next_id;

        Ok(result)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_unique_email(
    rows: &BTreeMap<PersonId, Person>,
    email: &str,
    own_id: Option<PersonId>,
) -> StoreResult<()> {
    let taken = rows
        .values()
        .any(|p| p.email == email && Some(p.id) != own_id);

    if taken {
        return Err(StoreError::UniqueConstraintViolation(email.to_string()));
    }

    Ok(())
}

// Nulls sort after every value, the way postgres orders an ASC column
fn compare_nullable(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn compare(a: &Person, b: &Person, order: &[PersonOrder]) -> Ordering {
    for o in order {
        let ordering = match o.column {
            PersonColumn::Id => a.id.cmp(&b.id),
            PersonColumn::Email => a.email.cmp(&b.email),
            PersonColumn::FirstName => compare_nullable(&a.first_name, &b.first_name),
            PersonColumn::LastName => compare_nullable(&a.last_name, &b.last_name),
            PersonColumn::Avatar => compare_nullable(&a.avatar, &b.avatar),
        };

        let ordering = match o.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        Ok(self.rows.values().find(|p| p.email == email).cloned())
    }

    async fn get(&self, id: PersonId) -> StoreResult<Option<Person>> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.rows.len())
    }

    async fn list(
        &self,
        order: &[PersonOrder],
        offset: usize,
        limit: usize,
    ) -> StoreResult<Vec<Person>> {
        let order = with_tiebreak(order);

        let mut people = self.people();
        people.sort_by(|a, b| compare(a, b, &order));

        Ok(people.into_iter().skip(offset).take(limit).collect())
    }

    async fn commit(&mut self, changes: Vec<Change>) -> StoreResult<CommitResult> {
        self.apply(changes)
    }
}

#[cfg(test)]
mod tests {
    use crate::consts::consts::EMAIL_MAX_LEN;

    use super::*;

    fn draft(email: &str, first_name: Option<&str>) -> PersonDraft {
        PersonDraft {
            first_name: first_name.map(str::to_string),
            ..PersonDraft::new(email)
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let mut store = MemoryStore::new();

        let result = store
            .commit(vec![
                Change::Insert(draft("a@example.com", Some("A"))),
                Change::Insert(draft("b@example.com", Some("B"))),
            ])
            .await
            .expect("commit should succeed");

        let ids: Vec<PersonId> = result.inserted.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PersonId(1), PersonId(2)]);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_rolls_back_whole_commit() {
        let mut store = MemoryStore::with_people(vec![draft("a@example.com", None)]).unwrap();

        let error = store
            .commit(vec![
                Change::Insert(draft("b@example.com", None)),
                Change::Insert(draft("a@example.com", None)),
            ])
            .await
            .expect_err("second insert violates the unique email");

        assert!(matches!(error, StoreError::UniqueConstraintViolation(e) if e == "a@example.com"));
        assert_eq!(store.count().await.unwrap(), 1, "first insert was rolled back");
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_row_fails() {
        let mut store = MemoryStore::new();

        let error = store
            .commit(vec![Change::Update(Person::new_test(
                7,
                "x@example.com",
                "X",
                "Y",
                "http://example.com/x.jpeg",
            ))])
            .await
            .expect_err("row 7 does not exist");

        assert!(matches!(error, StoreError::NotFound(PersonId(7))));
    }

    #[tokio::test]
    async fn overlong_email_is_rejected() {
        let mut store = MemoryStore::new();
        let email = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN));

        let error = store
            .commit(vec![Change::Insert(draft(&email, None))])
            .await
            .expect_err("email exceeds column width");

        assert!(matches!(error, StoreError::ValueTooLong { column: "email", .. }));
    }

    #[tokio::test]
    async fn list_orders_nulls_last_and_pages() {
        let store = MemoryStore::with_people(vec![
            draft("c@example.com", Some("Charles")),
            draft("a@example.com", None),
            draft("b@example.com", Some("Anna")),
        ])
        .unwrap();

        let by_first_name = store
            .list(&[PersonOrder::asc(PersonColumn::FirstName)], 0, 10)
            .await
            .unwrap();
        let emails: Vec<&str> = by_first_name.iter().map(|p| p.email.as_str()).collect();
        assert_eq!(emails, vec!["b@example.com", "c@example.com", "a@example.com"]);

        let page = store
            .list(&[PersonOrder::desc(PersonColumn::Email)], 1, 1)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].email, "b@example.com");
    }
}
