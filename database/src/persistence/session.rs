use std::collections::HashMap;

use crate::model::person::{Change, Person, PersonDraft};

use super::storage::{PersonStore, StoreResult};

struct Tracked {
    /// Row as it was loaded from the store, `None` for entities registered with `add`
    original: Option<Person>,
    draft: PersonDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Unit of work over a `PersonStore`.
///
/// Every entity the session loads or registers is kept in an identity map keyed by email, and
/// lookups consult that map before the store. An entity added earlier in the session is therefore
/// visible to later lookups even though nothing has been written yet. Nothing reaches the store
/// until `commit`.
///
/// Entities are indexed by the email they had when tracked, callers must not change `email`.
pub struct Session<'s, S: PersonStore + ?Sized> {
    store: &'s mut S,
    tracked: Vec<Tracked>,
    by_email: HashMap<String, usize>,
}

impl<'s, S: PersonStore + ?Sized> Session<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Self {
            store,
            tracked: vec![],
            by_email: HashMap::new(),
        }
    }

    fn track(&mut self, tracked: Tracked) -> &mut PersonDraft {
        let index = self.tracked.len();
        self.by_email.insert(tracked.draft.email.clone(), index);
        self.tracked.push(tracked);

        &mut self.tracked[index].draft
    }

    /// Returns the tracked entity with this email, loading it from the store if needed
    pub async fn query_by_email(&mut self, email: &str) -> StoreResult<Option<&mut PersonDraft>> {
        if let Some(&index) = self.by_email.get(email) {
            return Ok(Some(&mut self.tracked[index].draft));
        }

        let found = match self.store.find_by_email(email).await? {
            Some(person) => person,
            None => return Ok(None),
        };

        Ok(Some(self.track(Tracked {
            draft: found.to_draft(),
            original: Some(found),
        })))
    }

    /// Registers a new entity for insertion and returns it for further changes
    pub fn add(&mut self, draft: PersonDraft) -> &mut PersonDraft {
        self.track(Tracked {
            original: None,
            draft,
        })
    }

    pub fn pending(&self) -> usize {
        self.tracked.len()
    }

    /// Builds the change set, untouched rows are left out
    fn changes(&self) -> (Vec<Change>, usize) {
        let mut changes = vec![];
        let mut unchanged = 0;

        for Tracked { original, draft } in &self.tracked {
            match (original, draft.id) {
                (Some(original), Some(id)) => {
                    let current = Person {
                        id,
                        email: draft.email.clone(),
                        first_name: draft.first_name.clone(),
                        last_name: draft.last_name.clone(),
                        avatar: draft.avatar.clone(),
                    };

                    if &current == original {
                        unchanged += 1;
                    } else {
                        changes.push(Change::Update(current));
                    }
                }
                _ => changes.push(Change::Insert(PersonDraft {
                    id: None,
                    ..draft.clone()
                })),
            }
        }

        (changes, unchanged)
    }

    /// Writes every pending change through the store in one atomic commit. The store is committed
    /// even when the change set is empty.
    pub async fn commit(self) -> StoreResult<CommitSummary> {
        let (changes, unchanged) = self.changes();

        let result = self.store.commit(changes).await?;

        Ok(CommitSummary {
            inserted: result.inserted.len(),
            updated: result.updated.len(),
            unchanged,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::persistence::storage::memory::MemoryStore;

    use super::*;

    fn seeded_store() -> MemoryStore {
        MemoryStore::with_people(vec![PersonDraft {
            first_name: Some("John".to_string()),
            ..PersonDraft::new("john@example.com")
        }])
        .expect("seed should commit")
    }

    #[tokio::test]
    async fn added_entity_is_visible_before_commit() {
        let mut store = seeded_store();
        let mut session = Session::new(&mut store);

        session.add(PersonDraft::new("jane@example.com")).first_name = Some("Jane".to_string());

        let found = session
            .query_by_email("jane@example.com")
            .await
            .unwrap()
            .expect("pending entity should be found");

        assert_eq!(found.first_name.as_deref(), Some("Jane"));
        assert!(found.is_new());
    }

    #[tokio::test]
    async fn nothing_is_written_without_commit() {
        let mut store = seeded_store();

        {
            let mut session = Session::new(&mut store);
            session.add(PersonDraft::new("jane@example.com"));
            assert_eq!(session.pending(), 1);
        }

        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn commit_skips_untouched_rows() {
        let mut store = seeded_store();
        let mut session = Session::new(&mut store);

        session
            .query_by_email("john@example.com")
            .await
            .unwrap()
            .expect("seeded person");

        let summary = session.commit().await.unwrap();

        assert_eq!(
            summary,
            CommitSummary {
                inserted: 0,
                updated: 0,
                unchanged: 1
            }
        );
    }

    #[tokio::test]
    async fn lookups_find_the_entity_they_loaded() {
        let mut store = seeded_store();
        let mut session = Session::new(&mut store);

        session.add(PersonDraft::new("jane@example.com"));
        session
            .query_by_email("john@example.com")
            .await
            .unwrap()
            .expect("seeded person")
            .last_name = Some("Smith".to_string());

        let john = session
            .query_by_email("john@example.com")
            .await
            .unwrap()
            .expect("tracked person");

        assert_eq!(john.last_name.as_deref(), Some("Smith"));
        assert_eq!(session.pending(), 2);
    }

    #[tokio::test]
    async fn commit_writes_updates_and_inserts() {
        let mut store = seeded_store();
        let mut session = Session::new(&mut store);

        let john = session
            .query_by_email("john@example.com")
            .await
            .unwrap()
            .expect("seeded person");
        john.last_name = Some("Smith".to_string());

        session.add(PersonDraft::new("jane@example.com"));

        let summary = session.commit().await.unwrap();

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(store.count().await.unwrap(), 2);

        let john = store.find_by_email("john@example.com").await.unwrap().unwrap();
        assert_eq!(john.last_name.as_deref(), Some("Smith"));
    }
}
