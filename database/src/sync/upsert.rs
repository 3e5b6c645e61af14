use crate::{
    model::person::PersonDraft,
    persistence::{
        session::Session,
        storage::{PersonStore, StoreResult},
    },
};

use super::client::UserRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpsertReport {
    pub created: usize,
    pub updated: usize,
}

/// Upserts each record into the session keyed by email, in input order.
///
/// New emails are registered for insertion, names and avatar are overwritten on every record.
/// Does not commit.
pub async fn process_data<S: PersonStore + ?Sized>(
    records: &[UserRecord],
    session: &mut Session<'_, S>,
) -> StoreResult<UpsertReport> {
    let mut report = UpsertReport::default();

    for record in records {
        let person = match session.query_by_email(&record.email).await? {
            Some(person) => {
                report.updated += 1;
                person
            }
            None => {
                log::info!("Created new person: {}", record.email);
                report.created += 1;
                session.add(PersonDraft::new(record.email.clone()))
            }
        };

        person.first_name = Some(record.first_name.clone());
        person.last_name = Some(record.last_name.clone());
        person.avatar = Some(record.avatar.clone());
    }

    Ok(report)
}
