use thiserror::Error;

use crate::{
    consts::consts::FIRST_PAGE,
    persistence::{
        session::{CommitSummary, Session},
        storage::{PersonStore, StoreError},
    },
};

use super::{
    client::{FetchError, UserSource},
    upsert::process_data,
};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Failed to fetch users: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to store people: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncState {
    Fetching { page: u32 },
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub pages: u32,
    pub records: usize,
    pub created: usize,
    pub commit: CommitSummary,
}

/// Pulls every page from `source`, upserts the records and commits once after the last page.
///
/// Any error aborts the run before the commit, so the store is either fully synced or untouched.
/// The last page is the first one whose number reaches the reported `total_pages`.
#[tracing::instrument(skip_all)]
pub async fn run_sync<C, S>(source: &C, store: &mut S) -> Result<SyncReport, SyncError>
where
    C: UserSource + ?Sized,
    S: PersonStore + ?Sized,
{
    let mut session = Session::new(store);
    let mut report = SyncReport::default();
    let mut state = SyncState::Fetching { page: FIRST_PAGE };

    while let SyncState::Fetching { page } = state {
        let users_page = source.fetch_page(page).await?;

        let upsert = process_data(&users_page.data, &mut session).await?;

        log::debug!(
            "Page {}/{}: {} records, {} new",
            page,
            users_page.total_pages,
            users_page.data.len(),
            upsert.created
        );

        report.pages += 1;
        report.records += users_page.data.len();
        report.created += upsert.created;

        state = if page >= users_page.total_pages {
            SyncState::Done
        } else {
            SyncState::Fetching { page: page + 1 }
        };
    }

    report.commit = session.commit().await?;

    log::info!(
        "Synced {} records over {} pages: {} inserted, {} updated, {} unchanged",
        report.records,
        report.pages,
        report.commit.inserted,
        report.commit.updated,
        report.commit.unchanged
    );

    Ok(report)
}
