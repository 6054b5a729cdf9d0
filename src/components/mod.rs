use crate::error::SyncResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// Export components
pub mod crm;
pub mod sheets;

use crm::time::is_upcoming;
use crm::{Attendance, Event, Person};
use sheets::{Row, Sheet};

/// Read side: where events, people and RSVPs come from
#[async_trait]
pub trait CrmSource: Send + Sync {
    /// Every event, across all pages
    async fn list_events(&self) -> SyncResult<Vec<Event>>;

    /// Every person, across all pages
    async fn list_all_people(&self) -> SyncResult<Vec<Person>>;

    /// Every attendance of one event, across all pages
    async fn list_attendances(&self, event_id: &str) -> SyncResult<Vec<Attendance>>;

    /// Events starting strictly after `now`
    async fn list_future_events(&self, now: DateTime<Utc>) -> SyncResult<Vec<Event>> {
        let events = self.list_events().await?;
        Ok(events
            .into_iter()
            .filter(|event| is_upcoming(event, now))
            .collect())
    }
}

/// Write side: the spreadsheet holding one sheet per event
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// All sheets of the spreadsheet, keyed by title, with grid data
    async fn list_sheets_by_name(&self, spreadsheet_id: &str) -> SyncResult<BTreeMap<String, Sheet>>;

    /// Add a sheet; with a header, freeze the first row and write the header into it
    async fn create_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        header: Option<&[String]>,
    ) -> SyncResult<()>;

    /// Append one row after the last row with data
    async fn append_row(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        row: &[Option<String>],
    ) -> SyncResult<()>;

    /// Overwrite a block of rows whose top-left cell is `{start_column}{start_row}`
    async fn write_rows(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        rows: &[Row],
        start_column: &str,
        start_row: usize,
    ) -> SyncResult<()>;
}
