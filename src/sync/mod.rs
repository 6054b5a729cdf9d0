pub mod reconcile;

use crate::components::crm::{extract_id, find_person, Event, Person};
use crate::components::sheets::Row;
use crate::components::{CrmSource, SheetStore};
use crate::error::SyncResult;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use reconcile::{attendee_row, header_row, plan_sheet};
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

pub use reconcile::{SheetPlan, HEADER};

/// Column every row write starts at
const START_COLUMN: &str = "A";

/// Outcome counters of one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub events: usize,
    pub sheets_created: usize,
    pub rows_updated: usize,
    pub rows_appended: usize,
    pub rows_unchanged: usize,
    pub rows_skipped: usize,
}

/// An event together with its attendee rows
#[derive(Debug, Clone)]
struct EventAttendees<'a> {
    event: &'a Event,
    rows: Vec<Row>,
}

/// Fetch one event's attendances and join each with its person
async fn load_attendees<'a, C>(
    crm: &C,
    event: &'a Event,
    people: &[Person],
) -> SyncResult<EventAttendees<'a>>
where
    C: CrmSource + ?Sized,
{
    let Some(event_id) = extract_id(event) else {
        warn!("Event '{}' has no identifier, skipping attendances", event.name);
        return Ok(EventAttendees {
            event,
            rows: Vec::new(),
        });
    };

    let attendances = crm.list_attendances(&event_id).await?;
    debug!("Event '{}' has {} attendances", event.name, attendances.len());

    let rows = attendances
        .iter()
        .map(|attendance| attendee_row(attendance, find_person(&attendance.person_id, people)))
        .collect();

    Ok(EventAttendees { event, rows })
}

/// Sync RSVPs of every event starting after `now` into the spreadsheet
pub async fn sync_rsvps<C, S>(
    crm: &C,
    sheets: &S,
    spreadsheet_id: &str,
    now: DateTime<Utc>,
) -> SyncResult<SyncReport>
where
    C: CrmSource + ?Sized,
    S: SheetStore + ?Sized,
{
    let mut report = SyncReport::default();

    // Get existing sheets
    let mut sheets_by_name = sheets.list_sheets_by_name(spreadsheet_id).await?;

    // Get events, dropping the ones already started
    let mut events = crm.list_future_events(now).await?;
    events.retain(|event| {
        let named = !event.name.trim().is_empty();
        if !named {
            warn!("Skipping event {:?} without a name", extract_id(event));
        }
        named
    });
    info!("Found {} upcoming events", events.len());

    // Create sheets for new events once the whole list has been scanned
    let mut seen = HashSet::new();
    let missing: Vec<&str> = events
        .iter()
        .map(|event| event.name.as_str())
        .filter(|name| !sheets_by_name.contains_key(*name) && seen.insert(*name))
        .collect();

    if !missing.is_empty() {
        let header = header_row();
        for title in &missing {
            sheets
                .create_sheet(spreadsheet_id, title, Some(header.as_slice()))
                .await?;
            report.sheets_created += 1;
        }

        // Refresh so new sheets come back with their header row
        sheets_by_name = sheets.list_sheets_by_name(spreadsheet_id).await?;
    }

    // There is no batch lookup of specific people, so load everyone once
    let people = crm.list_all_people().await?;
    info!("Loaded {} people", people.len());

    let bundles = try_join_all(
        events
            .iter()
            .map(|event| load_attendees(crm, event, &people)),
    )
    .await?;

    let mut synced_names = HashSet::new();
    for bundle in bundles {
        let event = bundle.event;
        let name = event.name.as_str();

        if !synced_names.insert(name) {
            warn!("Event name '{}' is used more than once, skipping duplicate", name);
            continue;
        }

        let Some(sheet) = sheets_by_name.get(name) else {
            error!("Sheet '{}' not found after creation, skipping event", name);
            continue;
        };

        let plan = plan_sheet(sheet, &bundle.rows);
        report.events += 1;
        report.rows_unchanged += plan.unchanged;
        report.rows_skipped += plan.skipped;

        if plan.is_empty() {
            debug!("Sheet '{}' is up to date", name);
            continue;
        }

        for update in &plan.updates {
            sheets
                .write_rows(
                    spreadsheet_id,
                    name,
                    std::slice::from_ref(&update.row),
                    START_COLUMN,
                    update.row_number,
                )
                .await?;
        }
        report.rows_updated += plan.updates.len();

        if !plan.appends.is_empty() {
            sheets
                .write_rows(
                    spreadsheet_id,
                    name,
                    &plan.appends,
                    START_COLUMN,
                    plan.append_at,
                )
                .await?;
            report.rows_appended += plan.appends.len();
        }

        info!(
            "Synced '{}': {} updated, {} appended, {} unchanged",
            name,
            plan.updates.len(),
            plan.appends.len(),
            plan.unchanged
        );
    }

    Ok(report)
}
