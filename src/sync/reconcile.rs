//! Row-level reconciliation of fresh attendee data against a sheet.
//!
//! Column A always holds the bare (namespace-stripped) person id, and lookups
//! compare bare forms on both sides.

use crate::components::crm::{bare_id, primary_email, primary_phone, Attendance, Person};
use crate::components::sheets::{Row, RowData, Sheet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Header of every sheet created for an event
pub const HEADER: [&str; 6] = [
    "Person ID",
    "Given Name",
    "Family Name",
    "Email",
    "Phone",
    "Status",
];

/// Number of columns owned by the sync; anything to the right is left alone
pub const COLUMN_COUNT: usize = HEADER.len();

/// Separator used when joining cells into a row signature
const SIGNATURE_DELIMITER: &str = "\u{1f}";

/// Header as owned strings
pub fn header_row() -> Vec<String> {
    HEADER.iter().map(|title| title.to_string()).collect()
}

/// Build the sheet row for one attendance and its (possibly unresolved) person
pub fn attendee_row(attendance: &Attendance, person: Option<&Person>) -> Row {
    vec![
        Some(bare_id(&attendance.person_id).to_string()),
        person.and_then(|p| p.given_name.clone()),
        person.and_then(|p| p.family_name.clone()),
        primary_email(person),
        primary_phone(person),
        attendance.status.clone(),
    ]
}

/// Comparable form of a row: the owned columns, blanks as empty strings
pub fn row_signature(row: &[Option<String>]) -> String {
    (0..COLUMN_COUNT)
        .map(|index| {
            row.get(index)
                .and_then(|cell| cell.as_deref())
                .unwrap_or("")
        })
        .collect::<Vec<_>>()
        .join(SIGNATURE_DELIMITER)
}

/// Single-row overwrite at a 1-based sheet row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    pub row_number: usize,
    pub row: Row,
}

/// Writes needed to bring one sheet up to date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetPlan {
    /// In-place updates, in attendance order
    pub updates: Vec<RowUpdate>,
    /// New rows, written as one block
    pub appends: Vec<Row>,
    /// 1-based row where the append block starts
    pub append_at: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl SheetPlan {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.appends.is_empty()
    }
}

/// Decide, for every attendee row, whether to update, append or skip
pub fn plan_sheet(sheet: &Sheet, attendees: &[Row]) -> SheetPlan {
    let rows = sheet.rows();

    // Index column A below the header once; the first occurrence of an id wins
    let mut index: HashMap<&str, (usize, &RowData)> = HashMap::new();
    for (position, row) in rows.iter().enumerate().skip(1) {
        if let Some(id) = row.cell(0) {
            index.entry(bare_id(id)).or_insert((position, row));
        }
    }

    let mut plan = SheetPlan {
        append_at: rows.len().max(1) + 1,
        ..Default::default()
    };

    // Same person listed twice; the later attendance wins, in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut latest: HashMap<&str, &Row> = HashMap::new();
    for attendee in attendees {
        match attendee.first().and_then(|cell| cell.as_deref()) {
            Some(id) if !id.is_empty() => {
                if latest.insert(id, attendee).is_none() {
                    order.push(id);
                }
            }
            _ => {
                warn!("Skipping attendance without a person id in '{}'", sheet.title());
                plan.skipped += 1;
            }
        }
    }

    for person_id in order {
        let Some(&attendee) = latest.get(person_id) else {
            continue;
        };

        match index.get(person_id) {
            Some(&(position, existing)) => {
                if row_signature(&existing.to_row()) == row_signature(attendee) {
                    plan.unchanged += 1;
                } else {
                    debug!("Row {} for {} changed", position + 1, person_id);
                    plan.updates.push(RowUpdate {
                        row_number: position + 1,
                        row: attendee.clone(),
                    });
                }
            }
            None => plan.appends.push(attendee.clone()),
        }
    }

    plan
}
