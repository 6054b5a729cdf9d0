#![allow(dead_code)]

use async_trait::async_trait;
use rsvp_sheets_sync::components::crm::{Attendance, EmailAddress, Event, Person, PhoneNumber};
use rsvp_sheets_sync::components::sheets::{Row, Sheet};
use rsvp_sheets_sync::components::{CrmSource, SheetStore};
use rsvp_sheets_sync::error::{remote_error, SyncResult, CRM_SERVICE};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// In-memory CRM with canned records
#[derive(Default)]
pub struct MockCrm {
    pub events: Vec<Event>,
    pub people: Vec<Person>,
    pub attendances: HashMap<String, Vec<Attendance>>,
    pub fail_attendances: bool,
    pub attendance_calls: Mutex<Vec<String>>,
}

impl MockCrm {
    pub fn with_event(mut self, id: &str, name: &str, start: &str) -> Self {
        self.events.push(Event {
            identifiers: vec![format!("action_network:{}", id)],
            name: name.to_string(),
            start_date: Some(start.to_string()),
        });
        self
    }

    pub fn with_person(mut self, id: &str, given: &str, family: &str, email: Option<&str>) -> Self {
        self.people.push(Person {
            identifiers: vec![format!("action_network:{}", id)],
            given_name: Some(given.to_string()),
            family_name: Some(family.to_string()),
            email_addresses: email
                .map(|address| EmailAddress {
                    address: Some(address.to_string()),
                    primary: true,
                })
                .into_iter()
                .collect(),
            phone_numbers: vec![PhoneNumber {
                number: Some("555-0100".to_string()),
                primary: false,
            }],
        });
        self
    }

    pub fn with_attendance(mut self, event_id: &str, person_id: &str, status: &str) -> Self {
        self.attendances
            .entry(event_id.to_string())
            .or_default()
            .push(Attendance {
                person_id: person_id.to_string(),
                status: Some(status.to_string()),
                ..Default::default()
            });
        self
    }

    /// Replace the status of one attendance
    pub fn set_status(&mut self, event_id: &str, person_id: &str, status: &str) {
        if let Some(list) = self.attendances.get_mut(event_id) {
            for attendance in list.iter_mut().filter(|a| a.person_id == person_id) {
                attendance.status = Some(status.to_string());
            }
        }
    }

    pub fn attendance_calls(&self) -> Vec<String> {
        self.attendance_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrmSource for MockCrm {
    async fn list_events(&self) -> SyncResult<Vec<Event>> {
        Ok(self.events.clone())
    }

    async fn list_all_people(&self) -> SyncResult<Vec<Person>> {
        Ok(self.people.clone())
    }

    async fn list_attendances(&self, event_id: &str) -> SyncResult<Vec<Attendance>> {
        self.attendance_calls
            .lock()
            .unwrap()
            .push(event_id.to_string());

        if self.fail_attendances {
            return Err(remote_error(
                CRM_SERVICE,
                &format!("events/{}/attendances", event_id),
                "HTTP 503 Service Unavailable",
            ));
        }

        Ok(self.attendances.get(event_id).cloned().unwrap_or_default())
    }
}

/// A write call recorded by the mock store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    Create { title: String },
    Append { sheet: String },
    Write { sheet: String, start_row: usize, rows: usize },
}

/// In-memory spreadsheet that applies writes to its grids
#[derive(Default)]
pub struct MockSheetStore {
    pub grids: Mutex<BTreeMap<String, Vec<Row>>>,
    pub calls: Mutex<Vec<SheetCall>>,
    pub list_calls: Mutex<usize>,
}

impl MockSheetStore {
    pub fn with_sheet(self, title: &str, rows: Vec<Row>) -> Self {
        self.grids.lock().unwrap().insert(title.to_string(), rows);
        self
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn grid(&self, title: &str) -> Vec<Row> {
        self.grids
            .lock()
            .unwrap()
            .get(title)
            .cloned()
            .unwrap_or_default()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl SheetStore for MockSheetStore {
    async fn list_sheets_by_name(&self, _spreadsheet_id: &str) -> SyncResult<BTreeMap<String, Sheet>> {
        *self.list_calls.lock().unwrap() += 1;

        Ok(self
            .grids
            .lock()
            .unwrap()
            .iter()
            .map(|(title, rows)| (title.clone(), Sheet::with_rows(title, rows)))
            .collect())
    }

    async fn create_sheet(
        &self,
        spreadsheet_id: &str,
        title: &str,
        header: Option<&[String]>,
    ) -> SyncResult<()> {
        self.calls.lock().unwrap().push(SheetCall::Create {
            title: title.to_string(),
        });
        self.grids.lock().unwrap().insert(title.to_string(), Vec::new());

        if let Some(header) = header {
            let row: Row = header.iter().cloned().map(Some).collect();
            self.append_row(spreadsheet_id, title, &row).await?;
        }
        Ok(())
    }

    async fn append_row(
        &self,
        _spreadsheet_id: &str,
        sheet_name: &str,
        row: &[Option<String>],
    ) -> SyncResult<()> {
        self.calls.lock().unwrap().push(SheetCall::Append {
            sheet: sheet_name.to_string(),
        });
        self.grids
            .lock()
            .unwrap()
            .entry(sheet_name.to_string())
            .or_default()
            .push(row.to_vec());
        Ok(())
    }

    async fn write_rows(
        &self,
        _spreadsheet_id: &str,
        sheet_name: &str,
        rows: &[Row],
        start_column: &str,
        start_row: usize,
    ) -> SyncResult<()> {
        assert_eq!(start_column, "A");
        assert!(start_row >= 1);

        self.calls.lock().unwrap().push(SheetCall::Write {
            sheet: sheet_name.to_string(),
            start_row,
            rows: rows.len(),
        });

        let mut grids = self.grids.lock().unwrap();
        let grid = grids.entry(sheet_name.to_string()).or_default();
        for (offset, row) in rows.iter().enumerate() {
            let index = start_row - 1 + offset;
            if grid.len() <= index {
                grid.resize(index + 1, Vec::new());
            }
            grid[index] = row.clone();
        }
        Ok(())
    }
}

/// Sheet row from string cells; empty strings are blank cells
pub fn cells(values: &[&str]) -> Row {
    values
        .iter()
        .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
        .collect()
}
