mod client;
pub mod lookup;
pub mod models;
pub mod time;

pub use client::{keys, CrmClient, API_TOKEN_HEADER};
pub use lookup::{bare_id, extract_id, find_person, primary_email, primary_phone};
pub use models::{Attendance, EmailAddress, Event, Person, PhoneNumber};
