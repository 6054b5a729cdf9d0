mod client;
pub mod models;
pub mod token;

pub use client::{a1_range, SheetsClient, VALUE_INPUT_OPTION};
pub use models::{CellData, GridData, Row, RowData, Sheet, SheetProperties, Spreadsheet};
pub use token::TokenManager;
