use serde::{Deserialize, Serialize};

/// One row of cell values; `None` is an empty cell
pub type Row = Vec<Option<String>>;

/// Spreadsheet as returned with `includeGridData=true`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

/// A single tab of the spreadsheet
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default)]
    pub properties: SheetProperties,
    #[serde(default)]
    pub data: Vec<GridData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub grid_properties: Option<GridProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<i64>,
    #[serde(default)]
    pub frozen_row_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub row_data: Vec<RowData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    #[serde(default)]
    pub values: Vec<CellData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_value: Option<String>,
}

impl Sheet {
    /// Build a sheet holding `rows`, as the API would return it
    pub fn with_rows(title: &str, rows: &[Row]) -> Self {
        let row_data = rows
            .iter()
            .map(|row| RowData {
                values: row
                    .iter()
                    .map(|cell| CellData {
                        formatted_value: cell.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            properties: SheetProperties {
                title: title.to_string(),
                ..Default::default()
            },
            data: vec![GridData { row_data }],
        }
    }

    pub fn title(&self) -> &str {
        &self.properties.title
    }

    /// Rows of the first grid, header included
    pub fn rows(&self) -> &[RowData] {
        self.data
            .first()
            .map(|grid| grid.row_data.as_slice())
            .unwrap_or(&[])
    }
}

impl RowData {
    /// Formatted value of a cell; blank cells read as `None`
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.values
            .get(index)
            .and_then(|cell| cell.formatted_value.as_deref())
            .filter(|value| !value.is_empty())
    }

    /// Comparable form of the row: every cell's formatted value
    pub fn to_row(&self) -> Row {
        (0..self.values.len())
            .map(|index| self.cell(index).map(str::to_string))
            .collect()
    }
}
