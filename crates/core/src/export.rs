//! Tabular export of report and facility-type rows.
//!
//! Flattens entity rows (relations resolved) into a sheet, then renders the
//! sheet as delimited text or a spreadsheet workbook. Download filenames
//! follow `{kind}_{ISO-date}.{ext}`.

use chrono::NaiveDate;
use fasum_common::{AppError, AppResult};
use fasum_db::entities::{category, facility_type, report};
use rust_xlsxwriter::{Format, Workbook};
use sea_orm::ActiveEnum;

/// Requested export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-delimited text.
    Csv,
    /// XLSX workbook.
    Xlsx,
}

impl ExportFormat {
    /// Parse a client-supplied format name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME type for the download response.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// One sheet cell. `Empty` renders as an empty string, never as a literal
/// "null".
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text value.
    Text(String),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Absent value.
    Empty,
}

impl Cell {
    fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |s| Self::Text(s.to_string()))
    }

    fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Empty => String::new(),
        }
    }
}

/// A flattened row set ready for rendering.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Filename stem and worksheet name.
    pub kind: String,
    /// Header row, order-preserving.
    pub headers: Vec<&'static str>,
    /// One entry per record.
    pub rows: Vec<Vec<Cell>>,
}

/// A rendered download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    /// Suggested filename.
    pub filename: String,
    /// MIME type.
    pub content_type: &'static str,
    /// File content.
    pub bytes: Vec<u8>,
}

/// Flatten report rows (with category joined) into a sheet.
#[must_use]
pub fn report_sheet(rows: &[(report::Model, Option<category::Model>)]) -> Sheet {
    let headers = vec![
        "id",
        "title",
        "description",
        "category",
        "priority",
        "status",
        "location_name",
        "latitude",
        "longitude",
        "image_urls",
        "admin_notes",
        "user_id",
        "created_at",
        "resolved_at",
    ];

    let rows = rows
        .iter()
        .map(|(r, cat)| {
            let images = r
                .image_urls
                .as_array()
                .map(|urls| {
                    urls.iter()
                        .filter_map(|u| u.as_str())
                        .collect::<Vec<_>>()
                        .join(";")
                })
                .unwrap_or_default();

            vec![
                Cell::Int(i64::from(r.id)),
                Cell::Text(r.title.clone()),
                Cell::opt_text(r.description.as_deref()),
                cat.as_ref()
                    .map_or(Cell::Empty, |c| Cell::Text(c.name.clone())),
                r.priority
                    .as_ref()
                    .map_or(Cell::Empty, |p| Cell::Text(p.to_value())),
                r.status
                    .as_ref()
                    .map_or(Cell::Empty, |s| Cell::Text(s.to_value())),
                Cell::opt_text(r.location_name.as_deref()),
                r.latitude.map_or(Cell::Empty, Cell::Float),
                r.longitude.map_or(Cell::Empty, Cell::Float),
                Cell::Text(images),
                Cell::opt_text(r.admin_notes.as_deref()),
                Cell::Text(r.user_id.clone()),
                r.created_at
                    .map_or(Cell::Empty, |t| Cell::Text(t.to_rfc3339())),
                r.resolved_at
                    .map_or(Cell::Empty, |t| Cell::Text(t.to_rfc3339())),
            ]
        })
        .collect();

    Sheet {
        kind: "laporan".to_string(),
        headers,
        rows,
    }
}

/// Flatten facility-type rows into a sheet.
#[must_use]
pub fn facility_type_sheet(rows: &[facility_type::Model]) -> Sheet {
    let headers = vec!["id", "name", "icon", "color", "is_active", "created_at"];

    let rows = rows
        .iter()
        .map(|f| {
            vec![
                Cell::Int(i64::from(f.id)),
                Cell::Text(f.name.clone()),
                Cell::opt_text(f.icon.as_deref()),
                Cell::opt_text(f.color.as_deref()),
                Cell::Text(f.is_active.to_string()),
                Cell::Text(f.created_at.to_rfc3339()),
            ]
        })
        .collect();

    Sheet {
        kind: "fasilitas".to_string(),
        headers,
        rows,
    }
}

/// Render a sheet in the requested format.
///
/// An empty row set is a recognized "nothing to do" outcome
/// ([`AppError::NothingToExport`]), never a zero-byte file.
pub fn render(sheet: &Sheet, format: ExportFormat, today: NaiveDate) -> AppResult<ExportFile> {
    if sheet.rows.is_empty() {
        return Err(AppError::NothingToExport);
    }

    let bytes = match format {
        ExportFormat::Csv => to_csv(sheet).into_bytes(),
        ExportFormat::Xlsx => to_xlsx(sheet)?,
    };

    Ok(ExportFile {
        filename: format!(
            "{}_{}.{}",
            sheet.kind,
            today.format("%Y-%m-%d"),
            format.extension()
        ),
        content_type: format.content_type(),
        bytes,
    })
}

/// Escape a CSV field: wrap in quotes when it contains the delimiter, a
/// quote, or a line break, doubling internal quotes.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn to_csv(sheet: &Sheet) -> String {
    let mut csv = String::new();

    csv.push_str(&sheet.headers.join(","));
    csv.push('\n');

    for row in &sheet.rows {
        let line = row
            .iter()
            .map(|cell| escape_csv(&cell.render()))
            .collect::<Vec<_>>()
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

fn to_xlsx(sheet: &Sheet) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&sheet.kind)
        .map_err(|e| AppError::Export(e.to_string()))?;

    let header_format = Format::new().set_bold();
    for (col, header) in sheet.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| AppError::Export(e.to_string()))?;
    }

    for (i, row) in sheet.rows.iter().enumerate() {
        let row_idx = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col_idx = col as u16;
            match cell {
                Cell::Text(s) => worksheet.write_string(row_idx, col_idx, s),
                Cell::Int(n) => worksheet.write_number(row_idx, col_idx, *n as f64),
                Cell::Float(f) => worksheet.write_number(row_idx, col_idx, *f),
                Cell::Empty => worksheet.write_string(row_idx, col_idx, ""),
            }
            .map_err(|e| AppError::Export(e.to_string()))?;
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| AppError::Export(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_sheet(rows: Vec<Vec<Cell>>) -> Sheet {
        Sheet {
            kind: "laporan".to_string(),
            headers: vec!["id", "note"],
            rows,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_csv_escapes_quotes_and_delimiters() {
        let sheet = sample_sheet(vec![vec![
            Cell::Int(1),
            Cell::Text("He said \"hi\", ok".to_string()),
        ]]);

        let csv = to_csv(&sheet);
        assert_eq!(csv, "id,note\n1,\"He said \"\"hi\"\", ok\"\n");

        // Unquoting the field the way a CSV reader does must give back the
        // original string.
        let row = csv.lines().nth(1).unwrap();
        let quoted = row.strip_prefix("1,").unwrap();
        assert!(quoted.starts_with('"') && quoted.ends_with('"'));
        let reparsed = quoted[1..quoted.len() - 1].replace("\"\"", "\"");
        assert_eq!(reparsed, "He said \"hi\", ok");
    }

    #[test]
    fn test_csv_escapes_line_breaks() {
        let sheet = sample_sheet(vec![vec![
            Cell::Int(1),
            Cell::Text("line one\nline two".to_string()),
        ]]);

        let csv = to_csv(&sheet);
        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_csv_renders_empty_cell_as_empty_string() {
        let sheet = sample_sheet(vec![vec![Cell::Int(1), Cell::Empty]]);

        let csv = to_csv(&sheet);
        assert_eq!(csv, "id,note\n1,\n");
    }

    #[test]
    fn test_render_rejects_empty_row_set() {
        let sheet = sample_sheet(vec![]);

        let err = render(&sheet, ExportFormat::Csv, today()).unwrap_err();
        assert!(matches!(err, AppError::NothingToExport));
    }

    #[test]
    fn test_filename_convention() {
        let sheet = sample_sheet(vec![vec![Cell::Int(1), Cell::Empty]]);

        let csv = render(&sheet, ExportFormat::Csv, today()).unwrap();
        assert_eq!(csv.filename, "laporan_2024-01-15.csv");
        assert_eq!(csv.content_type, "text/csv");

        let xlsx = render(&sheet, ExportFormat::Xlsx, today()).unwrap();
        assert_eq!(xlsx.filename, "laporan_2024-01-15.xlsx");
        // XLSX is a ZIP container.
        assert_eq!(&xlsx.bytes[..2], b"PK");
    }

    #[test]
    fn test_report_sheet_headers_lead_rows() {
        let sheet = report_sheet(&[]);
        assert_eq!(sheet.headers[0], "id");
        assert_eq!(sheet.headers.len(), 14);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("xlsx"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }
}
