//! Reference identifier table and the identifier guard.
//!
//! The table is loaded once at startup from the training extract and is
//! never mutated afterwards. Every dashboard step re-validates the raw input
//! against it before calling the scoring API.

use crate::errors::AppError;
use crate::models::ApplicantId;
use regex::Regex;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Name of the identifier column in the reference dataset.
pub const ID_COLUMN: &str = "SK_ID_CURR";

fn digits_only() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
}

/// Read-only set of applicant identifiers known to the scoring model.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    ids: HashSet<i64>,
}

impl ReferenceTable {
    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Loads the identifier column of a CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self, AppError> {
        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Dataset(format!("cannot open {}: {}", path.display(), e))
        })?;
        let table = Self::from_csv_reader(file)?;
        tracing::info!(
            "Reference dataset loaded from {} ({} identifiers)",
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Reads identifiers from CSV data with a header row.
    ///
    /// Cells may hold integers or integral floats (`100002.0`); blank cells
    /// are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let column = csv_reader
            .headers()?
            .iter()
            .position(|h| h.trim() == ID_COLUMN)
            .ok_or_else(|| AppError::Dataset(format!("missing `{}` column", ID_COLUMN)))?;

        let mut ids = HashSet::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let cell = record.get(column).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            let id = parse_id_cell(cell).ok_or_else(|| {
                AppError::Dataset(format!(
                    "row {}: `{}` is not a valid {}",
                    row + 1,
                    cell,
                    ID_COLUMN
                ))
            })?;
            ids.insert(id);
        }

        Ok(Self { ids })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ApplicantId) -> bool {
        self.ids.contains(&id.0)
    }

    /// True iff `raw` is all digits and names a known applicant.
    pub fn is_valid(&self, raw: &str) -> bool {
        self.validate(raw).is_ok()
    }

    /// Guard run before each scoring API call.
    pub fn validate(&self, raw: &str) -> Result<ApplicantId, AppError> {
        if !digits_only().is_match(raw) {
            return Err(AppError::InvalidIdentifier(format!(
                "`{}` is not a numeric identifier",
                raw
            )));
        }
        let id = raw
            .parse::<i64>()
            .map(ApplicantId)
            .map_err(|_| AppError::InvalidIdentifier(format!("`{}` is out of range", raw)))?;
        if !self.contains(id) {
            return Err(AppError::InvalidIdentifier(format!(
                "{} is not in the reference dataset",
                id
            )));
        }
        Ok(id)
    }
}

fn parse_id_cell(cell: &str) -> Option<i64> {
    if let Ok(id) = cell.parse::<i64>() {
        return Some(id);
    }
    let value = cell.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ReferenceTable {
        ReferenceTable::from_ids([100002, 100003, 100004])
    }

    #[test]
    fn test_known_identifier_is_valid() {
        assert!(table().is_valid("100002"));
        assert_eq!(table().validate("100003").unwrap(), ApplicantId(100003));
    }

    #[test]
    fn test_non_digit_input_is_invalid() {
        let table = table();
        assert!(!table.is_valid(""));
        assert!(!table.is_valid("abc"));
        assert!(!table.is_valid("10000 2"));
        assert!(!table.is_valid("-100002"));
        assert!(!table.is_valid("100002.0"));
        assert!(!table.is_valid(" 100002"));
    }

    #[test]
    fn test_unknown_identifier_is_invalid() {
        assert!(!table().is_valid("999999"));
        assert!(!table().is_valid("99999999999999999999999"));
    }

    #[test]
    fn test_csv_loading_reads_id_column() {
        let data = "INDEX,SK_ID_CURR,TARGET\n0,100002,1\n1,100003.0,0\n2,,0\n";
        let table = ReferenceTable::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.is_valid("100002"));
        assert!(table.is_valid("100003"));
    }

    #[test]
    fn test_loading_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SK_ID_CURR,AMT_ANNUITY").unwrap();
        writeln!(file, "100002,24700.5").unwrap();
        writeln!(file, "100003,35698.5").unwrap();

        let table = ReferenceTable::from_csv_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains(ApplicantId(100003)));
    }

    #[test]
    fn test_missing_file_is_dataset_error() {
        let err = ReferenceTable::from_csv_path(Path::new("/nonexistent/df300.csv")).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[test]
    fn test_csv_without_id_column_is_rejected() {
        let data = "INDEX,TARGET\n0,1\n";
        let err = ReferenceTable::from_csv_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Dataset(_)));
    }

    #[test]
    fn test_csv_with_garbage_id_is_rejected() {
        let data = "SK_ID_CURR\nabc\n";
        assert!(ReferenceTable::from_csv_reader(data.as_bytes()).is_err());
    }
}
