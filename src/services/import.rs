//! CSV Import service
//!
//! Parses the semicolon-delimited, pt-BR bank/treasury export format
//! (`data_lançamento;Categoria;Valor em R$[;descrição]`) into transactions,
//! and persists a parsed file as a single bulk write.
//!
//! Structural problems (unreadable file, bad header, nothing parseable) abort
//! the import. Individual bad rows are skipped and reported.
//!
//! Records end at `\n` only. The `\r` of a CRLF ending is dropped along with
//! the rest of the field padding, and a lone `\r` inside a field is data.

use std::fmt;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Terminator};
use tracing::{debug, warn};

use crate::audit::Operation;
use crate::error::{DashboardResult, ImportError};
use crate::models::{Transaction, TransactionType};
use crate::services::TransactionService;
use crate::storage::Storage;

/// Column holding the entry date (DD/MM/YYYY)
pub const DATE_COLUMN: &str = "data_lançamento";
/// Column holding the category label
pub const CATEGORY_COLUMN: &str = "Categoria";
/// Column holding the amount in pt-BR notation
pub const VALUE_COLUMN: &str = "Valor em R$";
/// Optional description column
pub const DESCRIPTION_COLUMN: &str = "descrição";

/// Columns every import file must carry
pub const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, CATEGORY_COLUMN, VALUE_COLUMN];

/// Description used when a row has none
pub const CSV_IMPORT_DESCRIPTION: &str = "Importado via CSV";
/// Payment method stamped on every imported row
pub const CSV_IMPORT_PAYMENT_METHOD: &str = "CSV Import";

const BOM: char = '\u{feff}';

/// Why a data row was left out of an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A required column was empty
    MissingField(&'static str),
    /// The date was not DD/MM/YYYY or not a real calendar day
    InvalidDate(String),
    /// The amount did not parse as a number
    InvalidValue(String),
    /// The CSV reader could not decode the record
    Malformed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(column) => write!(f, "missing value for '{}'", column),
            Self::InvalidDate(raw) => write!(f, "invalid date '{}' (use DD/MM/YYYY)", raw),
            Self::InvalidValue(raw) => write!(f, "invalid value '{}'", raw),
            Self::Malformed(msg) => write!(f, "unreadable row: {}", msg),
        }
    }
}

/// A data row that was skipped during parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source text
    pub line: u64,
    pub reason: SkipReason,
}

/// Parsed transactions plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

/// Result of a completed, persisted import
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Stored transactions, with identifiers
    pub imported: Vec<Transaction>,
    /// Rows left out of the import
    pub skipped: Vec<SkippedRow>,
}

/// Positions of the known columns within the header
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    date: usize,
    category: usize,
    value: usize,
    description: Option<usize>,
}

impl ColumnLayout {
    /// Locate the known columns by name. A repeated name resolves to its last
    /// occurrence.
    fn from_header(header: &[String]) -> Result<Self, ImportError> {
        let find = |name: &str| header.iter().rposition(|h| h == name);

        match (find(DATE_COLUMN), find(CATEGORY_COLUMN), find(VALUE_COLUMN)) {
            (Some(date), Some(category), Some(value)) => Ok(Self {
                date,
                category,
                value,
                description: find(DESCRIPTION_COLUMN),
            }),
            _ => Err(ImportError::InvalidHeader {
                expected: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: header.to_vec(),
            }),
        }
    }

    /// Map one record's fields onto the known columns
    fn row(&self, fields: &[String]) -> CsvRow {
        let get = |idx: usize| fields.get(idx).cloned().unwrap_or_default();
        CsvRow {
            date: get(self.date),
            category: get(self.category),
            value: get(self.value),
            description: self.description.map(get).unwrap_or_default(),
        }
    }
}

/// One data row, keyed by column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CsvRow {
    date: String,
    category: String,
    value: String,
    description: String,
}

impl CsvRow {
    fn into_transaction(self, kind: TransactionType) -> Result<Transaction, SkipReason> {
        for (column, field) in [
            (DATE_COLUMN, &self.date),
            (CATEGORY_COLUMN, &self.category),
            (VALUE_COLUMN, &self.value),
        ] {
            if field.trim().is_empty() {
                return Err(SkipReason::MissingField(column));
            }
        }

        let date = parse_date(&self.date).ok_or_else(|| SkipReason::InvalidDate(self.date.clone()))?;
        let value =
            parse_amount(&self.value).ok_or_else(|| SkipReason::InvalidValue(self.value.clone()))?;

        let description = if self.description.is_empty() {
            CSV_IMPORT_DESCRIPTION.to_string()
        } else {
            self.description
        };

        Ok(Transaction::new(kind, date, value, self.category)
            .with_description(description)
            .with_payment_method(CSV_IMPORT_PAYMENT_METHOD))
    }
}

/// Parse CSV text into unpersisted transactions of `kind`
///
/// Skipped rows are logged; use [`parse_csv_detailed`] to get them back.
pub fn parse_csv(raw: &str, kind: TransactionType) -> Result<Vec<Transaction>, ImportError> {
    parse_csv_detailed(raw, kind).map(|outcome| outcome.transactions)
}

/// Parse CSV text, returning both the transactions and the skipped rows
pub fn parse_csv_detailed(raw: &str, kind: TransactionType) -> Result<ImportOutcome, ImportError> {
    let text = raw.strip_prefix(BOM).unwrap_or(raw);

    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut records = reader.records().filter(|result| match result {
        Ok(record) => !is_blank(record),
        Err(_) => true,
    });

    let header = match records.next() {
        Some(Ok(record)) => clean_fields(&record),
        Some(Err(e)) => return Err(ImportError::UnreadableFile(e.to_string())),
        None => Vec::new(),
    };
    let layout = ColumnLayout::from_header(&header)?;
    debug!(columns = ?header, "CSV header accepted");

    let mut outcome = ImportOutcome::default();

    for result in records {
        let (line, parsed) = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                let row = layout.row(&clean_fields(&record));
                (line, row.into_transaction(kind))
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                (line, Err(SkipReason::Malformed(e.to_string())))
            }
        };

        match parsed {
            Ok(txn) => outcome.transactions.push(txn),
            Err(reason) => {
                warn!(line, %reason, "Skipping CSV row");
                outcome.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    if outcome.transactions.is_empty() {
        return Err(ImportError::NoValidRows);
    }

    debug!(
        parsed = outcome.transactions.len(),
        skipped = outcome.skipped.len(),
        "CSV parsed"
    );
    Ok(outcome)
}

/// A line holding nothing but whitespace
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).map_or(true, |f| f.trim().is_empty())
}

/// Trim each field, then drop every quote character
fn clean_fields(record: &StringRecord) -> Vec<String> {
    record.iter().map(|f| f.trim().replace('"', "")).collect()
}

/// Parse `DD/MM/YYYY` into local midnight
fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Parse a pt-BR amount such as `R$ 1.234,56`
fn parse_amount(raw: &str) -> Option<f64> {
    let normalized = raw.replace("R$", "").replace('.', "").replace(',', ".");
    normalized
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Service for reading and persisting CSV imports
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read a `.csv` file as UTF-8 text
    pub fn read_file(path: &Path) -> Result<String, ImportError> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(ImportError::InvalidFileType(path.display().to_string()));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| ImportError::UnreadableFile(format!("{}: {}", path.display(), e)))?;

        String::from_utf8(bytes).map_err(|e| {
            ImportError::UnreadableFile(format!("{} is not valid UTF-8: {}", path.display(), e))
        })
    }

    /// Read, parse and bulk-persist a CSV file
    pub fn import_file(&self, path: &Path, kind: TransactionType) -> DashboardResult<ImportResult> {
        let text = Self::read_file(path)?;
        self.import_text(&text, kind)
    }

    /// Parse and bulk-persist already-decoded CSV text
    pub fn import_text(&self, text: &str, kind: TransactionType) -> DashboardResult<ImportResult> {
        let outcome = parse_csv_detailed(text, kind)?;

        let imported = TransactionService::new(self.storage)
            .create_many(outcome.transactions, Operation::Import)?;

        Ok(ImportResult {
            imported,
            skipped: outcome.skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::DashboardPaths;
    use crate::error::DashboardError;
    use tempfile::TempDir;

    const HEADER: &str = "data_lançamento;Categoria;Valor em R$;descrição";

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DashboardPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths, "tester").unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_reference_row() {
        let csv = format!("{}\n15/03/2024;Doações;150,75;Oferta especial", HEADER);
        let txns = parse_csv(&csv, TransactionType::Revenue).unwrap();

        assert_eq!(txns.len(), 1);
        let txn = &txns[0];
        assert_eq!(txn.date, Some(day(2024, 3, 15)));
        assert_eq!(txn.value, 150.75);
        assert_eq!(txn.category, "Doações");
        assert_eq!(txn.description, "Oferta especial");
        assert_eq!(txn.kind, TransactionType::Revenue);
        assert_eq!(txn.payment_method, CSV_IMPORT_PAYMENT_METHOD);
        assert!(txn.file_name.is_none());
        assert!(txn.id.is_none());
    }

    #[test]
    fn test_declared_type_applies_to_every_row() {
        let csv = format!("{}\n01/01/2024;Luz;10,00;\n02/01/2024;Água;20,00;", HEADER);
        let txns = parse_csv(&csv, TransactionType::Expense).unwrap();
        assert!(txns.iter().all(|t| t.kind == TransactionType::Expense));
    }

    #[test]
    fn test_wrong_date_separator_is_skipped() {
        let csv = format!("{}\n2024-03-15;X;10,00\n16/03/2024;Y;5,00", HEADER);
        let outcome = parse_csv_detailed(&csv, TransactionType::Revenue).unwrap();

        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].category, "Y");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].line, 2);
        assert_eq!(
            outcome.skipped[0].reason,
            SkipReason::InvalidDate("2024-03-15".into())
        );
    }

    #[test]
    fn test_impossible_calendar_dates_are_skipped() {
        let csv = format!(
            "{}\n30/02/2024;A;1,00\n01/13/2024;B;1,00\naa/01/2024;C;1,00\n29/02/2024;D;1,00",
            HEADER
        );
        let outcome = parse_csv_detailed(&csv, TransactionType::Revenue).unwrap();

        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].date, Some(day(2024, 2, 29)));
        assert_eq!(outcome.skipped.len(), 3);
    }

    #[test]
    fn test_value_parsing() {
        assert_eq!(parse_amount("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("150,75"), Some(150.75));
        assert_eq!(parse_amount("  42 "), Some(42.0));
        assert_eq!(parse_amount("-10,50"), Some(-10.5));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("R$"), None);
    }

    #[test]
    fn test_unparseable_value_is_skipped() {
        let csv = format!("{}\n01/02/2024;A;abc\n01/02/2024;B;R$ 1.234,56", HEADER);
        let outcome = parse_csv_detailed(&csv, TransactionType::Revenue).unwrap();

        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].value, 1234.56);
        assert_eq!(outcome.skipped[0].reason, SkipReason::InvalidValue("abc".into()));
    }

    #[test]
    fn test_missing_required_value_is_skipped() {
        let csv = format!("{}\n01/02/2024;;10,00\n01/02/2024;A;   \n01/02/2024;B;3,00", HEADER);
        let outcome = parse_csv_detailed(&csv, TransactionType::Revenue).unwrap();

        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(
            outcome.skipped.iter().map(|s| s.reason.clone()).collect::<Vec<_>>(),
            vec![
                SkipReason::MissingField(CATEGORY_COLUMN),
                SkipReason::MissingField(VALUE_COLUMN)
            ]
        );
    }

    #[test]
    fn test_short_rows_and_default_description() {
        let csv = format!("{}\n05/05/2024;Dízimo;100", HEADER);
        let txns = parse_csv(&csv, TransactionType::Revenue).unwrap();
        assert_eq!(txns[0].description, CSV_IMPORT_DESCRIPTION);

        let no_desc_column = "data_lançamento;Categoria;Valor em R$\n05/05/2024;Dízimo;100";
        let txns = parse_csv(no_desc_column, TransactionType::Revenue).unwrap();
        assert_eq!(txns[0].description, CSV_IMPORT_DESCRIPTION);
    }

    #[test]
    fn test_bom_quotes_crlf_and_blank_lines() {
        let csv = "\u{feff}\"data_lançamento\";\"Categoria\";\"Valor em R$\";\"descrição\"\r\n\
                   \r\n\
                   \"15/03/2024\";\"Doações\";\"R$ 150,75\";\"Oferta\"\r\n\
                   \n   \n\
                   16/03/2024 ; Ofertas ; 10,00 ; \r\n";
        let outcome = parse_csv_detailed(csv, TransactionType::Revenue).unwrap();

        assert_eq!(outcome.transactions.len(), 2);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.transactions[0].value, 150.75);
        assert_eq!(outcome.transactions[0].description, "Oferta");
        assert_eq!(outcome.transactions[1].category, "Ofertas");
    }

    #[test]
    fn test_carriage_return_inside_field_is_kept() {
        let csv = format!("{}\n15/03/2024;Doações;150,75;Oferta\respecial", HEADER);
        let outcome = parse_csv_detailed(&csv, TransactionType::Revenue).unwrap();

        assert!(outcome.skipped.is_empty(), "{:?}", outcome.skipped);
        assert_eq!(outcome.transactions.len(), 1);
        assert_eq!(outcome.transactions[0].description, "Oferta\respecial");
        assert_eq!(outcome.transactions[0].value, 150.75);
    }

    #[test]
    fn test_columns_are_matched_by_name() {
        let csv = "descrição;Valor em R$;extra;Categoria;data_lançamento\n\
                   Culto;50,00;ignored;Ofertas;07/07/2024";
        let txns = parse_csv(csv, TransactionType::Revenue).unwrap();

        assert_eq!(txns[0].category, "Ofertas");
        assert_eq!(txns[0].value, 50.0);
        assert_eq!(txns[0].description, "Culto");
        assert_eq!(txns[0].date, Some(day(2024, 7, 7)));
    }

    #[test]
    fn test_missing_column_is_invalid_header() {
        let csv = "data_lançamento;Categoria;descrição\n15/03/2024;Doações;x";
        let err = parse_csv(csv, TransactionType::Revenue).unwrap_err();

        match &err {
            ImportError::InvalidHeader { expected, found } => {
                assert_eq!(expected, &vec!["data_lançamento", "Categoria", "Valor em R$"]);
                assert_eq!(found, &vec!["data_lançamento", "Categoria", "descrição"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        let message = err.to_string();
        assert!(message.contains("Valor em R$"));
        assert!(message.contains("data_lançamento; Categoria; descrição"));
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let csv = "Data_lançamento;categoria;valor em r$\n15/03/2024;A;1";
        assert!(matches!(
            parse_csv(csv, TransactionType::Revenue),
            Err(ImportError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_no_valid_rows() {
        let header_only = format!("{}\n", HEADER);
        assert_eq!(
            parse_csv(&header_only, TransactionType::Revenue).unwrap_err(),
            ImportError::NoValidRows
        );

        let all_bad = format!("{}\n2024-01-01;A;1\n01/01/2024;B;xyz", HEADER);
        assert_eq!(
            parse_csv(&all_bad, TransactionType::Revenue).unwrap_err(),
            ImportError::NoValidRows
        );
    }

    #[test]
    fn test_empty_text_is_invalid_header() {
        let err = parse_csv("", TransactionType::Revenue).unwrap_err();
        assert!(matches!(err, ImportError::InvalidHeader { ref found, .. } if found.is_empty()));
    }

    #[test]
    fn test_read_file_rejects_other_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("extrato.txt");
        std::fs::write(&path, HEADER).unwrap();

        assert!(matches!(
            ImportService::read_file(&path),
            Err(ImportError::InvalidFileType(_))
        ));
    }

    #[test]
    fn test_read_file_errors_are_unreadable() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join("missing.csv");
        assert!(matches!(
            ImportService::read_file(&missing),
            Err(ImportError::UnreadableFile(_))
        ));

        let latin1 = temp_dir.path().join("latin1.csv");
        std::fs::write(&latin1, [0x64, 0x61, 0x74, 0x61, 0xe7, 0x3b]).unwrap();
        assert!(matches!(
            ImportService::read_file(&latin1),
            Err(ImportError::UnreadableFile(_))
        ));
    }

    #[test]
    fn test_import_file_persists_in_bulk() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("receitas.csv");
        std::fs::write(
            &path,
            format!("{}\n15/03/2024;Doações;150,75;\n16/03/2024;X;bad;\n17/03/2024;Dízimo;10;", HEADER),
        )
        .unwrap();

        let result = ImportService::new(&storage)
            .import_file(&path, TransactionType::Revenue)
            .unwrap();

        assert_eq!(result.imported.len(), 2);
        assert!(result.imported.iter().all(|t| t.id.is_some()));
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(storage.transactions.count().unwrap(), 2);

        let audit = storage.audit().entries().unwrap();
        assert_eq!(audit.len(), 2);
        assert!(audit.iter().all(|e| e.operation == Operation::Import));
    }

    #[test]
    fn test_failed_import_persists_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let err = ImportService::new(&storage)
            .import_text("Categoria;Valor em R$\nA;1", TransactionType::Revenue)
            .unwrap_err();

        assert!(matches!(err, DashboardError::Import(ImportError::InvalidHeader { .. })));
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }
}
