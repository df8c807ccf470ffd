//! # Sales Ledger
//!
//! Append-only CSV record of every unit sold, one file per calendar day.
//!
//! ## File Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  <ledger_dir>/sales_2024-05-01.csv                                     │
//! │                                                                         │
//! │  ID,Name,Dosage,Manufacturer,Price,Quantity,Additional Info  ← once    │
//! │  1,Amoxicillin,250mg capsule,Acme Pharma,10.00,3,walk-in     ← sale 1  │
//! │  4,Cetirizine,10mg tablet,Generico,5.49,1,walk-in            ← sale 1  │
//! │  1,Amoxicillin,250mg capsule,Acme Pharma,10.00,2,"Dr. Roe, Rx 12"      │
//! │                                                              ← sale 2  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are never deduplicated: the same basket sold twice is two events and
//! shows up twice. The price column is the unit price at the time of sale
//! with exactly two decimals.

use chrono::{Local, NaiveDate};
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SaleError, SaleResult};
use rxdesk_core::Basket;

/// Header row written at the top of every ledger file.
pub const LEDGER_HEADER: [&str; 7] = [
    "ID",
    "Name",
    "Dosage",
    "Manufacturer",
    "Price",
    "Quantity",
    "Additional Info",
];

const FILE_PREFIX: &str = "sales_";
const FILE_SUFFIX: &str = ".csv";

/// Name of the ledger file for a given day, e.g. `sales_2024-05-01.csv`.
pub fn ledger_file_name(date: NaiveDate) -> String {
    format!("{}{}{}", FILE_PREFIX, date.format("%Y-%m-%d"), FILE_SUFFIX)
}

/// Inverse of [`ledger_file_name`]. Anything that isn't exactly a ledger
/// file name yields `None`.
pub fn parse_ledger_file_name(name: &str) -> Option<NaiveDate> {
    let date = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;

    // Reject non-canonical spellings such as "2024-5-1"
    (ledger_file_name(parsed) == name).then_some(parsed)
}

/// Appends sale rows to the daily ledger.
#[derive(Debug, Clone)]
pub struct LedgerWriter {
    dir: PathBuf,
}

impl LedgerWriter {
    /// Creates a writer for `dir`. The directory is created on first append.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LedgerWriter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the ledger file for `date`.
    pub fn ledger_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(ledger_file_name(date))
    }

    /// Appends one row per basket line to today's ledger (local date).
    pub fn append_sale(&self, basket: &Basket, note: &str) -> SaleResult<PathBuf> {
        self.append_sale_on(Local::now().date_naive(), basket, note)
    }

    /// Appends one row per basket line to the ledger for `date`.
    ///
    /// ## What This Does
    /// 1. Creates the ledger directory if missing
    /// 2. Writes the header when the file is new or empty
    /// 3. Appends `id, name, dosage, manufacturer, price, quantity, note`
    ///    for every line in basket order
    ///
    /// Returns the path of the file written.
    pub fn append_sale_on(&self, date: NaiveDate, basket: &Basket, note: &str) -> SaleResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| SaleError::io(&self.dir, e))?;

        let path = self.ledger_path(date);
        let needs_header = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(SaleError::io(&path, e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SaleError::io(&path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            debug!(path = %path.display(), "Creating ledger file");
            writer.write_record(LEDGER_HEADER)?;
        }

        for line in basket.lines() {
            let medicine = &line.medicine;
            let id = medicine.id.to_string();
            let price = medicine.price().to_string();
            let quantity = line.quantity.to_string();

            writer.write_record([
                id.as_str(),
                medicine.name.as_str(),
                medicine.dosage.as_str(),
                medicine.manufacturer.as_str(),
                price.as_str(),
                quantity.as_str(),
                note,
            ])?;
        }

        writer.flush().map_err(|e| SaleError::io(&path, e))?;

        info!(
            path = %path.display(),
            rows = basket.len(),
            "Ledger rows appended"
        );
        Ok(path)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rxdesk_core::Medicine;

    const HEADER_LINE: &str = "ID,Name,Dosage,Manufacturer,Price,Quantity,Additional Info";

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn medicine(id: i64, name: &str, price_cents: i64) -> Medicine {
        Medicine {
            id,
            name: name.to_string(),
            dosage: "250mg capsule".to_string(),
            manufacturer: "Acme Pharma".to_string(),
            price_cents,
            quantity: 20,
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_file_name_round_trip() {
        assert_eq!(ledger_file_name(day()), "sales_2024-05-01.csv");
        assert_eq!(parse_ledger_file_name("sales_2024-05-01.csv"), Some(day()));
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert_eq!(parse_ledger_file_name("sales_2024-5-1.csv"), None);
        assert_eq!(parse_ledger_file_name("sales_2024-05-01.txt"), None);
        assert_eq!(parse_ledger_file_name("../sales_2024-05-01.csv"), None);
        assert_eq!(parse_ledger_file_name("sales_2024-13-01.csv"), None);
    }

    #[test]
    fn test_new_file_gets_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path().join("ledger"));
        let basket = Basket::from_parallel(vec![medicine(1, "Amoxicillin", 1000)], vec![3]).unwrap();

        let path = writer.append_sale_on(day(), &basket, "walk-in").unwrap();

        assert_eq!(path, writer.ledger_path(day()));
        assert_eq!(
            read_lines(&path),
            vec![
                HEADER_LINE.to_string(),
                "1,Amoxicillin,250mg capsule,Acme Pharma,10.00,3,walk-in".to_string(),
            ]
        );
    }

    #[test]
    fn test_append_sale_uses_local_date() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path());
        let basket = Basket::from_parallel(vec![medicine(1, "Amoxicillin", 1000)], vec![0]).unwrap();

        let before = Local::now().date_naive();
        let path = writer.append_sale(&basket, "").unwrap();
        let after = Local::now().date_naive();

        let written_on = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_ledger_file_name)
            .unwrap();
        assert!(written_on == before || written_on == after);
        assert_eq!(path, writer.ledger_path(written_on));
        assert_eq!(
            read_lines(&path),
            vec![
                HEADER_LINE.to_string(),
                "1,Amoxicillin,250mg capsule,Acme Pharma,10.00,0,".to_string(),
            ]
        );
    }

    #[test]
    fn test_second_append_does_not_repeat_header() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path());

        let first = Basket::from_parallel(vec![medicine(1, "Amoxicillin", 1000)], vec![3]).unwrap();
        let second = Basket::from_parallel(
            vec![medicine(1, "Amoxicillin", 1000), medicine(2, "Cetirizine", 549)],
            vec![3, 1],
        )
        .unwrap();

        writer.append_sale_on(day(), &first, "").unwrap();
        let path = writer.append_sale_on(day(), &second, "").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.iter().filter(|l| l.as_str() == HEADER_LINE).count(), 1);
        assert_eq!(lines.len(), 4);
        // Same basket line sold twice is recorded twice
        assert_eq!(lines[1], lines[2]);
        assert_eq!(lines[3], "2,Cetirizine,250mg capsule,Acme Pharma,5.49,1,");
    }

    #[test]
    fn test_empty_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path());
        fs::write(writer.ledger_path(day()), "").unwrap();

        let basket = Basket::from_parallel(vec![medicine(1, "Amoxicillin", 1000)], vec![1]).unwrap();
        let path = writer.append_sale_on(day(), &basket, "").unwrap();

        assert_eq!(read_lines(&path)[0], HEADER_LINE);
    }

    #[test]
    fn test_note_with_comma_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path());
        let basket = Basket::from_parallel(vec![medicine(1, "Amoxicillin", 1000)], vec![2]).unwrap();

        let path = writer.append_sale_on(day(), &basket, "Dr. Roe, Rx 12").unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), LEDGER_HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][6], "Dr. Roe, Rx 12");
    }

    #[test]
    fn test_different_days_use_different_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LedgerWriter::new(dir.path());
        let basket = Basket::from_parallel(vec![medicine(1, "Amoxicillin", 1000)], vec![1]).unwrap();
        let next_day = day().succ_opt().unwrap();

        let a = writer.append_sale_on(day(), &basket, "").unwrap();
        let b = writer.append_sale_on(next_day, &basket, "").unwrap();

        assert_ne!(a, b);
        assert_eq!(read_lines(&b).len(), 2);
    }
}
