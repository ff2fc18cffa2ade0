//! Parse sales register CSV exports into a validated [`Dataset`].
//!
//! Expected header (extra columns are ignored, order does not matter):
//! Invoice Date,Customer Name,Total Amount,Total Amount (Inc. Tax),Invoice Number

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use regex::Regex;
use std::io::Read;
use std::path::Path;
use vouch_core::{Dataset, Transaction};

use crate::types::{
    COL_AMOUNT_EXCL_TAX, COL_AMOUNT_INCL_TAX, COL_CUSTOMER, COL_INVOICE_DATE, COL_INVOICE_NUMBER,
    DATE_FORMAT, LoadReport, LoadedRegister, REQUIRED_COLUMNS,
};

struct ColumnIndex {
    date: usize,
    customer: usize,
    excl: usize,
    incl: usize,
    invoice: usize,
}

impl ColumnIndex {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };

        match (
            find(COL_INVOICE_DATE),
            find(COL_CUSTOMER),
            find(COL_AMOUNT_EXCL_TAX),
            find(COL_AMOUNT_INCL_TAX),
            find(COL_INVOICE_NUMBER),
        ) {
            (Some(date), Some(customer), Some(excl), Some(incl), Some(invoice)) => Ok(Self {
                date,
                customer,
                excl,
                incl,
                invoice,
            }),
            _ => bail!(
                "the sales register must contain the following columns: {}",
                REQUIRED_COLUMNS.join(", ")
            ),
        }
    }
}

/// Amount cells as exported: `1234.5`, `1,234.50`, `₹ 1,234.50`, `-1,234.50`, `(1,234.50)`.
fn amount_regex() -> Result<Regex> {
    Ok(Regex::new(concat!(
        r"^(?P<open>\()?\s*(?P<neg>-)?\s*[^\d\s.,()\-]*\s*",
        r"(?P<num>\d[\d,]*(?:\.\d+)?|\.\d+)\s*\)?$"
    ))?)
}

fn parse_amount(re: &Regex, raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }

    let caps = re.captures(s)?;
    let value: f64 = caps["num"].replace(',', "").parse().ok()?;
    if caps.name("open").is_some() || caps.name("neg").is_some() {
        Some(-value)
    } else {
        Some(value)
    }
}

/// Parse a sales register from any reader.
pub fn parse_register<R: Read>(reader: R) -> Result<LoadedRegister> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let cols = ColumnIndex::locate(&headers)?;
    let amount_re = amount_regex()?;

    let mut rows = Vec::new();
    let mut report = LoadReport::default();

    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading CSV row {}", i + 2))?;
        report.rows_read += 1;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let invoice_date = match NaiveDate::parse_from_str(field(cols.date), DATE_FORMAT) {
            Ok(d) => d,
            Err(_) => {
                report.bad_dates += 1;
                continue;
            }
        };

        let (excl, incl) = match (
            parse_amount(&amount_re, field(cols.excl)),
            parse_amount(&amount_re, field(cols.incl)),
        ) {
            (Some(e), Some(i)) => (e, i),
            _ => {
                report.bad_amounts += 1;
                continue;
            }
        };

        let invoice_number = field(cols.invoice);
        if invoice_number.is_empty() {
            report.missing_invoice_numbers += 1;
            continue;
        }

        rows.push(Transaction::new(
            invoice_number,
            invoice_date,
            field(cols.customer),
            excl,
            incl,
        ));
    }

    if report.bad_dates > 0 {
        log::warn!(
            "{} row(s) skipped: 'Invoice Date' not in dd-mm-yyyy format",
            report.bad_dates
        );
    }
    if report.bad_amounts > 0 {
        log::warn!("{} row(s) skipped: amount not numeric", report.bad_amounts);
    }
    if report.missing_invoice_numbers > 0 {
        log::warn!(
            "{} row(s) skipped: missing invoice number",
            report.missing_invoice_numbers
        );
    }
    log::info!("loaded {} of {} register rows", rows.len(), report.rows_read);

    Ok(LoadedRegister {
        dataset: Dataset::new(rows),
        report,
    })
}

/// Parse a sales register from raw bytes (e.g. an uploaded file).
pub fn parse_register_bytes(bytes: &[u8]) -> Result<LoadedRegister> {
    parse_register(bytes)
}

/// Parse a sales register CSV file.
pub fn load_register(path: impl AsRef<Path>) -> Result<LoadedRegister> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_register(file).with_context(|| format!("parsing {}", path.display()))
}
