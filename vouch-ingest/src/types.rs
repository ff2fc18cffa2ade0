//! Register column names, the invoice date format and load outcome types.

use vouch_core::Dataset;

pub const COL_INVOICE_DATE: &str = "Invoice Date";
pub const COL_CUSTOMER: &str = "Customer Name";
pub const COL_AMOUNT_EXCL_TAX: &str = "Total Amount";
pub const COL_AMOUNT_INCL_TAX: &str = "Total Amount (Inc. Tax)";
pub const COL_INVOICE_NUMBER: &str = "Invoice Number";

/// Column headers a sales register export must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_INVOICE_DATE,
    COL_CUSTOMER,
    COL_AMOUNT_EXCL_TAX,
    COL_AMOUNT_INCL_TAX,
    COL_INVOICE_NUMBER,
];

/// Invoice dates are day-month-year.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Row-level outcome of a load. Skipped rows are counted, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub bad_dates: usize,
    pub bad_amounts: usize,
    pub missing_invoice_numbers: usize,
}

impl LoadReport {
    pub fn rows_skipped(&self) -> usize {
        self.bad_dates + self.bad_amounts + self.missing_invoice_numbers
    }

    pub fn is_clean(&self) -> bool {
        self.rows_skipped() == 0
    }
}

/// Parsed register plus what was dropped on the way in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRegister {
    pub dataset: Dataset,
    pub report: LoadReport,
}
