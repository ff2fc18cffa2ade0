//! Text and JSON rendering of filtered tables, trend comparisons and samples,
//! plus CSV export of the final sample.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use vouch_audit::trend::{FormattedBucket, SeriesPoint};
use vouch_audit::{MonthlyComparison, Parameter, Sample, SamplingWarning, Stratum};
use vouch_core::{Currency, Dataset, FilterCriteria};

pub fn print_dataset(title: &str, ds: &Dataset, currency: &Currency) {
    println!("## {} ({} rows)\n", title, ds.len());
    if ds.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!(
        "{:<16} {:<10} {:<28} {:>16} {:>16}",
        "Invoice Number", "Date", "Customer", "Amount", "Amount (Inc. Tax)"
    );
    for t in ds {
        println!(
            "{:<16} {:<10} {:<28} {:>16} {:>16}",
            t.invoice_number,
            t.invoice_date.format("%d-%m-%Y").to_string(),
            truncate(&t.customer_name, 28),
            currency.format(t.amount_excl_tax),
            currency.format(t.amount_incl_tax)
        );
    }
    println!(
        "\nTotal (Inc. Tax): {}\n",
        currency.format(ds.total_incl_tax())
    );
}

pub fn print_comparison(cmp: &MonthlyComparison, currency: &Currency) {
    println!("## Monthly Sales Comparison ({} vs {})\n", cmp.current_label, cmp.prior_label);
    print_bucket_rows(&cmp.formatted_rows(currency));
    println!(
        "\nTotals: current {} | prior {}\n",
        currency.format(cmp.current_total()),
        currency.format(cmp.prior_total())
    );

    println!("## Significant Changes ( > 10% )\n");
    let flagged: Vec<FormattedBucket> = cmp
        .formatted_rows(currency)
        .into_iter()
        .filter(|r| r.significant)
        .collect();
    if flagged.is_empty() {
        println!("(none)\n");
    } else {
        print_bucket_rows(&flagged);
        println!();
    }
}

fn print_bucket_rows(rows: &[FormattedBucket]) {
    println!("{:<6} {:>18} {:>18} {:>12}", "Month", "Current", "Prior", "Change");
    for r in rows {
        let marker = if r.significant { " *" } else { "" };
        println!(
            "{:<6} {:>18} {:>18} {:>12}{}",
            r.month, r.current, r.prior, r.pct_change, marker
        );
    }
}

pub fn print_sample(
    sample: &Sample,
    warnings: &[SamplingWarning],
    strata: &[Stratum],
    currency: &Currency,
) {
    for w in warnings {
        eprintln!("warning: {w}");
    }

    if !strata.is_empty() {
        println!("## Strata\n");
        println!("{:<24} {:>10} {:>10}", "Stratum", "Population", "Sampled");
        for s in strata {
            println!("{:<24} {:>10} {:>10}", s.label, s.population, s.drawn());
        }
        println!();
    }

    print_dataset("Final Sample", &sample.to_dataset(), currency);

    println!("## Methodology\n");
    println!("{}\n", sample.narrative());
    if !sample.methodology.parameters.is_empty() {
        for Parameter { name, value } in &sample.methodology.parameters {
            println!("- {name}: {value}");
        }
        println!();
    }
}

#[derive(Serialize)]
pub struct FilterOutput<'a> {
    pub criteria: &'a FilterCriteria,
    pub current: &'a Dataset,
    pub prior: Option<&'a Dataset>,
}

#[derive(Serialize)]
pub struct TrendOutput<'a> {
    pub comparison: &'a MonthlyComparison,
    pub rows: Vec<FormattedBucket>,
    pub significant_months: Vec<&'a str>,
    pub series: Vec<SeriesPoint>,
}

impl<'a> TrendOutput<'a> {
    pub fn new(cmp: &'a MonthlyComparison, currency: &Currency) -> Self {
        Self {
            comparison: cmp,
            rows: cmp.formatted_rows(currency),
            significant_months: cmp.significant().iter().map(|b| b.month.as_str()).collect(),
            series: cmp.plot_series(),
        }
    }
}

/// Invoice numbers that `--add` can pick from, wrapped at 78 columns.
pub fn print_candidates(candidates: &[&str]) {
    println!("## Available for Additional Selection ({})\n", candidates.len());
    if candidates.is_empty() {
        println!("(none)\n");
        return;
    }
    let mut line = String::new();
    for id in candidates {
        if !line.is_empty() && line.len() + id.len() + 2 > 78 {
            println!("{line},");
            line.clear();
        }
        if !line.is_empty() {
            line.push_str(", ");
        }
        line.push_str(id);
    }
    println!("{line}\n");
    println!("Pass --add <ids> to include any of these in the final sample.\n");
}

#[derive(Serialize)]
pub struct SampleOutput<'a> {
    pub rows: &'a [vouch_core::Transaction],
    pub narrative: String,
    pub methodology: &'a vouch_audit::Methodology,
    pub warnings: Vec<String>,
    pub strata: &'a [Stratum],
    pub additional_candidates: &'a [&'a str],
}

impl<'a> SampleOutput<'a> {
    pub fn new(
        sample: &'a Sample,
        warnings: &[SamplingWarning],
        strata: &'a [Stratum],
        additional_candidates: &'a [&'a str],
    ) -> Self {
        Self {
            rows: sample.rows(),
            narrative: sample.narrative(),
            methodology: &sample.methodology,
            warnings: warnings.iter().map(ToString::to_string).collect(),
            strata,
            additional_candidates,
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    Ok(())
}

/// Write the sample with the register's column names plus derived Year/Month.
pub fn write_sample_csv(path: &Path, sample: &Sample) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    wtr.write_record([
        "Invoice Number",
        "Invoice Date",
        "Customer Name",
        "Total Amount",
        "Total Amount (Inc. Tax)",
        "Year",
        "Month",
    ])?;
    for t in sample.rows() {
        wtr.write_record([
            t.invoice_number.clone(),
            t.invoice_date.format("%d-%m-%Y").to_string(),
            t.customer_name.clone(),
            format!("{:.2}", t.amount_excl_tax),
            format!("{:.2}", t.amount_incl_tax),
            t.year().to_string(),
            t.month_label(),
        ])?;
    }
    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
