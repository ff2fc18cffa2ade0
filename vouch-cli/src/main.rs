use anyhow::{Context, Result, bail};
use chrono::{Datelike, Months, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vouch_audit::{MethodKind, SamplingEngine, SamplingMethod, SamplingSession, TrendReconciler};
use vouch_core::{Currency, Dataset, FilterCriteria, filter};
use vouch_ingest::{LoadedRegister, RegisterCache};

mod config;
mod report;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "vouch",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VOUCH_BUILD_SHA"), ")"),
    about = "Sales register trend review and audit sampling"
)]
struct Cli {
    /// Log progress (info level); RUST_LOG overrides
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the filtered current (and optional prior) period registers
    Filter {
        /// Current period sales register CSV
        #[arg(long)]
        current: PathBuf,

        /// Prior period sales register CSV
        #[arg(long)]
        prior: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        json: bool,
    },

    /// Month-by-month comparison of current vs prior sales, flagging >10% moves
    Trend {
        #[arg(long)]
        current: PathBuf,

        #[arg(long)]
        prior: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        json: bool,
    },

    /// Draw an audit sample from the filtered current period
    Sample {
        #[arg(long)]
        current: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Initial sampling method; omit to select only --add invoices
        #[arg(long, value_enum)]
        method: Option<MethodArg>,

        /// Sample size (default: config default_size, capped at the population)
        #[arg(long)]
        size: Option<usize>,

        /// Systematic starting item, 1-indexed
        #[arg(long, default_value_t = 1)]
        start: usize,

        /// Stratum boundaries on amount incl. tax, e.g. "1000,5000"
        #[arg(long)]
        boundaries: Option<String>,

        /// Invoice numbers for judgmental sampling
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Invoice numbers to add on top of the initial sample
        #[arg(long, value_delimiter = ',')]
        add: Vec<String>,

        /// RNG seed (default: config seed, else a fresh one)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the final sample as CSV
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Manage ~/.vouch/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Random,
    Systematic,
    Mus,
    Judgmental,
    Stratified,
}

#[derive(Args, Debug, Clone, Default)]
struct FilterArgs {
    /// First invoice date kept (YYYY-MM-DD or dd-mm-yyyy)
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,

    /// Last invoice date kept (YYYY-MM-DD or dd-mm-yyyy)
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,

    /// Prior period window start (default: --from minus one year)
    #[arg(long, value_parser = parse_date)]
    prior_from: Option<NaiveDate>,

    /// Prior period window end (default: --to minus one year)
    #[arg(long, value_parser = parse_date)]
    prior_to: Option<NaiveDate>,

    /// Exact customer name
    #[arg(long)]
    customer: Option<String>,

    /// Lower bound on amount excl. tax
    #[arg(long)]
    min_amount: Option<f64>,

    /// Upper bound on amount excl. tax
    #[arg(long)]
    max_amount: Option<f64>,
}

impl FilterArgs {
    /// Overlay the flags on defaults derived from the current period.
    fn resolve(&self, current: &Dataset) -> Result<FilterCriteria> {
        let mut c = FilterCriteria::defaults_for(current, chrono::Local::now().year());
        if let Some(d) = self.from {
            c.start = d;
        }
        if let Some(d) = self.to {
            c.end = d;
        }
        if let Some(name) = &self.customer {
            c.customer = Some(name.clone());
        }
        if let Some(min) = self.min_amount {
            c.min_amount = min;
        }
        if let Some(max) = self.max_amount {
            c.max_amount = max;
        }
        if c.start > c.end {
            bail!("--from {} is after --to {}", c.start, c.end);
        }
        if c.min_amount > c.max_amount {
            bail!(
                "--min-amount {} is above --max-amount {}",
                c.min_amount,
                c.max_amount
            );
        }
        Ok(c)
    }

    /// Same customer and amount bounds, date window moved to the prior period.
    fn resolve_prior(&self, current: &FilterCriteria) -> Result<FilterCriteria> {
        let mut c = current.clone();
        c.start = match self.prior_from {
            Some(d) => d,
            None => year_earlier(current.start)?,
        };
        c.end = match self.prior_to {
            Some(d) => d,
            None => year_earlier(current.end)?,
        };
        if c.start > c.end {
            bail!("prior window {} is after {}", c.start, c.end);
        }
        Ok(c)
    }
}

fn year_earlier(d: NaiveDate) -> Result<NaiveDate> {
    d.checked_sub_months(Months::new(12))
        .with_context(|| format!("no date one year before {d}"))
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d-%m-%Y"))
        .map_err(|_| format!("invalid date {s:?} (use YYYY-MM-DD or dd-mm-yyyy)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config()?;
    let currency = Currency::new(cfg.display.currency_symbol.clone());
    let mut cache = RegisterCache::new();

    match cli.command {
        Command::Filter {
            current,
            prior,
            filters,
            json,
        } => {
            let cy = load(&mut cache, &current)?;
            let criteria = filters.resolve(&cy.dataset)?;
            let cy_filtered = filter(&cy.dataset, &criteria);

            let py_filtered = match &prior {
                Some(path) => {
                    let py = load(&mut cache, path)?;
                    Some(filter(&py.dataset, &filters.resolve_prior(&criteria)?))
                }
                None => None,
            };

            if json {
                report::print_json(&report::FilterOutput {
                    criteria: &criteria,
                    current: &cy_filtered,
                    prior: py_filtered.as_ref(),
                })?;
            } else {
                report::print_dataset("Filtered Current Period Data", &cy_filtered, &currency);
                if let Some(py) = &py_filtered {
                    report::print_dataset("Filtered Prior Period Data", py, &currency);
                }
            }
        }

        Command::Trend {
            current,
            prior,
            filters,
            json,
        } => {
            let cy = load(&mut cache, &current)?;
            let py = load(&mut cache, &prior)?;
            let criteria = filters.resolve(&cy.dataset)?;
            let cy_filtered = filter(&cy.dataset, &criteria);
            let py_filtered = filter(&py.dataset, &filters.resolve_prior(&criteria)?);

            match TrendReconciler::reconcile(&cy_filtered, &py_filtered) {
                Ok(cmp) => {
                    if json {
                        report::print_json(&report::TrendOutput::new(&cmp, &currency))?;
                    } else {
                        report::print_comparison(&cmp, &currency);
                    }
                }
                Err(e) => {
                    log::warn!("{e}");
                    println!("No data available for trend analysis after filtering.");
                }
            }
        }

        Command::Sample {
            current,
            filters,
            method,
            size,
            start,
            boundaries,
            select,
            add,
            seed,
            out,
            json,
        } => {
            if method.is_none() && add.is_empty() {
                bail!("nothing to sample: pass --method and/or --add");
            }

            let cy = load(&mut cache, &current)?;
            let criteria = filters.resolve(&cy.dataset)?;
            let population = filter(&cy.dataset, &criteria);
            if population.is_empty() {
                bail!("no transactions left after filtering; nothing to sample");
            }

            let size = size.unwrap_or_else(|| cfg.sampling.default_size.min(population.len()));
            let seed = seed
                .or(cfg.sampling.seed)
                .unwrap_or_else(|| rand::thread_rng().next_u64());
            let mut rng = StdRng::seed_from_u64(seed);

            let mut session = SamplingSession::new(&population, SamplingEngine::new(currency.clone()));
            if let Some(m) = method {
                let request = sampling_method(m, size, start, boundaries, select, &cfg);
                session
                    .generate(&request, &mut rng)
                    .with_context(|| format!("{} sampling failed", request.kind()))?;
            }
            if !add.is_empty() {
                session.augment(&add);
            }

            let warnings = session.warnings().to_vec();
            let strata = session.strata().to_vec();
            let candidates = session.additional_candidates();
            let mut sample = session.finalize().context("no sample was produced")?;

            if matches!(
                sample.methodology.method,
                Some(MethodKind::Random | MethodKind::MonetaryUnit | MethodKind::Stratified)
            ) {
                sample.methodology.push_parameter("seed", seed);
            }

            if json {
                report::print_json(&report::SampleOutput::new(
                    &sample,
                    &warnings,
                    &strata,
                    &candidates,
                ))?;
            } else {
                report::print_sample(&sample, &warnings, &strata, &currency);
                if add.is_empty() {
                    report::print_candidates(&candidates);
                }
            }

            if let Some(path) = out {
                report::write_sample_csv(&path, &sample)?;
                if !json {
                    println!("Wrote {} rows to {}", sample.len(), path.display());
                }
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn sampling_method(
    method: MethodArg,
    size: usize,
    start: usize,
    boundaries: Option<String>,
    select: Vec<String>,
    cfg: &Config,
) -> SamplingMethod {
    match method {
        MethodArg::Random => SamplingMethod::Random { size },
        MethodArg::Systematic => SamplingMethod::Systematic { size, start },
        MethodArg::Mus => SamplingMethod::MonetaryUnit { size },
        MethodArg::Judgmental => SamplingMethod::Judgmental { invoices: select },
        MethodArg::Stratified => SamplingMethod::Stratified {
            size,
            boundaries: boundaries.unwrap_or_else(|| cfg.sampling.default_boundaries.clone()),
        },
    }
}

fn load(cache: &mut RegisterCache, path: &Path) -> Result<Arc<LoadedRegister>> {
    let loaded = cache
        .load_path(path)
        .with_context(|| format!("loading {}", path.display()))?;
    if !loaded.report.is_clean() {
        eprintln!(
            "warning: {}: skipped {} of {} rows (bad dates: {}, bad amounts: {}, missing invoice numbers: {})",
            path.display(),
            loaded.report.rows_skipped(),
            loaded.report.rows_read,
            loaded.report.bad_dates,
            loaded.report.bad_amounts,
            loaded.report.missing_invoice_numbers
        );
    }
    Ok(loaded)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_date_accepts_both_orders() {
        assert_eq!(parse_date("2024-04-01").unwrap(), d(2024, 4, 1));
        assert_eq!(parse_date("01-04-2024").unwrap(), d(2024, 4, 1));
        assert!(parse_date("April 1").is_err());
    }

    #[test]
    fn test_prior_window_defaults_to_year_earlier() {
        let args = FilterArgs {
            customer: Some("Acme".into()),
            ..Default::default()
        };
        let current = FilterCriteria::between(d(2024, 4, 1), d(2025, 3, 31)).with_customer("Acme");
        let prior = args.resolve_prior(&current).unwrap();
        assert_eq!(prior.start, d(2023, 4, 1));
        assert_eq!(prior.end, d(2024, 3, 31));
        assert_eq!(prior.customer.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_resolve_rejects_inverted_range() {
        let args = FilterArgs {
            from: Some(d(2024, 5, 1)),
            to: Some(d(2024, 4, 1)),
            ..Default::default()
        };
        assert!(args.resolve(&Dataset::default()).is_err());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let mut cache = RegisterCache::new();
        let err = load(&mut cache, Path::new("no-such-register.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("no-such-register.csv"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sample_json_lists_candidates() {
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let pop: Dataset = ["J1", "J2", "J3"]
            .iter()
            .map(|id| vouch_core::Transaction::new(*id, d, "Acme", 100.0, 118.0))
            .collect();
        let mut session = SamplingSession::new(&pop, SamplingEngine::default());
        session
            .generate(
                &SamplingMethod::Judgmental {
                    invoices: vec!["J2".into()],
                },
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap();
        let candidates = session.additional_candidates();
        let sample = session.finalize().unwrap();

        let out = report::SampleOutput::new(&sample, &[], &[], &candidates);
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["additional_candidates"], serde_json::json!(["J1", "J3"]));
    }

    #[test]
    fn test_cli_parses_sample_flags() {
        let cli = Cli::try_parse_from([
            "vouch", "sample", "--current", "cy.csv", "--method", "mus", "--size", "5",
            "--add", "A1,A2", "--seed", "7",
        ])
        .unwrap();
        match cli.command {
            Command::Sample {
                method, size, add, seed, ..
            } => {
                assert_eq!(method, Some(MethodArg::Mus));
                assert_eq!(size, Some(5));
                assert_eq!(add, vec!["A1", "A2"]);
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
