//! Sampling engine: one algorithm per [`SamplingMethod`] variant.
//!
//! Generation is a pure function of the population, the method parameters
//! and the injected random source. Calling it again replaces, never extends,
//! the previous initial sample.

pub mod judgmental;
pub mod mus;
pub mod random;
pub mod stratified;
pub mod systematic;

use rand::Rng;
use serde::{Deserialize, Serialize};
use vouch_core::{Currency, Dataset, Transaction};

use crate::error::{SamplingError, SamplingWarning};
use crate::sample::{MethodKind, Methodology, Sample};
pub use stratified::Stratum;

/// Selection method with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SamplingMethod {
    Random { size: usize },
    /// `start` is 1-indexed
    Systematic { size: usize, start: usize },
    MonetaryUnit { size: usize },
    Judgmental { invoices: Vec<String> },
    /// `boundaries` is the raw comma-separated text as entered
    Stratified { size: usize, boundaries: String },
}

impl SamplingMethod {
    pub fn kind(&self) -> MethodKind {
        match self {
            SamplingMethod::Random { .. } => MethodKind::Random,
            SamplingMethod::Systematic { .. } => MethodKind::Systematic,
            SamplingMethod::MonetaryUnit { .. } => MethodKind::MonetaryUnit,
            SamplingMethod::Judgmental { .. } => MethodKind::Judgmental,
            SamplingMethod::Stratified { .. } => MethodKind::Stratified,
        }
    }
}

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSample {
    pub sample: Sample,
    pub warnings: Vec<SamplingWarning>,
    /// Populated for stratified sampling only
    pub strata: Vec<Stratum>,
}

#[derive(Debug, Clone, Default)]
pub struct SamplingEngine {
    currency: Currency,
}

impl SamplingEngine {
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Generate an initial sample from `population`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        population: &Dataset,
        method: &SamplingMethod,
        rng: &mut R,
    ) -> Result<GeneratedSample, SamplingError> {
        let result = self.dispatch(population, method, rng);
        match &result {
            Ok(generated) => log::info!(
                "{} sample: {} of {} transactions",
                method.kind(),
                generated.sample.len(),
                population.len()
            ),
            Err(e) => log::warn!("{} sampling rejected: {e}", method.kind()),
        }
        result
    }

    fn dispatch<R: Rng + ?Sized>(
        &self,
        population: &Dataset,
        method: &SamplingMethod,
        rng: &mut R,
    ) -> Result<GeneratedSample, SamplingError> {
        let n_pop = population.len();

        match method {
            SamplingMethod::Random { size } => {
                let positions = random::draw(n_pop, *size, rng)?;
                let methodology = Methodology::new(
                    MethodKind::Random,
                    format!("**Random Sampling:** A random sample of {size} transactions was selected."),
                )
                .with_parameter("size", size)
                .with_parameter("population", n_pop);
                Ok(plain(population, &positions, methodology))
            }

            SamplingMethod::Systematic { size, start } => {
                let plan = systematic::plan(n_pop, *size, *start)?;
                let methodology = Methodology::new(
                    MethodKind::Systematic,
                    format!(
                        "**Systematic Sampling:** A systematic sample of {size} transactions was selected, starting from item {start} and selecting every {}th item.",
                        plan.interval
                    ),
                )
                .with_parameter("size", size)
                .with_parameter("population", n_pop)
                .with_parameter("start", start)
                .with_parameter("interval", plan.interval);
                Ok(plain(population, &plan.positions, methodology))
            }

            SamplingMethod::MonetaryUnit { size } => {
                let amounts = amounts_incl_tax(population);
                let sel = mus::select(&amounts, *size, rng)?;
                let methodology = Methodology::new(
                    MethodKind::MonetaryUnit,
                    format!(
                        "**Monetary Unit Sampling (MUS):** An MUS sample of {size} transactions was selected.  The sampling interval was {}. {} distinct transactions were hit.",
                        self.currency.format(sel.interval),
                        sel.positions.len()
                    ),
                )
                .with_parameter("size", size)
                .with_parameter("population", n_pop)
                .with_parameter("total", self.currency.format(sel.total))
                .with_parameter("interval", self.currency.format(sel.interval))
                .with_parameter("distinct_hits", sel.positions.len());
                Ok(plain(population, &sel.positions, methodology))
            }

            SamplingMethod::Judgmental { invoices } => {
                let positions = judgmental::select(population, invoices)?;
                let methodology = Methodology::new(
                    MethodKind::Judgmental,
                    format!(
                        "**Judgmental Sampling:** The following invoice numbers were initially selected: {}",
                        invoices.join(", ")
                    ),
                )
                .with_parameter("selected", invoices.len());
                Ok(plain(population, &positions, methodology))
            }

            SamplingMethod::Stratified { size, boundaries } => {
                let amounts = amounts_incl_tax(population);
                let sel = stratified::select(boundaries, &amounts, *size, rng)?;
                let allocation = sel
                    .strata
                    .iter()
                    .map(|s| format!("{}: {} of {}", s.label, s.drawn(), s.population))
                    .collect::<Vec<_>>()
                    .join("; ");
                let methodology = Methodology::new(
                    MethodKind::Stratified,
                    format!(
                        "**Stratified Sampling:** The data was stratified based on 'Total Amount (Inc. Tax)' with boundaries: {boundaries}.  A sample of size {size} was selected proportionally."
                    ),
                )
                .with_parameter("size", size)
                .with_parameter("population", n_pop)
                .with_parameter("boundaries", boundaries)
                .with_parameter("allocation", allocation);

                Ok(GeneratedSample {
                    sample: Sample::from_rows(rows_at(population, &sel.positions), methodology),
                    warnings: sel.warnings,
                    strata: sel.strata,
                })
            }
        }
    }
}

fn amounts_incl_tax(population: &Dataset) -> Vec<f64> {
    population.iter().map(|t| t.amount_incl_tax).collect()
}

fn rows_at<'a>(
    population: &'a Dataset,
    positions: &'a [usize],
) -> impl Iterator<Item = Transaction> + 'a {
    positions.iter().map(|&i| population.rows()[i].clone())
}

fn plain(population: &Dataset, positions: &[usize], methodology: Methodology) -> GeneratedSample {
    GeneratedSample {
        sample: Sample::from_rows(rows_at(population, positions), methodology),
        warnings: Vec::new(),
        strata: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn population(amounts: &[f64]) -> Dataset {
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| Transaction::new(format!("INV-{:03}", i + 1), d, "Acme", a / 1.18, a))
            .collect()
    }

    fn engine() -> SamplingEngine {
        SamplingEngine::new(Currency::default())
    }

    #[test]
    fn test_random_methodology() {
        let pop = population(&[100.0; 10]);
        let out = engine()
            .generate(&pop, &SamplingMethod::Random { size: 4 }, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(out.sample.len(), 4);
        assert_eq!(out.sample.methodology.method, Some(MethodKind::Random));
        assert_eq!(
            out.sample.narrative(),
            "**Random Sampling:** A random sample of 4 transactions was selected."
        );
    }

    #[test]
    fn test_systematic_positions_and_text() {
        let pop = population(&[10.0; 10]);
        let out = engine()
            .generate(
                &pop,
                &SamplingMethod::Systematic { size: 3, start: 1 },
                &mut StdRng::seed_from_u64(0),
            )
            .unwrap();
        assert_eq!(out.sample.invoice_numbers(), vec!["INV-001", "INV-004", "INV-007"]);
        assert!(out.sample.narrative().contains("starting from item 1 and selecting every 3th item"));
        assert_eq!(out.sample.methodology.parameter("interval"), Some("3"));
    }

    #[test]
    fn test_mus_interval_in_currency() {
        let pop = population(&[50.0, 50.0, 50.0, 50.0]);
        let out = engine()
            .generate(&pop, &SamplingMethod::MonetaryUnit { size: 2 }, &mut StdRng::seed_from_u64(4))
            .unwrap();
        assert!(out.sample.len() <= 2);
        assert!(out.sample.narrative().contains("The sampling interval was ₹100.00."));
        assert_eq!(out.sample.methodology.parameter("total"), Some("₹200.00"));
    }

    #[test]
    fn test_judgmental_text_lists_ids() {
        let pop = population(&[1.0, 2.0, 3.0]);
        let method = SamplingMethod::Judgmental {
            invoices: vec!["INV-003".into(), "INV-001".into()],
        };
        let out = engine().generate(&pop, &method, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(out.sample.invoice_numbers(), vec!["INV-001", "INV-003"]);
        assert!(out.sample.narrative().ends_with("initially selected: INV-003, INV-001"));
    }

    #[test]
    fn test_stratified_reports_strata() {
        let pop = population(&[50.0, 150.0, 250.0]);
        let method = SamplingMethod::Stratified {
            size: 2,
            boundaries: "100".into(),
        };
        let out = engine().generate(&pop, &method, &mut StdRng::seed_from_u64(12)).unwrap();
        assert_eq!(out.strata.len(), 2);
        assert_eq!(out.sample.len(), 2);
        assert!(out.sample.narrative().contains("with boundaries: 100."));
        assert_eq!(
            out.sample.methodology.parameter("allocation"),
            Some("0-100: 1 of 1; 100-inf: 1 of 2")
        );
    }

    #[test]
    fn test_rejections_surface_as_errors() {
        let pop = population(&[1.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            engine().generate(&pop, &SamplingMethod::Random { size: 3 }, &mut rng),
            Err(SamplingError::SampleSizeExceedsPopulation { .. })
        ));
        assert!(matches!(
            engine().generate(
                &pop,
                &SamplingMethod::Stratified { size: 1, boundaries: "a,b".into() },
                &mut rng
            ),
            Err(SamplingError::StratifiedParseFailure { .. })
        ));
        let zero = population(&[0.0, 0.0]);
        assert!(matches!(
            engine().generate(&zero, &SamplingMethod::MonetaryUnit { size: 1 }, &mut rng),
            Err(SamplingError::ZeroOrNegativeTotal { .. })
        ));
    }

    #[test]
    fn test_method_serde_tag() {
        let m: SamplingMethod =
            serde_json::from_str(r#"{"method":"systematic","size":5,"start":2}"#).unwrap();
        assert_eq!(m, SamplingMethod::Systematic { size: 5, start: 2 });
        assert_eq!(m.kind(), MethodKind::Systematic);
    }
}
