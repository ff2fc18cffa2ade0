//! Stratified selection by amount band.
//!
//! Interior boundaries `b1 < b2 < ...` give strata `[0, b1)`, `[b1, b2)`, ...,
//! `[bk, inf)` over amount including tax. The sample size is spread across
//! strata in proportion to their populations, every populated stratum gets
//! at least one item, and any overshoot is taken back from the largest
//! allocation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SamplingError, SamplingWarning};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stratum {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub population: usize,
    pub allocation: usize,
}

impl Stratum {
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.lower && amount < self.upper
    }

    /// Items actually drawn: allocation capped by population.
    pub fn drawn(&self) -> usize {
        self.allocation.min(self.population)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StratifiedSelection {
    pub strata: Vec<Stratum>,
    pub positions: Vec<usize>,
    pub warnings: Vec<SamplingWarning>,
}

/// Parse comma-separated interior boundaries, e.g. `"1000, 5000"`.
///
/// Values must be finite, positive and strictly ascending.
pub fn parse_boundaries(input: &str) -> Result<Vec<f64>, SamplingError> {
    let fail = |reason: String| SamplingError::StratifiedParseFailure {
        input: input.to_string(),
        reason,
    };

    let mut out = Vec::new();
    for piece in input.split(',') {
        let piece = piece.trim();
        let value: f64 = piece
            .parse()
            .map_err(|_| fail(format!("'{piece}' is not a number")))?;
        if !value.is_finite() {
            return Err(fail(format!("'{piece}' is not a finite amount")));
        }
        out.push(value);
    }

    if out[0] <= 0.0 {
        return Err(fail("boundaries must be greater than zero".to_string()));
    }
    if out.windows(2).any(|w| w[0] >= w[1]) {
        return Err(fail("boundaries must be strictly ascending".to_string()));
    }
    Ok(out)
}

/// Build the strata for `boundaries` and bucket `amounts` into them.
/// Returns the strata (allocation still 0) and the member positions of each.
pub fn build_strata(boundaries: &[f64], amounts: &[f64]) -> (Vec<Stratum>, Vec<Vec<usize>>) {
    let mut edges = Vec::with_capacity(boundaries.len() + 2);
    edges.push(0.0);
    edges.extend_from_slice(boundaries);
    edges.push(f64::INFINITY);

    let mut strata: Vec<Stratum> = edges
        .windows(2)
        .map(|w| Stratum {
            label: format!("{}-{}", w[0], w[1]),
            lower: w[0],
            upper: w[1],
            population: 0,
            allocation: 0,
        })
        .collect();

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); strata.len()];
    for (pos, &amount) in amounts.iter().enumerate() {
        // Negative (or NaN) amounts fall outside every stratum.
        if let Some(idx) = strata.iter().position(|s| s.contains(amount)) {
            strata[idx].population += 1;
            members[idx].push(pos);
        }
    }

    (strata, members)
}

/// Proportional allocation of `size` over stratum populations.
pub fn allocate(populations: &[usize], size: usize) -> Vec<usize> {
    let total: usize = populations.iter().sum();
    if total == 0 {
        return vec![0; populations.len()];
    }

    let mut alloc: Vec<usize> = populations
        .iter()
        .map(|&c| (size as f64 * c as f64 / total as f64).round_ties_even() as usize)
        .collect();

    for (a, &c) in alloc.iter_mut().zip(populations) {
        if c > 0 && *a == 0 {
            *a = 1;
        }
    }

    while alloc.iter().sum::<usize>() > size {
        // First stratum holding the largest allocation.
        let (idx, _) = alloc
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, &a)| if a > best.1 { (i, a) } else { best });
        alloc[idx] -= 1;
    }

    alloc
}

pub fn select<R: Rng + ?Sized>(
    boundaries_text: &str,
    amounts: &[f64],
    size: usize,
    rng: &mut R,
) -> Result<StratifiedSelection, SamplingError> {
    let boundaries = parse_boundaries(boundaries_text)?;
    if size == 0 {
        return Err(SamplingError::InvalidSampleSize);
    }

    let (mut strata, members) = build_strata(&boundaries, amounts);
    let populations: Vec<usize> = strata.iter().map(|s| s.population).collect();
    if populations.iter().sum::<usize>() == 0 {
        return Err(SamplingError::EmptyPopulation);
    }

    for (stratum, a) in strata.iter_mut().zip(allocate(&populations, size)) {
        stratum.allocation = a;
    }

    let mut warnings = Vec::new();
    if size < strata.len() {
        log::warn!(
            "sample size {size} is smaller than the {} strata; some may go unrepresented",
            strata.len()
        );
        warnings.push(SamplingWarning::StratifiedUnderrepresentation {
            size,
            strata: strata.len(),
        });
    }

    let mut positions = Vec::new();
    for (stratum, rows) in strata.iter().zip(&members) {
        if rows.is_empty() {
            continue;
        }
        let mut picks = rand::seq::index::sample(rng, rows.len(), stratum.drawn()).into_vec();
        picks.sort_unstable();
        positions.extend(picks.into_iter().map(|i| rows[i]));
        log::debug!(
            "stratum {}: {} of {} drawn",
            stratum.label,
            stratum.drawn(),
            stratum.population
        );
    }

    Ok(StratifiedSelection {
        strata,
        positions,
        warnings,
    })
}
