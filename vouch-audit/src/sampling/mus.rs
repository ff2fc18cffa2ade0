//! Monetary unit sampling (probability proportional to size).
//!
//! Every currency unit of the population is a sampling unit. The cumulative
//! total is cut into `n` equal intervals, one random point is drawn inside
//! each interval, and the row whose running total first reaches that point is
//! hit. Large rows can absorb several hits; hits are deduplicated and the
//! sample is not topped up, so fewer than `n` rows may come back.

use rand::Rng;

use crate::error::SamplingError;

#[derive(Debug, Clone, PartialEq)]
pub struct MusSelection {
    pub total: f64,
    pub interval: f64,
    /// Distinct positions in order of first hit
    pub positions: Vec<usize>,
}

pub fn select<R: Rng + ?Sized>(
    amounts: &[f64],
    size: usize,
    rng: &mut R,
) -> Result<MusSelection, SamplingError> {
    if size == 0 {
        return Err(SamplingError::InvalidSampleSize);
    }
    if amounts.is_empty() {
        return Err(SamplingError::EmptyPopulation);
    }

    // Running total, scoped to this call.
    let cumulative: Vec<f64> = amounts
        .iter()
        .scan(0.0, |acc, a| {
            *acc += a;
            Some(*acc)
        })
        .collect();
    let total = cumulative[cumulative.len() - 1];
    if total.is_infinite() && total > 0.0 {
        return Err(SamplingError::TotalOverflow);
    }
    if !(total > 0.0) {
        return Err(SamplingError::ZeroOrNegativeTotal { total });
    }

    let interval = total / size as f64;
    if !(interval > 0.0) {
        return Err(SamplingError::ZeroInterval { size });
    }

    // Negative rows make the running total non-monotone; its running maximum
    // is monotone and first reaches a point at the same row the total does.
    let peak: Vec<f64> = cumulative
        .iter()
        .scan(f64::NEG_INFINITY, |m, c| {
            *m = m.max(*c);
            Some(*m)
        })
        .collect();
    let overall_max = peak[peak.len() - 1];

    let mut positions: Vec<usize> = Vec::new();
    for i in 0..size {
        // Offset within the interval; `(i + 1) * interval` can round past
        // f64::MAX when the total is near it, so the point is capped at the total.
        let lo = i as f64 * interval;
        let point = (lo + rng.gen_range(0.0..1.0) * interval).min(total);

        let mut hit = peak.partition_point(|&m| m < point);
        if hit == peak.len() {
            // Float rounding pushed the point past the total; take the row
            // where the total peaks.
            hit = peak.partition_point(|&m| m < overall_max);
        }
        if !positions.contains(&hit) {
            positions.push(hit);
        }
    }

    log::debug!(
        "MUS total={total:.2} interval={interval:.2} hits={}/{size}",
        positions.len()
    );

    Ok(MusSelection {
        total,
        interval,
        positions,
    })
}
