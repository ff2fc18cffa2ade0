//! Fixed-interval selection from a 1-indexed starting point.

use crate::error::SamplingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystematicPlan {
    /// `floor(population / size)`
    pub interval: usize,
    /// 0-indexed positions, exactly `size` of them
    pub positions: Vec<usize>,
}

/// Positions `start-1, start-1+k, ...` for `size` items, `k = floor(N / n)`.
///
/// Never truncates: if the last position would fall past the population the
/// request is rejected.
pub fn plan(population: usize, size: usize, start: usize) -> Result<SystematicPlan, SamplingError> {
    if size == 0 {
        return Err(SamplingError::InvalidSampleSize);
    }
    let interval = population / size;
    if interval == 0 {
        return Err(SamplingError::SampleSizeExceedsPopulation { size, population });
    }
    if start < 1 || start > population {
        return Err(SamplingError::InvalidStartOffset { start, population });
    }

    let first = start - 1;
    if first + interval * (size - 1) >= population {
        return Err(SamplingError::SystematicOutOfBounds {
            start,
            interval,
            size,
            population,
        });
    }

    Ok(SystematicPlan {
        interval,
        positions: (0..size).map(|i| first + i * interval).collect(),
    })
}
