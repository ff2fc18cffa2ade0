//! Simple random selection without replacement.

use rand::Rng;

use crate::error::SamplingError;

/// Draw `size` distinct positions out of `population`, returned ascending.
pub fn draw<R: Rng + ?Sized>(
    population: usize,
    size: usize,
    rng: &mut R,
) -> Result<Vec<usize>, SamplingError> {
    if size == 0 {
        return Err(SamplingError::InvalidSampleSize);
    }
    if size > population {
        return Err(SamplingError::SampleSizeExceedsPopulation { size, population });
    }

    let mut positions = rand::seq::index::sample(rng, population, size).into_vec();
    positions.sort_unstable();
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_draws_distinct_positions() {
        let mut rng = StdRng::seed_from_u64(7);
        let picks = draw(50, 20, &mut rng).unwrap();
        assert_eq!(picks.len(), 20);
        assert_eq!(picks.iter().collect::<HashSet<_>>().len(), 20);
        assert!(picks.iter().all(|&p| p < 50));
        assert!(picks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_full_population() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw(4, 4, &mut rng).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_same_seed_same_draw() {
        let a = draw(1000, 15, &mut StdRng::seed_from_u64(2024)).unwrap();
        let b = draw(1000, 15, &mut StdRng::seed_from_u64(2024)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_oversized_request() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            draw(3, 4, &mut rng),
            Err(SamplingError::SampleSizeExceedsPopulation {
                size: 4,
                population: 3
            })
        );
        assert_eq!(draw(3, 0, &mut rng), Err(SamplingError::InvalidSampleSize));
    }
}
