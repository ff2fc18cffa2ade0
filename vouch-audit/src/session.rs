//! Sampling session: select method -> generate initial -> (augment) -> final.
//!
//! Holds the latest initial and final samples for one population. A failed
//! generation leaves both exactly as they were.

use rand::Rng;
use vouch_core::Dataset;

use crate::accumulator::SampleAccumulator;
use crate::error::{SamplingError, SamplingWarning};
use crate::sample::Sample;
use crate::sampling::{GeneratedSample, SamplingEngine, SamplingMethod, Stratum};

#[derive(Debug)]
pub struct SamplingSession<'a> {
    population: &'a Dataset,
    engine: SamplingEngine,
    initial: Option<Sample>,
    final_sample: Option<Sample>,
    warnings: Vec<SamplingWarning>,
    strata: Vec<Stratum>,
}

impl<'a> SamplingSession<'a> {
    pub fn new(population: &'a Dataset, engine: SamplingEngine) -> Self {
        Self {
            population,
            engine,
            initial: None,
            final_sample: None,
            warnings: Vec::new(),
            strata: Vec::new(),
        }
    }

    pub fn population(&self) -> &Dataset {
        self.population
    }

    /// Generate a fresh initial sample, replacing any previous one.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        method: &SamplingMethod,
        rng: &mut R,
    ) -> Result<&Sample, SamplingError> {
        let GeneratedSample {
            sample,
            warnings,
            strata,
        } = self.engine.generate(self.population, method, rng)?;

        self.warnings = warnings;
        self.strata = strata;
        self.final_sample = Some(sample.clone());
        Ok(self.initial.insert(sample))
    }

    /// Add judgmental selections on top of the current initial sample (or
    /// on their own when there is none).
    pub fn augment(&mut self, additional: &[String]) -> &Sample {
        let merged = SampleAccumulator::combine(self.initial.as_ref(), additional, self.population);
        self.final_sample.insert(merged)
    }

    /// Candidate invoice numbers for [`Self::augment`].
    pub fn additional_candidates(&self) -> Vec<&'a str> {
        SampleAccumulator::additional_candidates(self.population, self.initial.as_ref())
    }

    pub fn initial(&self) -> Option<&Sample> {
        self.initial.as_ref()
    }

    pub fn final_sample(&self) -> Option<&Sample> {
        self.final_sample.as_ref()
    }

    pub fn warnings(&self) -> &[SamplingWarning] {
        &self.warnings
    }

    pub fn strata(&self) -> &[Stratum] {
        &self.strata
    }

    /// Hand back the final sample, ending the session.
    pub fn finalize(self) -> Option<Sample> {
        self.final_sample
    }
}
