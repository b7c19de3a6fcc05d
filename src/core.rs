//! The capability set every sampler exposes, plus the state and configuration they share.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::{SamplerError, SamplerResult};
use crate::likelihood::{GaussianLikelihood, ParamLikelihood};
use crate::models::Model;
use crate::observations::{Observations, Rigidity};
use crate::params::{ParamInfo, ParamSummary};
use crate::stats::MarginalDistribution;

/// Upper bound on bins per parameter.
pub const MAX_BINS: usize = 10_000_000;

/// Seed used by Metropolis-Hastings chains unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/**
Settings for building a sampler through [`AnySampler`](crate::factory::AnySampler).

Defaults: 100 bins, 100 000 sample points, step size 0.01, seed [`DEFAULT_SEED`] and
lenient file loading.

# Examples

```rust
use mini_fit::core::SamplerConfig;
use mini_fit::observations::Rigidity;

let config = SamplerConfig::default()
    .set_num_bins(20)
    .set_rigidity(Rigidity::Strict)
    .set_seed(7);
assert_eq!(config.num_bins, 20);
assert_eq!(config.sample_points, 100_000);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    pub num_bins: usize,
    pub sample_points: usize,
    pub step_size: f64,
    pub seed: u64,
    pub rigidity: Rigidity,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            num_bins: 100,
            sample_points: 100_000,
            step_size: 0.01,
            seed: DEFAULT_SEED,
            rigidity: Rigidity::Lenient,
        }
    }
}

impl SamplerConfig {
    pub fn set_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = num_bins;
        self
    }

    pub fn set_sample_points(mut self, sample_points: usize) -> Self {
        self.sample_points = sample_points;
        self
    }

    pub fn set_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_rigidity(mut self, rigidity: Rigidity) -> Self {
        self.rigidity = rigidity;
        self
    }
}

/// Number of grid cells `num_bins^D`, or `None` on overflow.
pub fn grid_cells<const D: usize>(num_bins: usize) -> Option<usize> {
    u32::try_from(D)
        .ok()
        .and_then(|d| num_bins.checked_pow(d))
}

/// State shared by every sampler: the likelihood, parameter metadata, marginal
/// histograms, the likelihood map and the single-use flag.
#[derive(Debug, Clone)]
pub struct SamplerCore<const D: usize, M> {
    pub(crate) likelihood: GaussianLikelihood<M>,
    pub(crate) params: [ParamInfo; D],
    pub(crate) num_bins: usize,
    pub(crate) marginal: MarginalDistribution,
    pub(crate) param_likelihood: ParamLikelihood<D>,
    been_sampled: bool,
}

impl<const D: usize, M: Model<D>> SamplerCore<D, M> {
    pub fn new(
        observations: Observations,
        model: M,
        params: [ParamInfo; D],
        num_bins: usize,
    ) -> SamplerResult<Self> {
        if D == 0 {
            return Err(SamplerError::Configuration(
                "at least one parameter is required".to_string(),
            ));
        }
        if num_bins == 0 || num_bins > MAX_BINS {
            return Err(SamplerError::Configuration(format!(
                "number of bins must be between 1 and {MAX_BINS}, got {num_bins}"
            )));
        }
        Ok(Self {
            likelihood: GaussianLikelihood::new(observations, model),
            params,
            num_bins,
            marginal: MarginalDistribution::new(D, num_bins),
            param_likelihood: ParamLikelihood::new(),
            been_sampled: false,
        })
    }

    pub fn log_likelihood(&self, params: &[f64; D]) -> f64 {
        self.likelihood.log_likelihood(params)
    }

    /// Fails if this instance has already sampled.
    pub(crate) fn ensure_unsampled(&self, kind: &str) -> SamplerResult<()> {
        if self.been_sampled {
            return Err(SamplerError::State(format!(
                "procedure aborted as {kind} instance has already sampled the data points"
            )));
        }
        Ok(())
    }

    /// Normalises the histograms and marks the instance as sampled.
    pub(crate) fn finish(&mut self) {
        self.marginal.normalise();
        self.been_sampled = true;
    }

    pub fn is_sampled(&self) -> bool {
        self.been_sampled
    }

    pub fn observations(&self) -> &Observations {
        self.likelihood.observations()
    }

    /// Derives mean, peak and standard deviation for every parameter and stores them in
    /// the parameter metadata. With `print`, a report is written to stdout.
    pub fn summarise(&mut self, print: bool) -> SamplerResult<[ParamSummary; D]> {
        if !self.been_sampled {
            return Err(SamplerError::State(
                "cannot summarise before sampling".to_string(),
            ));
        }
        let summaries: [ParamSummary; D] =
            std::array::from_fn(|k| self.marginal.summarise_row(k, &self.params[k]));
        for (info, summary) in self.params.iter_mut().zip(summaries) {
            info.summary = Some(summary);
            info!(
                param = %info.name,
                mean = summary.mean,
                peak = summary.peak,
                std_dev = summary.std_dev,
                "summarised marginal"
            );
        }
        if print {
            println!("{}", self.report());
        }
        Ok(summaries)
    }

    fn report(&self) -> String {
        let mut out = format!(
            "Fit summary ({} points, {} bins)",
            self.observations().num_points(),
            self.num_bins
        );
        for info in &self.params {
            if let Some(s) = info.summary {
                out.push_str(&format!(
                    "\n  {:<8} range [{:.3}, {:.3}]  mean = {:.5}  peak = {:.5}  std = {:.5}",
                    info.name, info.min, info.max, s.mean, s.peak, s.std_dev
                ));
            }
        }
        out
    }

    /// The mean of every parameter, once summarised.
    pub fn fitted_params(&self) -> Option<[f64; D]> {
        let mut fitted = [0.0; D];
        for (slot, info) in fitted.iter_mut().zip(&self.params) {
            *slot = info.summary?.mean;
        }
        Some(fitted)
    }
}

/// Operations common to grid and Metropolis-Hastings samplers.
pub trait Sampler<const D: usize> {
    type Model: Model<D>;

    fn core(&self) -> &SamplerCore<D, Self::Model>;

    fn core_mut(&mut self) -> &mut SamplerCore<D, Self::Model>;

    /// Runs the sampler once, ticking `progress` if given. Fails with a state error if
    /// the instance has already sampled.
    fn sample_with(&mut self, progress: Option<&ProgressBar>) -> SamplerResult<()>;

    /// Total number of likelihood evaluations a run performs.
    fn planned_steps(&self) -> usize;

    fn sample(&mut self) -> SamplerResult<()> {
        self.sample_with(None)
    }

    /// Like [`sample`](Sampler::sample), drawing a progress bar on stderr.
    fn sample_progress(&mut self) -> SamplerResult<()> {
        let pb = ProgressBar::new(self.planned_steps() as u64);
        let style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.set_prefix("Sampling");
        let result = self.sample_with(Some(&pb));
        pb.finish_with_message("Done!");
        result
    }

    fn summarise(&mut self, print: bool) -> SamplerResult<[ParamSummary; D]> {
        self.core_mut().summarise(print)
    }

    fn num_bins(&self) -> usize {
        self.core().num_bins
    }

    fn params_info(&self) -> &[ParamInfo; D] {
        &self.core().params
    }

    fn param_likelihood(&self) -> &ParamLikelihood<D> {
        &self.core().param_likelihood
    }

    fn marginal_distribution(&self) -> &MarginalDistribution {
        &self.core().marginal
    }

    fn fitted_params(&self) -> Option<[f64; D]> {
        self.core().fitted_params()
    }

    fn is_sampled(&self) -> bool {
        self.core().is_sampled()
    }
}
