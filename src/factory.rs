/*!
Picks the cheaper sampling strategy for a problem.

A grid run costs `num_bins^D` likelihood evaluations and a Metropolis–Hastings run costs
`sample_points`. [`AnySampler::new`] builds a [`GridSampler`] when
`sample_points >= num_bins^D` and a [`MetropolisHastingsSampler`] otherwise.

# Examples

```rust
use mini_fit::core::{Sampler, SamplerConfig};
use mini_fit::factory::AnySampler;
use mini_fit::models::linear;
use mini_fit::observations::Observations;
use mini_fit::params::ParamInfo;

let obs = Observations::from_vecs(vec![0.0, 1.0], vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [4.0, 4.0]).unwrap();
let config = SamplerConfig::default().set_num_bins(10).set_sample_points(500);
let mut sampler = AnySampler::new(obs, linear, params, &config).unwrap();
assert!(sampler.is_grid());
sampler.sample().unwrap();
sampler.summarise(false).unwrap();
assert!(sampler.fitted_params().is_some());
```
*/

use std::path::Path;

use indicatif::ProgressBar;
use tracing::info;

use crate::core::{grid_cells, Sampler, SamplerConfig, SamplerCore};
use crate::error::SamplerResult;
use crate::grid::GridSampler;
use crate::metropolis_hastings::MetropolisHastingsSampler;
use crate::models::Model;
use crate::observations::Observations;
use crate::params::ParamInfo;

/// Either sampler, behind one [`Sampler`] implementation.
#[derive(Debug, Clone)]
pub enum AnySampler<const D: usize, M> {
    Grid(GridSampler<D, M>),
    MetropolisHastings(MetropolisHastingsSampler<D, M>),
}

/// `true` when a grid run is no more expensive than `sample_points` evaluations.
pub fn prefers_grid<const D: usize>(num_bins: usize, sample_points: usize) -> bool {
    grid_cells::<D>(num_bins).is_some_and(|cells| sample_points >= cells)
}

impl<const D: usize, M: Model<D>> AnySampler<D, M> {
    pub fn new(
        observations: Observations,
        model: M,
        params: [ParamInfo; D],
        config: &SamplerConfig,
    ) -> SamplerResult<Self> {
        if prefers_grid::<D>(config.num_bins, config.sample_points) {
            info!(num_bins = config.num_bins, "uniform grid sampler selected");
            GridSampler::new(observations, model, params, config.num_bins).map(AnySampler::Grid)
        } else {
            info!(
                sample_points = config.sample_points,
                "Metropolis-Hastings sampler selected"
            );
            MetropolisHastingsSampler::new(
                observations,
                model,
                params,
                config.num_bins,
                config.sample_points,
                config.step_size,
            )
            .map(|mh| AnySampler::MetropolisHastings(mh.set_seed(config.seed)))
        }
    }

    /// Loads observations with `config.rigidity` and builds the selected sampler.
    pub fn from_file(
        path: impl AsRef<Path>,
        model: M,
        params: [ParamInfo; D],
        config: &SamplerConfig,
    ) -> SamplerResult<Self> {
        let observations = Observations::load(path, config.rigidity)?;
        Self::new(observations, model, params, config)
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, AnySampler::Grid(_))
    }

    /// Short label for the selected strategy.
    pub fn kind(&self) -> &'static str {
        match self {
            AnySampler::Grid(_) => "Uniform",
            AnySampler::MetropolisHastings(_) => "MHS",
        }
    }
}

impl<const D: usize, M: Model<D>> Sampler<D> for AnySampler<D, M> {
    type Model = M;

    fn core(&self) -> &SamplerCore<D, M> {
        match self {
            AnySampler::Grid(s) => s.core(),
            AnySampler::MetropolisHastings(s) => s.core(),
        }
    }

    fn core_mut(&mut self) -> &mut SamplerCore<D, M> {
        match self {
            AnySampler::Grid(s) => s.core_mut(),
            AnySampler::MetropolisHastings(s) => s.core_mut(),
        }
    }

    fn sample_with(&mut self, progress: Option<&ProgressBar>) -> SamplerResult<()> {
        match self {
            AnySampler::Grid(s) => s.sample_with(progress),
            AnySampler::MetropolisHastings(s) => s.sample_with(progress),
        }
    }

    fn planned_steps(&self) -> usize {
        match self {
            AnySampler::Grid(s) => s.planned_steps(),
            AnySampler::MetropolisHastings(s) => s.planned_steps(),
        }
    }
}
