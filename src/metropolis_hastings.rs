/*!
# Metropolis–Hastings Sampler

A single random-walk chain over the unit hypercube `[0, 1]^D`, mapped onto parameter
space by `min + coord * width`.

## Overview

- **Initialisation**: one uniform draw per coordinate. The starting point is binned and
  its log-likelihood recorded.
- **Proposal**: each coordinate moves by an independent `N(0, step_size)` draw, then
  wraps once: a coordinate above 1 loses 1 and one below 0 gains 1. Excursions of more
  than one unit are not folded back further.
- **Acceptance**: a proposal that does not lower the log-likelihood is always taken.
  Otherwise one more uniform `u` is drawn and the proposal is taken iff
  `log L_new - log L_current > ln u`.
- **Recording**: accepted points go into the likelihood map; rejected proposals never do.
  After every step the chain's current position adds one count to each marginal.

## Reproducibility

Each sampler owns a [`SmallRng`] seeded with [`DEFAULT_SEED`] (see
[`set_seed`](MetropolisHastingsSampler::set_seed)). Draws happen in a fixed order: `D`
uniforms for the start, then per step `D` normals plus one uniform only when the
unconditional test fails. Identical arguments therefore give identical chains.

## Example

```rust
use mini_fit::core::Sampler;
use mini_fit::metropolis_hastings::MetropolisHastingsSampler;
use mini_fit::models::linear;
use mini_fit::observations::Observations;
use mini_fit::params::ParamInfo;

let obs = Observations::from_vecs(vec![0.0, 1.0, 2.0], vec![1.0, 3.0, 5.0], vec![0.5; 3]).unwrap();
let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [4.0, 4.0]).unwrap();
let mut mh = MetropolisHastingsSampler::new(obs, linear, params, 40, 2_000, 0.05)
    .unwrap()
    .set_seed(7);
mh.sample().unwrap();
assert_eq!(mh.accepted_states().len(), mh.accepted() + 1);
assert!(mh.sample().is_err());
```
*/

use std::path::Path;

use indicatif::ProgressBar;
use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::Normal;
use tracing::{debug, info};

use crate::core::{Sampler, SamplerCore, DEFAULT_SEED};
use crate::error::{SamplerError, SamplerResult};
use crate::likelihood::ParamPoint;
use crate::models::Model;
use crate::observations::{Observations, Rigidity};
use crate::params::ParamInfo;

/// The chain's current position.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChainState<const D: usize> {
    coords: [f64; D],
    params: [f64; D],
    log_likelihood: f64,
}

/**
Random-walk Metropolis–Hastings sampler with a fixed number of steps.

Build it with [`new`](Self::new) or [`from_file`](Self::from_file), optionally reseed
with [`set_seed`](Self::set_seed), then call [`Sampler::sample`] once.
*/
#[derive(Debug, Clone)]
pub struct MetropolisHastingsSampler<const D: usize, M> {
    core: SamplerCore<D, M>,
    sample_points: usize,
    step_size: f64,
    proposal: Normal<f64>,
    /// The chain's random seed.
    pub seed: u64,
    /// The chain's random number generator.
    pub rng: SmallRng,
    accepted_states: Vec<[f64; D]>,
}

impl<const D: usize, M: Model<D>> MetropolisHastingsSampler<D, M> {
    /**
    Creates a sampler that will run `sample_points` steps with proposal standard
    deviation `step_size` (in unit-hypercube coordinates).

    Fails with a configuration error if `sample_points` is zero, `step_size` is not a
    finite positive number, or the bin count is invalid.
    */
    pub fn new(
        observations: Observations,
        model: M,
        params: [ParamInfo; D],
        num_bins: usize,
        sample_points: usize,
        step_size: f64,
    ) -> SamplerResult<Self> {
        if sample_points == 0 {
            return Err(SamplerError::Configuration(
                "number of sample points must be positive".to_string(),
            ));
        }
        if !step_size.is_finite() || step_size <= 0.0 {
            return Err(SamplerError::Configuration(format!(
                "step size must be a finite positive number, got {step_size}"
            )));
        }
        let proposal = Normal::new(0.0, step_size)
            .map_err(|e| SamplerError::Configuration(format!("invalid step size: {e}")))?;
        let core = SamplerCore::new(observations, model, params, num_bins)?;
        Ok(Self {
            core,
            sample_points,
            step_size,
            proposal,
            seed: DEFAULT_SEED,
            rng: SmallRng::seed_from_u64(DEFAULT_SEED),
            accepted_states: Vec::new(),
        })
    }

    /// Loads observations from `path` and builds the sampler.
    pub fn from_file(
        path: impl AsRef<Path>,
        rigidity: Rigidity,
        model: M,
        params: [ParamInfo; D],
        num_bins: usize,
        sample_points: usize,
        step_size: f64,
    ) -> SamplerResult<Self> {
        let observations = Observations::load(path, rigidity)?;
        Self::new(observations, model, params, num_bins, sample_points, step_size)
    }

    /**
    Replaces the seed and restarts the random stream from it.

    ```rust
    use mini_fit::metropolis_hastings::MetropolisHastingsSampler;
    use mini_fit::models::power;
    use mini_fit::observations::Observations;
    use mini_fit::params::ParamInfo;

    let obs = Observations::from_vecs(vec![2.0], vec![4.0], vec![1.0]).unwrap();
    let params = [ParamInfo::new("a", 0.0, 3.0).unwrap()];
    let mh = MetropolisHastingsSampler::new(obs, power, params, 10, 100, 0.1)
        .unwrap()
        .set_seed(1234);
    assert_eq!(mh.seed, 1234);
    ```
    */
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn sample_points(&self) -> usize {
        self.sample_points
    }

    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// The starting point followed by every accepted point, in chain order.
    pub fn accepted_states(&self) -> &[[f64; D]] {
        &self.accepted_states
    }

    /// Number of accepted proposals.
    pub fn accepted(&self) -> usize {
        self.accepted_states.len().saturating_sub(1)
    }

    /// Fraction of proposals accepted, or `None` before sampling.
    pub fn acceptance_rate(&self) -> Option<f64> {
        self.core
            .is_sampled()
            .then(|| self.accepted() as f64 / self.sample_points as f64)
    }

    fn to_params(&self, coords: &[f64; D]) -> [f64; D] {
        std::array::from_fn(|k| self.core.params[k].unit_to_value(coords[k]))
    }

    fn record(&mut self, state: &ChainState<D>) {
        self.core
            .param_likelihood
            .insert(ParamPoint(state.params), state.log_likelihood);
        self.accepted_states.push(state.params);
    }

    fn initialise(&mut self) -> ChainState<D> {
        let coords: [f64; D] = std::array::from_fn(|_| self.rng.gen::<f64>());
        let params = self.to_params(&coords);
        let state = ChainState {
            coords,
            params,
            log_likelihood: self.core.log_likelihood(&params),
        };
        self.core.marginal.add_position(&state.params, &self.core.params);
        self.record(&state);
        debug!(start = ?state.params, log_likelihood = state.log_likelihood, "chain initialised");
        state
    }

    /// Performs one proposal and acceptance test, then bins the resulting position.
    fn step(&mut self, state: &mut ChainState<D>) {
        let mut coords = state.coords;
        for c in coords.iter_mut() {
            *c = wrap_once(*c + self.proposal.sample(&mut self.rng));
        }
        let params = self.to_params(&coords);
        let log_likelihood = self.core.log_likelihood(&params);

        let accept = log_likelihood >= state.log_likelihood || {
            let u: f64 = self.rng.gen();
            log_likelihood - state.log_likelihood > u.ln()
        };
        if accept {
            *state = ChainState {
                coords,
                params,
                log_likelihood,
            };
            self.record(state);
        }
        self.core.marginal.add_position(&state.params, &self.core.params);
    }
}

/// Folds a coordinate back into the unit interval by a single unit. A coordinate more
/// than one unit outside `[0, 1]` stays outside.
fn wrap_once(coord: f64) -> f64 {
    if coord > 1.0 {
        coord - 1.0
    } else if coord < 0.0 {
        coord + 1.0
    } else {
        coord
    }
}

impl<const D: usize, M: Model<D>> Sampler<D> for MetropolisHastingsSampler<D, M> {
    type Model = M;

    fn core(&self) -> &SamplerCore<D, M> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SamplerCore<D, M> {
        &mut self.core
    }

    fn planned_steps(&self) -> usize {
        self.sample_points
    }

    fn sample_with(&mut self, progress: Option<&ProgressBar>) -> SamplerResult<()> {
        self.core.ensure_unsampled("MetropolisHastingsSampler")?;
        info!(
            sample_points = self.sample_points,
            step_size = self.step_size,
            seed = self.seed,
            "Metropolis-Hastings sampling started"
        );
        let mut state = self.initialise();
        for _ in 0..self.sample_points {
            self.step(&mut state);
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
        self.core.finish();
        info!(
            accepted = self.accepted(),
            acceptance_rate = self.accepted() as f64 / self.sample_points as f64,
            "Metropolis-Hastings sampling finished"
        );
        Ok(())
    }
}
