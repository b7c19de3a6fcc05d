/*!
# Grid Sampler

Splits every parameter range into `num_bins` equal bins and evaluates the likelihood at
the centroid of each of the `num_bins^D` cells, exactly once.

Each cell contributes `exp(log L)` to the matching bin of every parameter's marginal.
The weight is not stabilised, so very negative log-likelihoods underflow to zero; a
marginal row with no surviving mass normalises to NaN (and a warning is logged).

## Example

```rust
use mini_fit::core::Sampler;
use mini_fit::grid::GridSampler;
use mini_fit::models::power_law;
use mini_fit::observations::Observations;
use mini_fit::params::ParamInfo;

let obs = Observations::from_vecs(vec![1.0, 2.0], vec![2.0, 8.0], vec![1.0, 1.0]).unwrap();
let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [4.0, 4.0]).unwrap();
let mut grid = GridSampler::new(obs, power_law, params, 8).unwrap();
grid.sample().unwrap();
assert_eq!(grid.param_likelihood().len(), 64);
assert!(grid.sample().is_err());
```
*/

use std::path::Path;

use indicatif::ProgressBar;
use tracing::info;

use crate::core::{grid_cells, Sampler, SamplerCore};
use crate::error::{SamplerError, SamplerResult};
use crate::likelihood::ParamPoint;
use crate::models::Model;
use crate::observations::{Observations, Rigidity};
use crate::params::ParamInfo;

/// Exhaustive sampler over the `num_bins^D` bin centroids.
#[derive(Debug, Clone)]
pub struct GridSampler<const D: usize, M> {
    core: SamplerCore<D, M>,
    cells: usize,
}

impl<const D: usize, M: Model<D>> GridSampler<D, M> {
    /// Fails with a configuration error for an invalid bin count, including one whose
    /// cell count `num_bins^D` does not fit in a `usize`.
    pub fn new(
        observations: Observations,
        model: M,
        params: [ParamInfo; D],
        num_bins: usize,
    ) -> SamplerResult<Self> {
        let cells = grid_cells::<D>(num_bins).ok_or_else(|| {
            SamplerError::Configuration(format!(
                "grid of {num_bins}^{D} cells is too large to enumerate"
            ))
        })?;
        let core = SamplerCore::new(observations, model, params, num_bins)?;
        Ok(Self { core, cells })
    }

    /// Loads observations from `path` and builds the sampler.
    pub fn from_file(
        path: impl AsRef<Path>,
        rigidity: Rigidity,
        model: M,
        params: [ParamInfo; D],
        num_bins: usize,
    ) -> SamplerResult<Self> {
        let observations = Observations::load(path, rigidity)?;
        Self::new(observations, model, params, num_bins)
    }

    /// Number of cells one run evaluates.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Visits every bin combination, dimension 0 outermost.
    fn enumerate(
        &mut self,
        combination: &mut [usize; D],
        dim: usize,
        progress: Option<&ProgressBar>,
    ) {
        if dim == D {
            self.evaluate_cell(combination);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            return;
        }
        for i in 0..self.core.num_bins {
            combination[dim] = i;
            self.enumerate(combination, dim + 1, progress);
        }
    }

    fn evaluate_cell(&mut self, combination: &[usize; D]) {
        let num_bins = self.core.num_bins;
        let params: [f64; D] =
            std::array::from_fn(|k| self.core.params[k].bin_centroid(combination[k], num_bins));
        let log_likelihood = self.core.log_likelihood(&params);
        self.core
            .param_likelihood
            .insert(ParamPoint(params), log_likelihood);
        self.core.marginal.add_cell(combination, log_likelihood.exp());
    }
}

impl<const D: usize, M: Model<D>> Sampler<D> for GridSampler<D, M> {
    type Model = M;

    fn core(&self) -> &SamplerCore<D, M> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SamplerCore<D, M> {
        &mut self.core
    }

    fn planned_steps(&self) -> usize {
        self.cells
    }

    fn sample_with(&mut self, progress: Option<&ProgressBar>) -> SamplerResult<()> {
        self.core.ensure_unsampled("GridSampler")?;
        info!(
            cells = self.cells,
            num_points = self.core.observations().num_points(),
            "grid sampling started"
        );
        let mut combination = [0usize; D];
        self.enumerate(&mut combination, 0, progress);
        self.core.finish();
        info!(evaluated = self.core.param_likelihood.len(), "grid sampling finished");
        Ok(())
    }
}
