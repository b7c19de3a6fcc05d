/*!
Per-parameter metadata: bounds, bin geometry and the statistics derived by summarising a
sampler.

# Examples

```rust
use mini_fit::params::ParamInfo;

let info = ParamInfo::new("a", 0.0, 2.0).unwrap();
assert_eq!(info.width, 2.0);
assert_eq!(info.bin_centroid(0, 4), 0.25);
assert_eq!(info.bin_index(1.99, 4), 3);
assert!(info.summary.is_none());
```
*/

use crate::error::{SamplerError, SamplerResult};
use crate::models::gaussian_pdf;

/// Statistics of one parameter's normalised marginal histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSummary {
    /// Centroid of the bin holding the most mass.
    pub peak: f64,
    /// Mass-weighted mean of the bin centroids.
    pub mean: f64,
    /// Population standard deviation over the discretised bins.
    pub std_dev: f64,
}

/// Bounds and derived statistics of a fitted parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// `max - min`.
    pub width: f64,
    /// Filled in by [`Sampler::summarise`](crate::core::Sampler::summarise).
    pub summary: Option<ParamSummary>,
}

impl ParamInfo {
    /// Creates metadata for a parameter ranging over `[min, max]`.
    ///
    /// Fails with a configuration error when a bound is not finite or `min >= max`.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> SamplerResult<Self> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(SamplerError::Configuration(format!(
                "parameter '{name}' needs finite bounds with min < max, got [{min}, {max}]"
            )));
        }
        Ok(Self {
            name,
            min,
            max,
            width: max - min,
            summary: None,
        })
    }

    /// Builds one `ParamInfo` per parameter from parallel name and bound arrays.
    pub fn from_arrays<const D: usize>(
        names: [&str; D],
        mins: [f64; D],
        maxs: [f64; D],
    ) -> SamplerResult<[ParamInfo; D]> {
        let infos = (0..D)
            .map(|k| ParamInfo::new(names[k], mins[k], maxs[k]))
            .collect::<SamplerResult<Vec<_>>>()?;
        // Length is D by construction.
        Ok(infos
            .try_into()
            .unwrap_or_else(|_| unreachable!("collected exactly D parameters")))
    }

    pub fn bin_width(&self, num_bins: usize) -> f64 {
        self.width / num_bins as f64
    }

    /// Midpoint of bin `index` when the range is split into `num_bins` equal bins.
    pub fn bin_centroid(&self, index: usize, num_bins: usize) -> f64 {
        self.min + (index as f64 + 0.5) * self.width / num_bins as f64
    }

    /// Bin holding `value`, clamped to `[0, num_bins - 1]`.
    pub fn bin_index(&self, value: f64, num_bins: usize) -> usize {
        let raw = ((value - self.min) / self.bin_width(num_bins)).floor();
        if raw <= 0.0 || raw.is_nan() {
            0
        } else {
            (raw as usize).min(num_bins - 1)
        }
    }

    /// Maps a unit-hypercube coordinate onto this parameter's range.
    pub fn unit_to_value(&self, coord: f64) -> f64 {
        self.min + coord * self.width
    }

    /// Samples the Gaussian implied by the summary (mean, standard deviation) at
    /// `num_points + 1` evenly spaced points across `[min, max]`.
    ///
    /// Returns `None` until the parameter has been summarised.
    pub fn gaussian_overlay(&self, num_points: usize) -> Option<(Vec<f64>, Vec<f64>)> {
        let summary = self.summary?;
        let step = self.width / num_points.max(1) as f64;
        let xs: Vec<f64> = (0..=num_points.max(1))
            .map(|i| self.min + i as f64 * step)
            .collect();
        let ys = xs
            .iter()
            .map(|&x| gaussian_pdf(x, summary.std_dev, summary.mean))
            .collect();
        Some((xs, ys))
    }
}
