//! Marginal histograms over each parameter and the statistics derived from them.

use ndarray::prelude::*;
use tracing::warn;

use crate::params::{ParamInfo, ParamSummary};

/// A `num_params × num_bins` table of non-negative mass, one row per parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalDistribution {
    mass: Array2<f64>,
}

impl MarginalDistribution {
    pub fn new(num_params: usize, num_bins: usize) -> Self {
        Self {
            mass: Array2::zeros((num_params, num_bins)),
        }
    }

    pub fn num_params(&self) -> usize {
        self.mass.nrows()
    }

    pub fn num_bins(&self) -> usize {
        self.mass.ncols()
    }

    /// Adds `weight` to bin `bin` of every dimension, one bin index per dimension.
    pub fn add_cell(&mut self, bins: &[usize], weight: f64) {
        for (k, &bin) in bins.iter().enumerate() {
            self.mass[[k, bin]] += weight;
        }
    }

    /// Adds one unit of mass at `params`, binning each coordinate against its parameter.
    pub fn add_position(&mut self, params: &[f64], infos: &[ParamInfo]) {
        let num_bins = self.num_bins();
        for (k, (&value, info)) in params.iter().zip(infos).enumerate() {
            self.mass[[k, info.bin_index(value, num_bins)]] += 1.0;
        }
    }

    /// Scales every row to sum to 1.
    ///
    /// A row whose total is zero (all weights underflowed) becomes NaN; this is logged.
    pub fn normalise(&mut self) {
        for (k, mut row) in self.mass.axis_iter_mut(Axis(0)).enumerate() {
            let total = row.sum();
            if total == 0.0 || !total.is_finite() {
                warn!(
                    param = k,
                    total, "marginal row has no usable mass; normalised values are not finite"
                );
            }
            row.mapv_inplace(|m| m / total);
        }
    }

    /// Row `k` of the table.
    pub fn row(&self, k: usize) -> ArrayView1<'_, f64> {
        self.mass.row(k)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.mass
    }

    /// Mean, peak and standard deviation of row `k`, which must already be normalised.
    ///
    /// Ties for the peak go to the lowest bin.
    pub fn summarise_row(&self, k: usize, info: &ParamInfo) -> ParamSummary {
        let num_bins = self.num_bins();
        let mut mean = 0.0;
        let mut mean_sq = 0.0;
        let mut peak_bin = 0;
        let mut peak_mass = f64::NEG_INFINITY;
        for (i, &m) in self.mass.row(k).iter().enumerate() {
            let centroid = info.bin_centroid(i, num_bins);
            mean += centroid * m;
            mean_sq += centroid * centroid * m;
            if m > peak_mass {
                peak_mass = m;
                peak_bin = i;
            }
        }
        ParamSummary {
            peak: info.bin_centroid(peak_bin, num_bins),
            mean,
            std_dev: (mean_sq - mean * mean).sqrt(),
        }
    }

    /// Bin midpoints and probability density (mass divided by bin width) for row `k`.
    pub fn density(&self, k: usize, info: &ParamInfo) -> (Vec<f64>, Vec<f64>) {
        let num_bins = self.num_bins();
        let bin_width = info.bin_width(num_bins);
        self.mass
            .row(k)
            .iter()
            .enumerate()
            .map(|(i, &m)| (info.bin_centroid(i, num_bins), m / bin_width))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit(name: &str) -> ParamInfo {
        ParamInfo::new(name, 0.0, 1.0).unwrap()
    }

    #[test]
    fn test_add_and_normalise() {
        let mut marginal = MarginalDistribution::new(2, 4);
        marginal.add_cell(&[0, 3], 2.0);
        marginal.add_cell(&[1, 3], 6.0);
        marginal.normalise();
        assert_abs_diff_eq!(
            marginal.as_array(),
            &array![[0.25, 0.75, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]],
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_add_position_clamps() {
        let infos = [unit("a"), unit("b")];
        let mut marginal = MarginalDistribution::new(2, 5);
        marginal.add_position(&[1.0, -0.2], &infos);
        marginal.add_position(&[0.5, 0.19], &infos);
        assert_eq!(marginal.row(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(marginal.row(1).to_vec(), vec![2.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zero_row_normalises_to_nan() {
        let mut marginal = MarginalDistribution::new(1, 3);
        marginal.normalise();
        assert!(marginal.row(0).iter().all(|m| m.is_nan()));
    }

    #[test]
    fn test_summary_statistics() {
        let info = unit("a");
        let mut marginal = MarginalDistribution::new(1, 2);
        marginal.add_cell(&[0], 1.0);
        marginal.add_cell(&[1], 3.0);
        marginal.normalise();
        let summary = marginal.summarise_row(0, &info);
        // centroids 0.25 and 0.75 with mass 0.25 and 0.75
        assert_abs_diff_eq!(summary.mean, 0.625, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.peak, 0.75, epsilon = 1e-12);
        let var: f64 = 0.25 * 0.25 * 0.25 + 0.75 * 0.75 * 0.75 - 0.625 * 0.625;
        assert_abs_diff_eq!(summary.std_dev, var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_peak_tie_takes_first_bin() {
        let info = unit("a");
        let mut marginal = MarginalDistribution::new(1, 4);
        marginal.add_cell(&[1], 1.0);
        marginal.add_cell(&[3], 1.0);
        marginal.normalise();
        assert_abs_diff_eq!(marginal.summarise_row(0, &info).peak, 0.375, epsilon = 1e-12);
    }

    #[test]
    fn test_density() {
        let info = ParamInfo::new("a", 0.0, 2.0).unwrap();
        let mut marginal = MarginalDistribution::new(1, 4);
        marginal.add_cell(&[2], 1.0);
        marginal.normalise();
        let (mids, density) = marginal.density(0, &info);
        assert_eq!(mids, vec![0.25, 0.75, 1.25, 1.75]);
        assert_eq!(density, vec![0.0, 0.0, 2.0, 0.0]);
    }
}
