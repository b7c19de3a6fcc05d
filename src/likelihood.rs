/*!
Gaussian log-likelihood of a parameter vector against a set of observations, and the
map of evaluated points kept by the samplers.
*/

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::Model;
use crate::observations::Observations;

/// A parameter vector used as a likelihood-map key.
///
/// Equality and ordering are exact, bit-for-bit comparisons (via [`f64::total_cmp`]).
/// This is only meaningful because the samplers produce keys from quantised grid
/// centroids or from the chain's own positions; two vectors computed along different
/// arithmetic paths will not compare equal even if they are mathematically the same.
#[derive(Debug, Clone, Copy)]
pub struct ParamPoint<const D: usize>(pub [f64; D]);

impl<const D: usize> PartialEq for ParamPoint<D> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<const D: usize> Eq for ParamPoint<D> {}

impl<const D: usize> PartialOrd for ParamPoint<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const D: usize> Ord for ParamPoint<D> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<const D: usize> From<[f64; D]> for ParamPoint<D> {
    fn from(params: [f64; D]) -> Self {
        Self(params)
    }
}

/// Evaluated parameter vectors and their log-likelihoods, in lexicographic order.
pub type ParamLikelihood<const D: usize> = BTreeMap<ParamPoint<D>, f64>;

/**
Un-normalised Gaussian log-likelihood

\[
\log L(\theta) = \sum_i -\frac{(f(x_i; \theta) - y_i)^2}{2\sigma_i^2}
\]

The normalising constant is dropped; only likelihood ratios matter to the samplers.

# Examples

```rust
use mini_fit::likelihood::GaussianLikelihood;
use mini_fit::models::linear;
use mini_fit::observations::Observations;

let obs = Observations::from_vecs(vec![0.0, 1.0], vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
let likelihood = GaussianLikelihood::new(obs, linear);
assert_eq!(likelihood.log_likelihood(&[2.0, 1.0]), 0.0);
assert_eq!(likelihood.log_likelihood(&[2.0, 2.0]), -1.0);
```
*/
#[derive(Debug, Clone)]
pub struct GaussianLikelihood<M> {
    observations: Observations,
    model: M,
}

impl<M> GaussianLikelihood<M> {
    pub fn new(observations: Observations, model: M) -> Self {
        Self {
            observations,
            model,
        }
    }

    pub fn observations(&self) -> &Observations {
        &self.observations
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Log-likelihood of `params`. A panicking model propagates unchanged.
    pub fn log_likelihood<const D: usize>(&self, params: &[f64; D]) -> f64
    where
        M: Model<D>,
    {
        self.observations
            .iter()
            .map(|(x, y, sigma)| {
                let residual = self.model.predict(x, params) - y;
                -(residual * residual) / (2.0 * sigma * sigma)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::linear;
    use approx::assert_relative_eq;

    fn fixture() -> Observations {
        Observations::from_vecs(
            vec![
                9.490792840979749290e-01,
                4.906167379139929619e-01,
                9.834871049063151904e-01,
            ],
            vec![
                9.745396420489874645e-01,
                7.453083689569964809e-01,
                9.917435524531575952e-01,
            ],
            vec![1.0, 1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_linear_likelihoods_on_grid() {
        let likelihood = GaussianLikelihood::new(fixture(), linear);
        let points = [
            [1.0 / 6.0, 1.0 / 6.0],
            [0.5, 1.0 / 6.0],
            [5.0 / 6.0, 1.0 / 6.0],
            [1.0 / 6.0, 0.5],
            [0.5, 0.5],
            [5.0 / 6.0, 0.5],
            [1.0 / 6.0, 5.0 / 6.0],
            [0.5, 5.0 / 6.0],
            [5.0 / 6.0, 5.0 / 6.0],
        ];
        let expected = [
            0.575187, 0.846482, 0.985531, 0.889452, 1.0, 0.889452, 0.985531, 0.846482, 0.575187,
        ];
        for (p, e) in points.iter().zip(expected) {
            assert_relative_eq!(likelihood.log_likelihood(p).exp(), e, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_sigma_scales_residuals() {
        let obs = Observations::from_vecs(vec![0.0], vec![0.0], vec![2.0]).unwrap();
        let likelihood = GaussianLikelihood::new(obs, |_: f64, p: &[f64; 1]| p[0]);
        assert_eq!(likelihood.log_likelihood(&[4.0]), -2.0);
    }

    #[test]
    fn test_empty_observations() {
        let likelihood = GaussianLikelihood::new(Observations::default(), linear);
        assert_eq!(likelihood.log_likelihood(&[3.0, 1.0]), 0.0);
    }

    #[test]
    fn test_param_point_ordering() {
        let mut map: ParamLikelihood<2> = ParamLikelihood::new();
        map.insert([0.75, 0.25].into(), -1.0);
        map.insert([0.25, 0.75].into(), -2.0);
        map.insert([0.25, 0.25].into(), -3.0);
        map.insert([0.25, 0.25].into(), -4.0);
        let keys: Vec<[f64; 2]> = map.keys().map(|k| k.0).collect();
        assert_eq!(keys, vec![[0.25, 0.25], [0.25, 0.75], [0.75, 0.25]]);
        assert_eq!(map[&ParamPoint([0.25, 0.25])], -4.0);
    }
}
