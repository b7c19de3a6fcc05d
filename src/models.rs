/*!
Model functions that predict an output from an input and a parameter vector.

Any closure `Fn(f64, &[f64; D]) -> f64` is a [`Model`]; the free functions below are
ready-made models for common fits.

# Examples

```rust
use mini_fit::models::{power_law, Model};

assert_eq!(power_law(2.0, &[3.0, 2.0]), 12.0);

let line = |x: f64, p: &[f64; 2]| p[0] * x + p[1];
assert_eq!(line.predict(1.0, &[2.0, 0.5]), 2.5);
```
*/

use std::f64::consts::PI;

/// A model `y = f(x; θ)` with `D` parameters.
pub trait Model<const D: usize> {
    fn predict(&self, x: f64, params: &[f64; D]) -> f64;
}

impl<F, const D: usize> Model<D> for F
where
    F: Fn(f64, &[f64; D]) -> f64,
{
    fn predict(&self, x: f64, params: &[f64; D]) -> f64 {
        self(x, params)
    }
}

/// `y = a·x^b`
pub fn power_law(x: f64, params: &[f64; 2]) -> f64 {
    params[0] * x.powf(params[1])
}

/// `y = x^a`
pub fn power(x: f64, params: &[f64; 1]) -> f64 {
    x.powf(params[0])
}

/// `y = a·x + b`
pub fn linear(x: f64, params: &[f64; 2]) -> f64 {
    params[0] * x + params[1]
}

/// `y = a·x² + b·x + c`
pub fn quadratic(x: f64, params: &[f64; 3]) -> f64 {
    params[0] * x * x + params[1] * x + params[2]
}

/// `y = a·x³ + b·x² + c·x + d`
pub fn cubic(x: f64, params: &[f64; 4]) -> f64 {
    params[0] * x * x * x + params[1] * x * x + params[2] * x + params[3]
}

/// Normal probability density with standard deviation `sigma` and mean `mean`.
pub fn gaussian_pdf(x: f64, sigma: f64, mean: f64) -> f64 {
    (1.0 / (sigma * (2.0 * PI).sqrt())) * (-0.5 * (x - mean) * (x - mean) / (sigma * sigma)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_polynomials() {
        assert_eq!(linear(2.0, &[3.0, 1.0]), 7.0);
        assert_eq!(quadratic(2.0, &[1.0, 1.0, 1.0]), 7.0);
        assert_eq!(cubic(2.0, &[1.0, 0.0, 0.0, -8.0]), 0.0);
        assert_abs_diff_eq!(power(4.0, &[0.5]), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_gaussian_pdf_peak() {
        assert_abs_diff_eq!(
            gaussian_pdf(1.0, 1.0, 1.0),
            1.0 / (2.0 * PI).sqrt(),
            epsilon = 1e-12
        );
        assert!(gaussian_pdf(3.0, 1.0, 1.0) < gaussian_pdf(2.0, 1.0, 1.0));
    }
}
