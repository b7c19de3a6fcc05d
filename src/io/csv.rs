/*!
# CSV Export

Writes the data a plotting tool needs: normalised marginal histograms, the likelihood
map and the best-fit curve against the observations. Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::core::Sampler;
use crate::models::Model;
use crate::observations::Observations;

/**
Saves every parameter's marginal histogram.

Columns: `param`, `bin`, `centroid`, `mass` and `density` (mass divided by bin width),
one row per parameter and bin.

# Examples

```rust
use mini_fit::core::Sampler;
use mini_fit::grid::GridSampler;
use mini_fit::io::csv::save_marginals_csv;
use mini_fit::models::linear;
use mini_fit::observations::Observations;
use mini_fit::params::ParamInfo;

let obs = Observations::from_vecs(vec![0.0, 1.0], vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
let params = ParamInfo::from_arrays(["a", "b"], [0.0, 0.0], [4.0, 4.0]).unwrap();
let mut grid = GridSampler::new(obs, linear, params, 4).unwrap();
grid.sample().unwrap();
save_marginals_csv(&grid, "/tmp/marginals.csv").expect("Expecting saving data to succeed");
```
*/
pub fn save_marginals_csv<const D: usize, S: Sampler<D>>(
    sampler: &S,
    filename: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["param", "bin", "centroid", "mass", "density"])?;

    let marginal = sampler.marginal_distribution();
    for (k, info) in sampler.params_info().iter().enumerate() {
        let (centroids, density) = marginal.density(k, info);
        for (bin, (&mass, (centroid, d))) in marginal
            .row(k)
            .iter()
            .zip(centroids.into_iter().zip(density))
            .enumerate()
        {
            wtr.write_record(&[
                info.name.clone(),
                bin.to_string(),
                centroid.to_string(),
                mass.to_string(),
                d.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Saves the likelihood map: one column per parameter (named after it) followed by
/// `log_likelihood`, rows in the map's order.
pub fn save_likelihood_csv<const D: usize, S: Sampler<D>>(
    sampler: &S,
    filename: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut header: Vec<String> = sampler
        .params_info()
        .iter()
        .map(|p| p.name.clone())
        .collect();
    header.push("log_likelihood".to_string());
    wtr.write_record(&header)?;

    for (point, log_likelihood) in sampler.param_likelihood() {
        let mut row: Vec<String> = point.0.iter().map(|v| v.to_string()).collect();
        row.push(log_likelihood.to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Saves the observations next to the model evaluated at `params`.
///
/// Columns: `x`, `y`, `sigma`, `fit`.
pub fn save_fit_csv<const D: usize, M: Model<D>>(
    observations: &Observations,
    model: &M,
    params: &[f64; D],
    filename: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["x", "y", "sigma", "fit"])?;
    for (x, y, sigma) in observations.iter() {
        wtr.write_record(&[
            x.to_string(),
            y.to_string(),
            sigma.to_string(),
            model.predict(x, params).to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
