//! Fits `y = ax^3 + bx^2 + cx + d` to an observation file and writes the marginal
//! histograms, likelihood map and best-fit curve as CSV files.
//!
//! Usage: `demo [data file] [bins] [sample points]`, defaulting to `data/cubic.txt`,
//! 100 bins and 100 000 sample points.

use mini_fit::core::{Sampler, SamplerConfig};
use mini_fit::factory::AnySampler;
use mini_fit::io::csv::{save_fit_csv, save_likelihood_csv, save_marginals_csv};
use mini_fit::models::cubic;
use mini_fit::params::ParamInfo;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Main entry point: picks a sampler by cost, runs it, prints the summary and saves
/// the results.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "data/cubic.txt".to_string());
    let defaults = SamplerConfig::default();
    let num_bins = match args.next() {
        Some(arg) => arg.parse()?,
        None => defaults.num_bins,
    };
    let sample_points = match args.next() {
        Some(arg) => arg.parse()?,
        None => defaults.sample_points,
    };

    let config = defaults
        .set_num_bins(num_bins)
        .set_sample_points(sample_points);
    let params = ParamInfo::from_arrays(["a", "b", "c", "d"], [-3.0; 4], [3.0; 4])?;
    let mut sampler = AnySampler::from_file(&path, cubic, params, &config)?;
    println!("{} sampler initiated", sampler.kind());

    sampler.sample_progress()?;
    sampler.summarise(true)?;

    let out_dir = Path::new("fit_output").join(sampler.kind());
    fs::create_dir_all(&out_dir)?;
    save_marginals_csv(&sampler, out_dir.join("marginals.csv"))?;
    save_likelihood_csv(&sampler, out_dir.join("likelihood.csv"))?;
    if let Some(fitted) = sampler.fitted_params() {
        save_fit_csv(
            sampler.core().observations(),
            &cubic,
            &fitted,
            out_dir.join("fit.csv"),
        )?;
        println!(
            "Best fit: y = {:.4}x^3 + {:.4}x^2 + {:.4}x + {:.4}",
            fitted[0], fitted[1], fitted[2], fitted[3]
        );
    }
    println!("Saved results to {}", out_dir.display());
    Ok(())
}
