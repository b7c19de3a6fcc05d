//! Export of sampler results for plotting and further analysis.

#[cfg(feature = "csv")]
pub mod csv;
