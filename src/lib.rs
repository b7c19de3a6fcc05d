pub mod core;
pub mod error;
pub mod factory;
pub mod grid;
pub mod io;
pub mod likelihood;
pub mod metropolis_hastings;
pub mod models;
pub mod observations;
pub mod params;
pub mod stats;
