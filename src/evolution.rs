//! Evolutionary operators on genomes.
//!
//! Each submodule adds one group of methods to [`Genome`](crate::genome::Genome):
//! - [`init`] creates genes and minimal genomes
//! - [`mutation`] changes structure and attribute values
//! - [`crossover`] recombines two parents
//! - [`speciation`] measures the compatibility distance
//! - [`procreation`] combines crossover and mutation into one step

pub mod crossover;
pub mod init;
pub mod mutation;
pub mod procreation;
pub mod speciation;

pub use procreation::procreate;
