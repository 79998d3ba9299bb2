//! Rust library for the genetic encoding of NEAT style neural networks.
//!
//! A [`Genome`] is a graph of node and connection genes. Genomes are created, mutated, recombined
//! and compared under a [`GenomeConfig`], which is resolved once from plain [`GenomeSettings`].
//! Gene attributes are initialized and mutated by the descriptors in [`attribute`].

pub mod activation;
pub mod aggregation;
pub mod attribute;
pub mod config;
pub mod evolution;
pub mod gene;
pub mod genome;
pub mod graph;
pub mod neural;
pub mod utils;

pub use config::{ConfigError, GenomeConfig, GenomeSettings};
pub use gene::{ConnectionKey, DefaultConnectionGene, DefaultNodeGene, NodeKey};
pub use genome::{Genome, GenomeError};
pub use graph::required_for_output;
