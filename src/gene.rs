//! Capability traits of genes and the default node and connection gene types.
//!
//! A gene is the smallest unit of a genome. Its capabilities are expressed as separate traits:
//! - [`Attributed`] for key access, descriptor resolution, initialization and mutation
//! - [`Clone`] for independent copies
//! - [`Crossover`] for recombination of two genes with the same key
//! - [`Distance`] for the genetic distance between two genes
//! - [`Differentiable`](crate::neural::Differentiable) for evaluation as a computational node
//!
//! [`Gene`] bundles the first four; [`NodeGene`] and [`ConnectionGene`] fix the key type.

use std::fmt::Debug;

use rand::Rng;

use crate::config::{ConfigError, GenomeSettings};

pub mod connection;
pub mod node;

pub use connection::{ConnectionAttributes, ConnectionSchema, DefaultConnectionGene};
pub use node::{DefaultNodeGene, NodeAttributes, NodeSchema};


/// Key of a node gene. Negative keys conventionally denote external inputs.
pub type NodeKey = i64;

/// Key of a connection gene: `(input node key, output node key)`.
pub type ConnectionKey = (NodeKey, NodeKey);


/// Genes with a key and a set of declared attributes.
pub trait Attributed: Sized {
    /// Identifier of the gene within its genome.
    type Key: Copy + Debug + Ord;

    /// Attribute descriptors of the gene kind, resolved against the settings.
    type Schema: Clone + Debug;

    /// Names of the declared gene traits, e.g. `["weight", "enabled"]`.
    const ATTRIBUTE_NAMES: &'static [&'static str];

    /// Resolves the attribute descriptors of this gene kind against `settings`.
    ///
    /// # Errors
    /// [`ConfigError`] if any attribute facet is missing, mistyped or otherwise invalid.
    fn resolve_schema(settings: &GenomeSettings) -> Result<Self::Schema, ConfigError>;

    /// Creates a new gene under `key` with all attributes initialized.
    fn create<R: Rng + ?Sized>(key: Self::Key, schema: &Self::Schema, rng: &mut R) -> Self;

    fn key(&self) -> Self::Key;

    /// Sets every declared attribute to a freshly drawn initial value.
    fn init_attributes<R: Rng + ?Sized>(&mut self, schema: &Self::Schema, rng: &mut R);

    /// Replaces every declared attribute with a possibly mutated version of itself.
    fn mutate<R: Rng + ?Sized>(&mut self, schema: &Self::Schema, rng: &mut R);
}


/// Recombination of two genes.
pub trait Crossover {
    /// Returns a new gene with the key of `self` where each attribute is taken from `self` or
    /// `other` with equal probability.
    ///
    /// Both genes must have the same key.
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self;
}


/// Genetic distance between two genes of the same kind.
pub trait Distance {
    /// Non-negative, symmetric and zero if all compared attributes are equal.
    fn distance(&self, other: &Self) -> f64;
}


/// Everything a genome needs from its genes.
pub trait Gene: Attributed + Clone + Crossover + Debug + Distance {}

impl<G: Attributed + Clone + Crossover + Debug + Distance> Gene for G {}


/// Genes usable as the nodes of a genome.
pub trait NodeGene: Gene + Attributed<Key = NodeKey> {}

impl<G: Gene + Attributed<Key = NodeKey>> NodeGene for G {}


/// Genes usable as the connections of a genome.
///
/// The structural mutations of a genome need to read and force the weight and the enabled flag.
pub trait ConnectionGene: Gene + Attributed<Key = ConnectionKey> {
    fn weight(&self) -> f64;

    fn set_weight(&mut self, weight: f64);

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);
}


/// Picks one of two attribute values with a fair coin flip.
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(first: &'a T, second: &'a T, rng: &mut R) -> &'a T {
    if rng.gen::<bool>() { first } else { second }
}
