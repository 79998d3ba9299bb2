//! Definition of the [`Genome`] struct.
//!
//! A genome owns the node and connection genes of one candidate network. Its evolutionary
//! operators live in the [`evolution`](crate::evolution) modules.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::config::GenomeConfig;
use crate::gene::{ConnectionGene, ConnectionKey, DefaultConnectionGene, DefaultNodeGene, NodeGene, NodeKey};
use crate::graph::required_for_output;


/// Violations of the preconditions of genome operators.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GenomeError {
    #[error("genome {genome} has no numeric fitness")]
    MissingFitness { genome: usize },
}


/// Graph of node and connection genes.
///
/// Gene collections are ordered by key, so iteration and seeded random choices are reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct Genome<N = DefaultNodeGene, C = DefaultConnectionGene> {
    key: usize,
    pub(crate) nodes: BTreeMap<NodeKey, N>,
    pub(crate) connections: BTreeMap<ConnectionKey, C>,
    fitness: Option<f64>,
    /// Key of the next node created by a structural mutation.
    pub(crate) next_node_key: NodeKey,
}


impl<N: NodeGene, C: ConnectionGene> Genome<N, C> {
    /// Constructs an empty genome without fitness.
    pub fn new(key: usize) -> Self {
        Self {
            key,
            nodes: BTreeMap::new(),
            connections: BTreeMap::new(),
            fitness: None,
            next_node_key: 0,
        }
    }

    pub fn key(&self) -> usize {
        self.key
    }

    pub fn nodes(&self) -> &BTreeMap<NodeKey, N> {
        &self.nodes
    }

    pub fn connections(&self) -> &BTreeMap<ConnectionKey, C> {
        &self.connections
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Assigns the fitness computed by an external evaluator.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    /// Returns the fitness, failing if it is absent or NaN.
    pub fn checked_fitness(&self) -> Result<f64, GenomeError> {
        match self.fitness {
            Some(fitness) if !fitness.is_nan() => Ok(fitness),
            _ => Err(GenomeError::MissingFitness { genome: self.key }),
        }
    }

    /// Key that the next added node will receive.
    pub fn next_node_key(&self) -> NodeKey {
        self.next_node_key
    }

    /// Inserts a node gene, replacing and returning one with the same key.
    ///
    /// Keeps the node key counter above every key in the genome.
    pub fn insert_node(&mut self, node: N) -> Option<N> {
        let key = node.key();
        self.next_node_key = self.next_node_key.max(key + 1);
        self.nodes.insert(key, node)
    }

    /// Inserts a connection gene, replacing and returning one with the same key.
    pub fn insert_connection(&mut self, connection: C) -> Option<C> {
        self.connections.insert(connection.key(), connection)
    }

    /// Returns the number of nodes and the number of enabled connections.
    pub fn size(&self) -> (usize, usize) {
        let num_enabled = self.connections.values().filter(|connection| connection.enabled()).count();
        (self.nodes.len(), num_enabled)
    }

    /// Keys of enabled connections.
    pub fn enabled_connection_keys(&self) -> impl Iterator<Item = ConnectionKey> + '_ {
        self.connections.values().filter(|connection| connection.enabled()).map(|connection| connection.key())
    }

    /// Nodes needed to compute the outputs, considering only enabled connections.
    pub fn required_nodes(&self, config: &GenomeConfig<N, C>) -> BTreeSet<NodeKey> {
        required_for_output(config.input_keys(), config.output_keys(), self.enabled_connection_keys())
    }

    /// Returns a copy without the nodes and connections that cannot influence the outputs.
    ///
    /// Kept are the required nodes and the enabled connections from an input or required node
    /// into a required node. Key, fitness and the node key counter carry over.
    pub fn pruned(&self, config: &GenomeConfig<N, C>) -> Self {
        let required = self.required_nodes(config);
        let nodes = self.nodes
            .iter()
            .filter(|(key, _)| required.contains(*key))
            .map(|(key, node)| (*key, node.clone()))
            .collect();
        let connections = self.connections
            .iter()
            .filter(|(_, connection)| connection.enabled())
            .filter(|((source, target), _)| {
                (required.contains(source) || config.input_keys().contains(source)) && required.contains(target)
            })
            .map(|(key, connection)| (*key, connection.clone()))
            .collect();
        Self { key: self.key, nodes, connections, fitness: self.fitness, next_node_key: self.next_node_key }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenomeSettings;

    fn genome_with(nodes: &[NodeKey], connections: &[(ConnectionKey, bool)]) -> Genome {
        let mut genome = Genome::new(0);
        for key in nodes {
            genome.insert_node(DefaultNodeGene::new(*key, 1., 0., "sigmoid", "sum"));
        }
        for (key, enabled) in connections {
            genome.insert_connection(DefaultConnectionGene::new(*key, 0.5, *enabled));
        }
        genome
    }

    #[test]
    fn test_fitness() {
        let mut genome: Genome = Genome::new(4);
        assert_eq!(genome.checked_fitness(), Err(GenomeError::MissingFitness { genome: 4 }));
        genome.set_fitness(f64::NAN);
        assert!(genome.checked_fitness().is_err());
        genome.set_fitness(1.5);
        assert_eq!(genome.checked_fitness(), Ok(1.5));
        genome.clear_fitness();
        assert_eq!(genome.fitness(), None);
    }

    #[test]
    fn test_insert_node_advances_counter() {
        let mut genome = genome_with(&[0, 7], &[]);
        assert_eq!(genome.next_node_key(), 8);
        genome.insert_node(DefaultNodeGene::new(3, 1., 0., "sigmoid", "sum"));
        assert_eq!(genome.next_node_key(), 8);
    }

    #[test]
    fn test_size() {
        let genome = genome_with(&[0, 1], &[((-1, 1), true), ((1, 0), true), ((-1, 0), false)]);
        assert_eq!(genome.size(), (2, 2));
    }

    #[test]
    fn test_required_nodes_skip_disabled() {
        let config: GenomeConfig = GenomeConfig::new(GenomeSettings::new(2, 1)).unwrap();
        let genome = genome_with(&[0, 1, 2], &[((-1, 1), true), ((1, 0), true), ((-2, 2), true), ((2, 0), false)]);
        assert_eq!(genome.required_nodes(&config), BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_pruned() {
        let config: GenomeConfig = GenomeConfig::new(GenomeSettings::new(2, 1)).unwrap();
        let mut genome = genome_with(
            &[0, 1, 2, 3],
            &[((-1, 1), true), ((1, 0), true), ((-2, 2), true), ((2, 3), true), ((-2, 0), false)],
        );
        genome.set_fitness(2.);
        let pruned = genome.pruned(&config);
        assert_eq!(pruned.nodes().keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(pruned.connections().keys().copied().collect::<Vec<_>>(), vec![(-1, 1), (1, 0)]);
        assert_eq!(pruned.fitness(), Some(2.));
        assert_eq!(pruned.next_node_key(), genome.next_node_key());
    }
}
