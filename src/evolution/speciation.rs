use std::collections::BTreeMap;

use crate::config::GenomeConfig;
use crate::gene::{ConnectionGene, Distance, NodeGene};
use crate::genome::Genome;


impl<N: NodeGene, C: ConnectionGene> Genome<N, C> {
    /// Compatibility distance between two genomes, the sum of a node term and a connection term.
    ///
    /// Each term is
    /// `(weight_coefficient * Σ distance of shared genes + disjoint_coefficient * number of unshared genes)`
    /// divided by the size of the larger gene collection, or zero if both collections are empty.
    /// The coefficients default to 1.
    pub fn distance(&self, other: &Self, config: &GenomeConfig<N, C>) -> f64 {
        let settings = config.settings();
        let weight_coefficient = settings.compatibility_weight_coefficient;
        let disjoint_coefficient = settings.compatibility_disjoint_coefficient;
        let node_distance = genes_distance(&self.nodes, &other.nodes, weight_coefficient, disjoint_coefficient);
        let connection_distance = genes_distance(
            &self.connections,
            &other.connections,
            weight_coefficient,
            disjoint_coefficient,
        );
        return node_distance + connection_distance;
    }
}


fn genes_distance<K: Ord, G: Distance>(
    genes_1: &BTreeMap<K, G>,
    genes_2: &BTreeMap<K, G>,
    weight_coefficient: f64,
    disjoint_coefficient: f64,
) -> f64 {
    let max_len = genes_1.len().max(genes_2.len());
    if max_len == 0 {
        return 0.;
    }
    let mut matched_distance = 0.;
    let mut num_disjoint = 0;
    for (key, gene_1) in genes_1 {
        match genes_2.get(key) {
            Some(gene_2) => matched_distance += gene_1.distance(gene_2),
            None => num_disjoint += 1,
        }
    }
    num_disjoint += genes_2.keys().filter(|key| !genes_1.contains_key(*key)).count();
    (weight_coefficient * matched_distance + disjoint_coefficient * num_disjoint as f64) / max_len as f64
}
