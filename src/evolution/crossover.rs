use std::collections::BTreeMap;

use log::trace;
use rand::Rng;

use crate::gene::{ConnectionGene, Crossover, NodeGene};
use crate::genome::{Genome, GenomeError};


impl<N: NodeGene, C: ConnectionGene> Genome<N, C> {
    /// Replaces the genes of `self` with a recombination of two parents.
    ///
    /// The fitter parent contributes the key set: genes only it has are copied, genes both parents
    /// share are recombined attribute by attribute. Genes only the less fit parent has are dropped.
    /// On equal fitness `parent_1` counts as the fitter one. The fitness of `self` is cleared.
    ///
    /// # Arguments
    /// * `parent_1` - first parent, must have a fitness
    /// * `parent_2` - second parent, must have a fitness
    /// * `rng` - source of the attribute coin flips
    ///
    /// # Errors
    /// [`GenomeError::MissingFitness`] if either parent has no fitness or a NaN fitness.
    pub fn configure_crossover<R: Rng + ?Sized>(
        &mut self,
        parent_1: &Self,
        parent_2: &Self,
        rng: &mut R,
    ) -> Result<(), GenomeError> {
        let fitness_1 = parent_1.checked_fitness()?;
        let fitness_2 = parent_2.checked_fitness()?;
        let (fitter, other) = if fitness_1 < fitness_2 { (parent_2, parent_1) } else { (parent_1, parent_2) };
        self.nodes = crossover_genes(&fitter.nodes, &other.nodes, rng);
        self.connections = crossover_genes(&fitter.connections, &other.connections, rng);
        self.next_node_key = fitter.next_node_key.max(other.next_node_key);
        self.clear_fitness();
        trace!(
            "genome {}: crossover of {} (fitness {}) and {} (fitness {})",
            self.key(), fitter.key(), fitter.fitness().unwrap_or_default(), other.key(), other.fitness().unwrap_or_default(),
        );
        return Ok(());
    }
}


fn crossover_genes<K, G, R>(fitter: &BTreeMap<K, G>, other: &BTreeMap<K, G>, rng: &mut R) -> BTreeMap<K, G>
where
    K: Copy + Ord,
    G: Clone + Crossover,
    R: Rng + ?Sized,
{
    fitter.iter()
          .map(|(key, gene)| match other.get(key) {
              Some(other_gene) => (*key, gene.crossover(other_gene, rng)),
              None => (*key, gene.clone()),
          })
          .collect()
}
