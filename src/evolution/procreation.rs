use log::debug;
use rand::Rng;

use crate::config::GenomeConfig;
use crate::gene::{ConnectionGene, NodeGene};
use crate::genome::{Genome, GenomeError};


/// Creates a child genome by crossover of two parents followed by mutation.
///
/// # Arguments
/// * `key` - key of the child genome
/// * `parent_1` - first parent, must have a fitness
/// * `parent_2` - second parent, must have a fitness
/// * `config` - configuration driving the mutation
/// * `rng` - source of randomness
///
/// # Returns
/// The new child without fitness or a [`GenomeError`] if a parent has no fitness.
pub fn procreate<N, C, R>(
    key: usize,
    parent_1: &Genome<N, C>,
    parent_2: &Genome<N, C>,
    config: &GenomeConfig<N, C>,
    rng: &mut R,
) -> Result<Genome<N, C>, GenomeError>
where
    N: NodeGene,
    C: ConnectionGene,
    R: Rng + ?Sized,
{
    let mut child = Genome::new(key);
    child.configure_crossover(parent_1, parent_2, rng)?;
    child.mutate(config, rng);
    debug!("procreated genome {} from {} and {} with size {:?}", key, parent_1.key(), parent_2.key(), child.size());
    Ok(child)
}
