use log::trace;
use rand::Rng;

use crate::config::GenomeConfig;
use crate::gene::{ConnectionGene, NodeGene, NodeKey};
use crate::genome::Genome;


impl<N: NodeGene, C: ConnectionGene> Genome<N, C> {
    /// Resets the genome to the minimal topology: one freshly initialized node per output key and
    /// no connections.
    ///
    /// Connections are left to the caller, e.g. via [`Genome::insert_connection`] with genes made
    /// by [`Genome::create_connection`].
    pub fn configure_new<R: Rng + ?Sized>(&mut self, config: &GenomeConfig<N, C>, rng: &mut R) {
        self.nodes.clear();
        self.connections.clear();
        self.next_node_key = 0;
        for key in config.output_keys() {
            let node = Self::create_node(config, *key, rng);
            self.insert_node(node);
        }
        trace!("configured genome {} with output nodes {:?}", self.key(), config.output_keys());
    }

    /// Instantiates and initializes a node gene of the configured type.
    pub fn create_node<R: Rng + ?Sized>(config: &GenomeConfig<N, C>, key: NodeKey, rng: &mut R) -> N {
        N::create(key, config.node_schema(), rng)
    }

    /// Instantiates and initializes a connection gene of the configured type.
    pub fn create_connection<R: Rng + ?Sized>(
        config: &GenomeConfig<N, C>,
        input_key: NodeKey,
        output_key: NodeKey,
        rng: &mut R,
    ) -> C {
        C::create((input_key, output_key), config.connection_schema(), rng)
    }
}


#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::GenomeSettings;
    use crate::gene::Attributed;

    #[test]
    fn test_configure_new() {
        let config: GenomeConfig = GenomeConfig::new(GenomeSettings::new(3, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome: Genome = Genome::new(1);
        genome.configure_new(&config, &mut rng);
        assert_eq!(genome.nodes().keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(genome.connections().is_empty());
        assert_eq!(genome.next_node_key(), 2);
        assert_eq!(genome.fitness(), None);
        for (key, node) in genome.nodes() {
            assert_eq!(node.key(), *key);
            assert_eq!(node.activation, "sigmoid");
        }
    }

    #[test]
    fn test_configure_new_discards_previous_genes() {
        let config: GenomeConfig = GenomeConfig::new(GenomeSettings::new(1, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut genome: Genome = Genome::new(1);
        genome.insert_node(Genome::create_node(&config, 5, &mut rng));
        genome.insert_connection(Genome::create_connection(&config, -1, 5, &mut rng));
        genome.configure_new(&config, &mut rng);
        assert_eq!(genome.size(), (1, 0));
        assert_eq!(genome.next_node_key(), 1);
    }

    #[test]
    fn test_create_connection() {
        let config: GenomeConfig = GenomeConfig::new(GenomeSettings::new(1, 1)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let connection = Genome::create_connection(&config, -1, 0, &mut rng);
        assert_eq!(connection.key(), (-1, 0));
        assert!(connection.enabled());
    }
}
