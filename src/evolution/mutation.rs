use log::trace;
use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};

use crate::config::GenomeConfig;
use crate::gene::{ConnectionGene, ConnectionKey, NodeGene, NodeKey};
use crate::genome::Genome;
use crate::graph::creates_cycle;


impl<N: NodeGene, C: ConnectionGene> Genome<N, C> {
    /// Applies structural mutations and then mutates the attributes of every gene.
    ///
    /// The four structural mutations are rolled independently against their configured
    /// probabilities, in the order add node, delete node, add connection, delete connection.
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &GenomeConfig<N, C>, rng: &mut R) {
        let settings = config.settings();
        if rng.gen::<f64>() < settings.node_add_prob {
            self.mutate_add_node(config, rng);
        }
        if rng.gen::<f64>() < settings.node_delete_prob {
            self.mutate_del_node(config, rng);
        }
        if rng.gen::<f64>() < settings.conn_add_prob {
            self.mutate_add_connection(config, rng);
        }
        if rng.gen::<f64>() < settings.conn_delete_prob {
            self.mutate_del_connection(rng);
        }
        for node in self.nodes.values_mut() {
            node.mutate(config.node_schema(), rng);
        }
        for connection in self.connections.values_mut() {
            connection.mutate(config.connection_schema(), rng);
        }
    }

    /// Splits a random connection by inserting a new node.
    ///
    /// The split connection `(i, o)` is disabled. The new node `n` is connected via `(i, n)` with
    /// weight 1 and via `(n, o)` with the weight of the split connection, both enabled.
    ///
    /// # Returns
    /// The key of the new node or `None` if the genome has no connections.
    pub fn mutate_add_node<R: Rng + ?Sized>(&mut self, config: &GenomeConfig<N, C>, rng: &mut R) -> Option<NodeKey> {
        let split_key = *self.connections.keys().choose(rng)?;
        let split = self.connections.get_mut(&split_key)?;
        split.set_enabled(false);
        let weight = split.weight();

        let new_key = self.next_node_key;
        let node = Self::create_node(config, new_key, rng);
        self.insert_node(node);

        let (input_key, output_key) = split_key;
        let mut incoming = Self::create_connection(config, input_key, new_key, rng);
        incoming.set_weight(1.);
        incoming.set_enabled(true);
        self.insert_connection(incoming);
        let mut outgoing = Self::create_connection(config, new_key, output_key, rng);
        outgoing.set_weight(weight);
        outgoing.set_enabled(true);
        self.insert_connection(outgoing);

        trace!("genome {}: split connection {:?} with node {}", self.key(), split_key, new_key);
        Some(new_key)
    }

    /// Deletes a random non-output node together with every connection touching it.
    ///
    /// # Returns
    /// The key of the deleted node or `None` if only output nodes exist.
    pub fn mutate_del_node<R: Rng + ?Sized>(&mut self, config: &GenomeConfig<N, C>, rng: &mut R) -> Option<NodeKey> {
        let output_keys = config.output_keys();
        let key = *self.nodes.keys().filter(|key| !output_keys.contains(key)).choose(rng)?;
        self.connections.retain(|(source, target), _| *source != key && *target != key);
        self.nodes.remove(&key);
        trace!("genome {}: deleted node {}", self.key(), key);
        Some(key)
    }

    /// Attempts to connect two random endpoints.
    ///
    /// Targets are drawn from the existing nodes, sources from the existing nodes and the input
    /// keys. The attempt is dropped if the connection exists already, if both endpoints are output
    /// nodes, or if the genome is configured as feed forward and the connection would close a cycle.
    ///
    /// # Returns
    /// The key of the new connection or `None` if the attempt was dropped.
    pub fn mutate_add_connection<R: Rng + ?Sized>(
        &mut self,
        config: &GenomeConfig<N, C>,
        rng: &mut R,
    ) -> Option<ConnectionKey> {
        let output_key = *self.nodes.keys().choose(rng)?;
        let sources: Vec<NodeKey> = config.input_keys().iter().chain(self.nodes.keys()).copied().collect();
        let input_key = *sources.choose(rng)?;
        let key = (input_key, output_key);
        if self.connections.contains_key(&key) {
            return None;
        }
        let output_keys = config.output_keys();
        if output_keys.contains(&input_key) && output_keys.contains(&output_key) {
            return None;
        }
        if config.settings().feed_forward && creates_cycle(self.connections.keys(), key) {
            trace!("genome {}: rejected connection {:?} closing a cycle", self.key(), key);
            return None;
        }
        let connection = Self::create_connection(config, input_key, output_key, rng);
        self.insert_connection(connection);
        trace!("genome {}: added connection {:?}", self.key(), key);
        Some(key)
    }

    /// Deletes a random connection.
    ///
    /// # Returns
    /// The key of the deleted connection or `None` if the genome has no connections.
    pub fn mutate_del_connection<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ConnectionKey> {
        let key = *self.connections.keys().choose(rng)?;
        self.connections.remove(&key);
        trace!("genome {}: deleted connection {:?}", self.key(), key);
        Some(key)
    }
}
