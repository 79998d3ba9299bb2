//! Default connection gene: weight and enabled flag.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, BoolAttribute, DiscreteStrategy, FloatAttribute, FloatStrategy, ValueRates, ValueStrategy};
use crate::config::{ConfigError, GenomeSettings};
use crate::gene::{pick, Attributed, ConnectionGene, ConnectionKey, Crossover, Distance};


/// Descriptors of the traits of a [`DefaultConnectionGene`], carrying their default facets.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionAttributes {
    pub weight: FloatAttribute,
    pub enabled: BoolAttribute,
}


impl Default for ConnectionAttributes {
    fn default() -> Self {
        Self {
            weight: FloatAttribute::new("weight")
                .mean(0.)
                .stdev(1.)
                .bounds(-30., 30.)
                .mutation_rate(0.8)
                .mutation_power(0.5)
                .replace_rate(0.1),
            enabled: BoolAttribute::new("enabled")
                .default_value(true)
                .mutation_rate(0.01)
                .value_mutation_rate(ValueRates::new().with("true", 1.).with("false", 1.)),
        }
    }
}


impl ConnectionAttributes {
    pub fn resolve(&self, settings: &GenomeSettings) -> Result<ConnectionSchema, ConfigError> {
        Ok(ConnectionSchema {
            weight: self.weight.resolve(&settings.attributes)?,
            enabled: self.enabled.resolve(&settings.attributes)?,
        })
    }
}


/// Resolved descriptors of a [`DefaultConnectionGene`].
#[derive(Clone, Debug)]
pub struct ConnectionSchema {
    pub weight: FloatStrategy,
    pub enabled: DiscreteStrategy<bool>,
}


/// Weighted, optionally disabled edge between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultConnectionGene {
    key: ConnectionKey,
    pub weight: f64,
    pub enabled: bool,
}


impl DefaultConnectionGene {
    pub fn new(key: ConnectionKey, weight: f64, enabled: bool) -> Self {
        Self { key, weight, enabled }
    }
}


impl Attributed for DefaultConnectionGene {
    type Key = ConnectionKey;
    type Schema = ConnectionSchema;

    const ATTRIBUTE_NAMES: &'static [&'static str] = &["weight", "enabled"];

    fn resolve_schema(settings: &GenomeSettings) -> Result<ConnectionSchema, ConfigError> {
        ConnectionAttributes::default().resolve(settings)
    }

    fn create<R: Rng + ?Sized>(key: ConnectionKey, schema: &ConnectionSchema, rng: &mut R) -> Self {
        Self {
            key,
            weight: schema.weight.init_value(rng),
            enabled: schema.enabled.init_value(rng),
        }
    }

    fn key(&self) -> ConnectionKey {
        self.key
    }

    fn init_attributes<R: Rng + ?Sized>(&mut self, schema: &ConnectionSchema, rng: &mut R) {
        self.weight = schema.weight.init_value(rng);
        self.enabled = schema.enabled.init_value(rng);
    }

    fn mutate<R: Rng + ?Sized>(&mut self, schema: &ConnectionSchema, rng: &mut R) {
        self.weight = schema.weight.mutate_value(self.weight, rng);
        self.enabled = schema.enabled.mutate_value(self.enabled, rng);
    }
}


impl ConnectionGene for DefaultConnectionGene {
    fn weight(&self) -> f64 {
        self.weight
    }

    fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}


impl Crossover for DefaultConnectionGene {
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        debug_assert_eq!(self.key, other.key, "crossover of connection genes with different keys");
        Self {
            key: self.key,
            weight: *pick(&self.weight, &other.weight, rng),
            enabled: *pick(&self.enabled, &other.enabled, rng),
        }
    }
}


impl Distance for DefaultConnectionGene {
    fn distance(&self, other: &Self) -> f64 {
        let distance = (self.weight - other.weight).abs();
        if self.enabled != other.enabled {
            return distance + 1.;
        }
        distance
    }
}
