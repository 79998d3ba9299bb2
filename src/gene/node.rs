//! Default node gene: response, bias, activation and aggregation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::aggregation::AggregationFunction;
use crate::attribute::{
    Attribute,
    DiscreteInit,
    DiscreteStrategy,
    FloatAttribute,
    FloatStrategy,
    StringAttribute,
    ValueStrategy,
};
use crate::config::{ConfigError, FunctionRegistries, GenomeSettings};
use crate::gene::{pick, Attributed, Crossover, Distance, NodeKey};


/// Descriptors of the traits of a [`DefaultNodeGene`], carrying their default facets.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttributes {
    pub response: FloatAttribute,
    pub bias: FloatAttribute,
    pub activation: StringAttribute,
    pub aggregation: StringAttribute,
}


impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            response: FloatAttribute::new("response")
                .mean(1.)
                .stdev(0.)
                .bounds(-30., 30.)
                .mutation_rate(0.)
                .mutation_power(0.)
                .replace_rate(0.),
            bias: FloatAttribute::new("bias")
                .mean(0.)
                .stdev(1.)
                .bounds(-30., 30.)
                .mutation_rate(0.7)
                .mutation_power(0.5)
                .replace_rate(0.1),
            activation: StringAttribute::new("activation")
                .default_value("sigmoid")
                .mutation_rate(0.),
            aggregation: StringAttribute::new("aggregation")
                .default_value("sum")
                .mutation_rate(0.),
        }
    }
}


impl NodeAttributes {
    /// Resolves all four descriptors and checks that every function name they can produce is
    /// present in `functions`.
    pub fn resolve(&self, settings: &GenomeSettings) -> Result<NodeSchema, ConfigError> {
        let config = &settings.attributes;
        let schema = NodeSchema {
            response: self.response.resolve(config)?,
            bias: self.bias.resolve(config)?,
            activation: self.activation.resolve(config)?,
            aggregation: self.aggregation.resolve(config)?,
        };
        let functions = &settings.functions;
        check_function_names(&schema.activation, "activation", |name| functions.activation(name).is_some())?;
        check_function_names(&schema.aggregation, "aggregation", |name| functions.aggregation(name).is_some())?;
        Ok(schema)
    }
}


fn check_function_names(
    strategy: &DiscreteStrategy<String>,
    kind: &'static str,
    is_known: impl Fn(&str) -> bool,
) -> Result<(), ConfigError> {
    let initial: Vec<&String> = match strategy.init() {
        DiscreteInit::Default(name) => vec![name],
        DiscreteInit::Random(names) => names.iter().collect(),
    };
    match initial.into_iter().chain(strategy.values()).find(|name| !is_known(name)) {
        Some(name) => Err(ConfigError::UnknownFunction { kind, name: name.clone() }),
        None => Ok(()),
    }
}


/// Resolved descriptors of a [`DefaultNodeGene`].
#[derive(Clone, Debug)]
pub struct NodeSchema {
    pub response: FloatStrategy,
    pub bias: FloatStrategy,
    pub activation: DiscreteStrategy<String>,
    pub aggregation: DiscreteStrategy<String>,
}


/// Node gene computing `activation(response * aggregation(inputs) + bias)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultNodeGene {
    key: NodeKey,
    pub response: f64,
    pub bias: f64,
    pub activation: String,
    pub aggregation: String,
}


impl DefaultNodeGene {
    /// Constructs a node gene with explicit attribute values.
    pub fn new<S: Into<String>>(key: NodeKey, response: f64, bias: f64, activation: S, aggregation: S) -> Self {
        Self { key, response, bias, activation: activation.into(), aggregation: aggregation.into() }
    }

    /// Looks up the activation function of the node in `functions`.
    pub fn activation_function<'a>(&self, functions: &'a FunctionRegistries) -> Option<&'a ActivationFunction> {
        functions.activation(&self.activation)
    }

    /// Looks up the aggregation function of the node in `functions`.
    pub fn aggregation_function<'a>(&self, functions: &'a FunctionRegistries) -> Option<&'a AggregationFunction> {
        functions.aggregation(&self.aggregation)
    }
}


impl Attributed for DefaultNodeGene {
    type Key = NodeKey;
    type Schema = NodeSchema;

    const ATTRIBUTE_NAMES: &'static [&'static str] = &["response", "bias", "activation", "aggregation"];

    fn resolve_schema(settings: &GenomeSettings) -> Result<NodeSchema, ConfigError> {
        NodeAttributes::default().resolve(settings)
    }

    fn create<R: Rng + ?Sized>(key: NodeKey, schema: &NodeSchema, rng: &mut R) -> Self {
        Self {
            key,
            response: schema.response.init_value(rng),
            bias: schema.bias.init_value(rng),
            activation: schema.activation.init_value(rng),
            aggregation: schema.aggregation.init_value(rng),
        }
    }

    fn key(&self) -> NodeKey {
        self.key
    }

    fn init_attributes<R: Rng + ?Sized>(&mut self, schema: &NodeSchema, rng: &mut R) {
        *self = Self::create(self.key, schema, rng);
    }

    fn mutate<R: Rng + ?Sized>(&mut self, schema: &NodeSchema, rng: &mut R) {
        self.response = schema.response.mutate_value(self.response, rng);
        self.bias = schema.bias.mutate_value(self.bias, rng);
        self.activation = schema.activation.mutate_value(std::mem::take(&mut self.activation), rng);
        self.aggregation = schema.aggregation.mutate_value(std::mem::take(&mut self.aggregation), rng);
    }
}


impl Crossover for DefaultNodeGene {
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Self {
        debug_assert_eq!(self.key, other.key, "crossover of node genes with different keys");
        Self {
            key: self.key,
            response: *pick(&self.response, &other.response, rng),
            bias: *pick(&self.bias, &other.bias, rng),
            activation: pick(&self.activation, &other.activation, rng).clone(),
            aggregation: pick(&self.aggregation, &other.aggregation, rng).clone(),
        }
    }
}


impl Distance for DefaultNodeGene {
    fn distance(&self, other: &Self) -> f64 {
        let mut distance = (self.response - other.response).abs() + (self.bias - other.bias).abs();
        if self.activation != other.activation {
            distance += 1.;
        }
        if self.aggregation != other.aggregation {
            distance += 1.;
        }
        return distance;
    }
}


#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::attribute::ValueRates;

    fn schema(settings: &GenomeSettings) -> NodeSchema {
        DefaultNodeGene::resolve_schema(settings).unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let schema = schema(&GenomeSettings::default());
        let mut rng = StdRng::seed_from_u64(42);
        for key in 0..20 {
            let node = DefaultNodeGene::create(key, &schema, &mut rng);
            assert_eq!(node.key(), key);
            assert_eq!(node.response, 1.);
            assert!((-30. ..=30.).contains(&node.bias));
            assert_eq!(node.activation, "sigmoid");
            assert_eq!(node.aggregation, "sum");
        }
    }

    #[test]
    fn test_init_attributes_redraws_and_keeps_key() {
        let schema = schema(&GenomeSettings::default());
        let mut rng = StdRng::seed_from_u64(3);
        let mut node = DefaultNodeGene::new(9, 4., 100., "relu", "max");
        node.init_attributes(&schema, &mut rng);
        assert_eq!(node.key(), 9);
        assert_eq!(node.response, 1.);
        assert!((-30. ..=30.).contains(&node.bias));
        assert_eq!(node.activation, "sigmoid");
        assert_eq!(node.aggregation, "sum");
    }

    #[test]
    fn test_resolve_unknown_function() {
        let mut settings = GenomeSettings::default();
        settings.attributes.set("activation", "default_value", "softsign");
        let error = DefaultNodeGene::resolve_schema(&settings).unwrap_err();
        assert_eq!(error, ConfigError::UnknownFunction { kind: "activation", name: "softsign".to_owned() });

        let mut settings = GenomeSettings::default();
        settings.attributes
            .set("aggregation", "mutation_rate", 0.5)
            .set("aggregation", "value_mutation_rate", ValueRates::new().with("sum", 1.).with("median", 1.));
        let error = DefaultNodeGene::resolve_schema(&settings).unwrap_err();
        assert_eq!(error, ConfigError::UnknownFunction { kind: "aggregation", name: "median".to_owned() });
    }

    #[test]
    fn test_copy_does_not_alias() {
        let schema = schema(&GenomeSettings::default());
        let mut rng = StdRng::seed_from_u64(0);
        let original = DefaultNodeGene::new(3, 1., 0.25, "tanh", "sum");
        let mut copy = original.clone();
        assert_eq!(copy, original);
        for _ in 0..50 {
            copy.mutate(&schema, &mut rng);
        }
        copy.activation.push_str("_changed");
        assert_ne!(copy, original);
        assert_eq!(original, DefaultNodeGene::new(3, 1., 0.25, "tanh", "sum"));
    }

    #[test]
    fn test_mutate_without_rates_is_identity() {
        let mut settings = GenomeSettings::default();
        settings.attributes
            .set("bias", "mutation_rate", 0.)
            .set("bias", "replace_rate", 0.);
        let schema = schema(&settings);
        let mut rng = StdRng::seed_from_u64(7);
        let mut node = DefaultNodeGene::new(0, 1.5, -0.5, "relu", "max");
        for _ in 0..100 {
            node.mutate(&schema, &mut rng);
        }
        assert_eq!(node, DefaultNodeGene::new(0, 1.5, -0.5, "relu", "max"));
    }

    #[test]
    fn test_crossover_picks_from_parents() {
        let first = DefaultNodeGene::new(5, 1., 2., "sigmoid", "sum");
        let second = DefaultNodeGene::new(5, -1., -2., "tanh", "product");
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let child = first.crossover(&second, &mut rng);
            assert_eq!(child.key(), 5);
            assert!(child.response == first.response || child.response == second.response);
            assert!(child.bias == first.bias || child.bias == second.bias);
            assert!(child.activation == first.activation || child.activation == second.activation);
            assert!(child.aggregation == first.aggregation || child.aggregation == second.aggregation);
        }
    }

    #[test]
    fn test_crossover_is_deterministic_for_seed() {
        let first = DefaultNodeGene::new(5, 1., 2., "sigmoid", "sum");
        let second = DefaultNodeGene::new(5, -1., -2., "tanh", "product");
        let child_a = first.crossover(&second, &mut StdRng::seed_from_u64(11));
        let child_b = first.crossover(&second, &mut StdRng::seed_from_u64(11));
        assert_eq!(child_a, child_b);
    }

    #[test]
    fn test_distance() {
        let first = DefaultNodeGene::new(0, 1., 0.5, "sigmoid", "sum");
        let second = DefaultNodeGene::new(0, 0.5, -0.5, "tanh", "sum");
        assert_eq!(first.distance(&first), 0.);
        assert_eq!(first.distance(&second), 0.5 + 1. + 1.);
        assert_eq!(second.distance(&first), first.distance(&second));
        let third = DefaultNodeGene::new(0, 1., 0.5, "sigmoid", "mean");
        assert_eq!(first.distance(&third), 1.);
    }
}
