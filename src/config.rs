//! Configuration consumed by genes and genomes.
//!
//! [`GenomeSettings`] is the plain, serializable record a caller fills in (or loads with any serde
//! format). [`GenomeConfig`] is the read-only object every genome operation takes: it is built once
//! from the settings and holds the attribute descriptors of the chosen gene types resolved into
//! typed strategies, so the operations themselves cannot fail on configuration problems.

use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activation::ActivationFunction;
use crate::aggregation::AggregationFunction;
use crate::attribute::{AttributeConfig, FacetKind};
use crate::gene::{Attributed, DefaultConnectionGene, DefaultNodeGene, NodeKey};
use crate::utils::registry::Registry;


/// Configuration problems, reported when a [`GenomeConfig`] or an attribute strategy is resolved.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("attribute `{attribute}`: facet `{facet}` does not exist in config")]
    MissingFacet { attribute: String, facet: String },

    #[error("attribute `{attribute}`: facet `{facet}` has invalid type: expected {expected}, got {actual}")]
    FacetType { attribute: String, facet: String, expected: FacetKind, actual: FacetKind },

    #[error("attribute `{attribute}`: facet `{facet}` is not declared for this kind of attribute")]
    UnknownFacet { attribute: String, facet: String },

    #[error("attribute `{attribute}`: init_type `{init_type}` not recognized")]
    UnknownInitType { attribute: String, init_type: String },

    #[error("attribute `{attribute}`: mutation_type `{mutation_type}` not recognized")]
    UnknownMutationType { attribute: String, mutation_type: String },

    #[error("attribute `{attribute}`: facet `{facet}` is invalid: {reason}")]
    InvalidFacet { attribute: String, facet: String, reason: String },

    #[error("no {kind} function registered under `{name}`")]
    UnknownFunction { kind: &'static str, name: String },

    #[error("node key {key} is declared more than once among input and output keys")]
    OverlappingKeys { key: NodeKey },

    #[error("{role} key {key} is out of range: input keys are negative, output keys are non-negative")]
    KeyOutOfRange { role: &'static str, key: NodeKey },
}


/// Activation and aggregation functions available to node genes, keyed by name.
///
/// Serialized as two lists of function names; deserialization looks the names up in the
/// process-wide registries of [`ActivationFunction`] and [`AggregationFunction`], so custom
/// functions must be registered before settings naming them are loaded. An omitted list stands for
/// all built-in functions of that kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionRegistries {
    #[serde(with = "function_list")]
    activations: HashMap<String, ActivationFunction>,
    #[serde(with = "function_list")]
    aggregations: HashMap<String, AggregationFunction>,
}


impl FunctionRegistries {
    /// Registries without any function.
    pub fn empty() -> Self {
        Self { activations: HashMap::new(), aggregations: HashMap::new() }
    }

    /// Adds `function` under its own name, returning a replaced function of the same name.
    pub fn add_activation(&mut self, function: ActivationFunction) -> Option<ActivationFunction> {
        self.activations.add(function.name().to_owned(), function)
    }

    /// Adds `function` under its own name, returning a replaced function of the same name.
    pub fn add_aggregation(&mut self, function: AggregationFunction) -> Option<AggregationFunction> {
        self.aggregations.add(function.name().to_owned(), function)
    }

    pub fn activation(&self, name: &str) -> Option<&ActivationFunction> {
        self.activations.get_ref(&name.to_owned())
    }

    pub fn aggregation(&self, name: &str) -> Option<&AggregationFunction> {
        self.aggregations.get_ref(&name.to_owned())
    }

    /// Names of all activation functions, sorted.
    pub fn activation_names(&self) -> Vec<String> {
        let mut names = self.activations.keys_cloned();
        names.sort();
        names
    }

    /// Names of all aggregation functions, sorted.
    pub fn aggregation_names(&self) -> Vec<String> {
        let mut names = self.aggregations.keys_cloned();
        names.sort();
        names
    }
}


/// All built-in activation and aggregation functions.
impl Default for FunctionRegistries {
    fn default() -> Self {
        let mut registries = Self::empty();
        for function in ActivationFunction::builtins() {
            registries.add_activation(function);
        }
        for function in AggregationFunction::builtins() {
            registries.add_aggregation(function);
        }
        registries
    }
}


mod function_list {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::utils::registered::Registered;

    pub(super) fn serialize<F, S: Serializer>(
        functions: &HashMap<String, F>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut names: Vec<&String> = functions.keys().collect();
        names.sort();
        names.serialize(serializer)
    }

    pub(super) fn deserialize<'de, F, D>(deserializer: D) -> Result<HashMap<String, F>, D::Error>
    where
        F: Registered<String> + Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let functions = Vec::<F>::deserialize(deserializer)?;
        Ok(functions.into_iter().map(|function| (function.key().clone(), function)).collect())
    }
}


/// Plain configuration record of the genome engine.
///
/// Every field has a default, so partial records deserialize fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenomeSettings {
    /// Keys of the external inputs, conventionally negative.
    pub input_keys: Vec<NodeKey>,
    /// Keys of the output nodes every genome must contain.
    pub output_keys: Vec<NodeKey>,
    /// Probability of the add-node mutation.
    pub node_add_prob: f64,
    /// Probability of the delete-node mutation.
    pub node_delete_prob: f64,
    /// Probability of the add-connection mutation.
    pub conn_add_prob: f64,
    /// Probability of the delete-connection mutation.
    pub conn_delete_prob: f64,
    /// Multiplier of the summed distances of genes present in both genomes.
    pub compatibility_weight_coefficient: f64,
    /// Multiplier of the number of genes present in only one genome.
    pub compatibility_disjoint_coefficient: f64,
    /// Reject added connections that would close a cycle.
    pub feed_forward: bool,
    /// Facets of the gene traits, keyed by trait name.
    pub attributes: AttributeConfig,
    /// Functions node genes may refer to by name.
    pub functions: FunctionRegistries,
}


impl Default for GenomeSettings {
    fn default() -> Self {
        Self {
            input_keys: Vec::new(),
            output_keys: Vec::new(),
            node_add_prob: 0.,
            node_delete_prob: 0.,
            conn_add_prob: 0.,
            conn_delete_prob: 0.,
            compatibility_weight_coefficient: 1.,
            compatibility_disjoint_coefficient: 1.,
            feed_forward: true,
            attributes: AttributeConfig::default(),
            functions: FunctionRegistries::default(),
        }
    }
}


impl GenomeSettings {
    /// Settings with inputs `-1, -2, ..., -num_inputs` and outputs `0, 1, ..., num_outputs - 1`.
    pub fn new(num_inputs: usize, num_outputs: usize) -> Self {
        Self {
            input_keys: (1..=num_inputs as NodeKey).map(|key| -key).collect(),
            output_keys: (0..num_outputs as NodeKey).collect(),
            ..Self::default()
        }
    }
}


/// Resolved, read-only configuration of genomes built from genes of type `N` and `C`.
///
/// The type parameters select the concrete node and connection gene types.
#[derive(Clone, Debug)]
pub struct GenomeConfig<N: Attributed = DefaultNodeGene, C: Attributed = DefaultConnectionGene> {
    settings: GenomeSettings,
    node_schema: N::Schema,
    connection_schema: C::Schema,
}


impl<N: Attributed, C: Attributed> GenomeConfig<N, C> {
    /// Validates the topology and resolves the attribute descriptors of both gene types.
    ///
    /// # Errors
    /// Any [`ConfigError`], most notably a missing or mistyped facet.
    pub fn new(settings: GenomeSettings) -> Result<Self, ConfigError> {
        let mut seen = BTreeSet::new();
        for key in settings.input_keys.iter().chain(&settings.output_keys) {
            if !seen.insert(*key) {
                return Err(ConfigError::OverlappingKeys { key: *key });
            }
        }
        if let Some(key) = settings.input_keys.iter().find(|key| **key >= 0) {
            return Err(ConfigError::KeyOutOfRange { role: "input", key: *key });
        }
        if let Some(key) = settings.output_keys.iter().find(|key| **key < 0) {
            return Err(ConfigError::KeyOutOfRange { role: "output", key: *key });
        }
        for attribute in settings.attributes.attributes() {
            if !N::ATTRIBUTE_NAMES.contains(&attribute) && !C::ATTRIBUTE_NAMES.contains(&attribute) {
                warn!("settings configure `{attribute}` which is not an attribute of any gene type");
            }
        }
        let node_schema = N::resolve_schema(&settings)?;
        let connection_schema = C::resolve_schema(&settings)?;
        debug!(
            "resolved genome config with {} inputs, {} outputs and attributes {:?} / {:?}",
            settings.input_keys.len(),
            settings.output_keys.len(),
            N::ATTRIBUTE_NAMES,
            C::ATTRIBUTE_NAMES,
        );
        Ok(Self { settings, node_schema, connection_schema })
    }

    pub fn settings(&self) -> &GenomeSettings {
        &self.settings
    }

    pub fn input_keys(&self) -> &[NodeKey] {
        &self.settings.input_keys
    }

    pub fn output_keys(&self) -> &[NodeKey] {
        &self.settings.output_keys
    }

    pub fn functions(&self) -> &FunctionRegistries {
        &self.settings.functions
    }

    pub fn node_schema(&self) -> &N::Schema {
        &self.node_schema
    }

    pub fn connection_schema(&self) -> &C::Schema {
        &self.connection_schema
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::FacetValue;
    use crate::utils::registered::Registered;

    #[test]
    fn test_settings_new() {
        let settings = GenomeSettings::new(3, 2);
        assert_eq!(settings.input_keys, vec![-1, -2, -3]);
        assert_eq!(settings.output_keys, vec![0, 1]);
        assert!(settings.feed_forward);
        assert_eq!(settings.compatibility_weight_coefficient, 1.);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: GenomeSettings = serde_json::from_str(r#"{
            "input_keys": [-1, -2],
            "output_keys": [0],
            "conn_add_prob": 0.5,
            "attributes": {"weight": {"mean": 0.5}},
            "functions": {"activations": ["tanh", "sigmoid"], "aggregations": ["sum"]}
        }"#).unwrap();
        assert_eq!(settings.input_keys, vec![-1, -2]);
        assert_eq!(settings.conn_add_prob, 0.5);
        assert_eq!(settings.node_add_prob, 0.);
        assert_eq!(settings.attributes.get("weight", "mean"), Some(&FacetValue::Float(0.5)));
        assert_eq!(settings.functions.activation_names(), vec!["sigmoid", "tanh"]);
        assert!(settings.functions.aggregation("mean").is_none());
    }

    #[test]
    fn test_settings_deserialize_unknown_function() {
        let result = serde_json::from_str::<GenomeSettings>(
            r#"{"functions": {"activations": ["softsign"], "aggregations": []}}"#
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_function_registries_serialize() {
        let mut functions = FunctionRegistries::empty();
        functions.add_activation(ActivationFunction::get("relu").unwrap());
        functions.add_aggregation(AggregationFunction::get("max").unwrap());
        let serialized = serde_json::to_string(&functions).unwrap();
        assert_eq!(serialized, r#"{"activations":["relu"],"aggregations":["max"]}"#);
    }

    #[test]
    fn test_config_new() {
        let config: GenomeConfig = GenomeConfig::new(GenomeSettings::new(2, 1)).unwrap();
        assert_eq!(config.input_keys(), &[-1, -2]);
        assert_eq!(config.output_keys(), &[0]);
        assert!(config.functions().activation("sigmoid").is_some());
    }

    #[test]
    fn test_config_duplicate_key() {
        let settings = GenomeSettings { input_keys: vec![-1, 0], output_keys: vec![0], ..GenomeSettings::default() };
        let error = GenomeConfig::<DefaultNodeGene, DefaultConnectionGene>::new(settings).unwrap_err();
        assert_eq!(error, ConfigError::OverlappingKeys { key: 0 });
    }

    #[test]
    fn test_config_key_out_of_range() {
        let settings = GenomeSettings { input_keys: vec![1, 2], output_keys: vec![0], ..GenomeSettings::default() };
        let error = GenomeConfig::<DefaultNodeGene, DefaultConnectionGene>::new(settings).unwrap_err();
        assert_eq!(error, ConfigError::KeyOutOfRange { role: "input", key: 1 });

        let settings = GenomeSettings { input_keys: vec![-1], output_keys: vec![0, -3], ..GenomeSettings::default() };
        let error = GenomeConfig::<DefaultNodeGene, DefaultConnectionGene>::new(settings).unwrap_err();
        assert_eq!(error, ConfigError::KeyOutOfRange { role: "output", key: -3 });
    }

    #[test]
    fn test_config_propagates_attribute_errors() {
        let mut settings = GenomeSettings::new(1, 1);
        settings.attributes.set("bias", "init_type", "cauchy");
        let error = GenomeConfig::<DefaultNodeGene, DefaultConnectionGene>::new(settings).unwrap_err();
        assert_eq!(error, ConfigError::UnknownInitType { attribute: "bias".to_owned(), init_type: "cauchy".to_owned() });
    }
}
