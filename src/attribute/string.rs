//! String attributes, e.g. the names of a node's activation and aggregation functions.

use crate::attribute::discrete::{self, DiscreteFacets};
use crate::attribute::{Attribute, AttributeConfig, DiscreteStrategy, ValueRates};
use crate::config::ConfigError;


/// Descriptor of a string gene trait.
///
/// The keys of the `value_mutation_rate` mapping are the values the attribute may take. An
/// `init_type` containing `"random"` draws uniformly from them.
#[derive(Clone, Debug, PartialEq)]
pub struct StringAttribute {
    name: String,
    defaults: DiscreteFacets<String>,
}


impl StringAttribute {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), defaults: DiscreteFacets::default() }
    }

    pub fn init_type<S: Into<String>>(mut self, init_type: S) -> Self {
        self.defaults.init_type = Some(init_type.into());
        self
    }

    pub fn default_value<S: Into<String>>(mut self, value: S) -> Self {
        self.defaults.default_value = Some(value.into());
        self
    }

    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.defaults.mutation_rate = Some(rate);
        self
    }

    pub fn mutation_type<S: Into<String>>(mut self, mutation_type: S) -> Self {
        self.defaults.mutation_type = Some(mutation_type.into());
        self
    }

    pub fn value_mutation_rate(mut self, rates: ValueRates) -> Self {
        self.defaults.value_mutation_rate = Some(rates);
        self
    }
}


impl Attribute for StringAttribute {
    type Strategy = DiscreteStrategy<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, config: &AttributeConfig) -> Result<DiscreteStrategy<String>, ConfigError> {
        discrete::resolve(&self.name, &self.defaults, config)
    }
}
