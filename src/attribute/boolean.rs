//! Boolean attributes, e.g. the `enabled` flag of a connection.

use crate::attribute::discrete::{self, DiscreteFacets};
use crate::attribute::{Attribute, AttributeConfig, DiscreteStrategy, ValueRates};
use crate::config::ConfigError;


/// Descriptor of a boolean gene trait.
///
/// Without overrides no facet has a default. An `init_type` containing `"random"` initializes with
/// a fair coin flip. Keys of the `value_mutation_rate` mapping must be `"true"` or `"false"`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoolAttribute {
    name: String,
    defaults: DiscreteFacets<bool>,
}


impl BoolAttribute {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into(), defaults: DiscreteFacets::default() }
    }

    pub fn init_type<S: Into<String>>(mut self, init_type: S) -> Self {
        self.defaults.init_type = Some(init_type.into());
        self
    }

    pub fn default_value(mut self, value: bool) -> Self {
        self.defaults.default_value = Some(value);
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


impl Attribute for BoolAttribute {
    type Strategy = DiscreteStrategy<bool>;

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, config: &AttributeConfig) -> Result<DiscreteStrategy<bool>, ConfigError> {
        discrete::resolve(&self.name, &self.defaults, config)
    }
}
