//! Shared machinery of attributes drawing from a finite set of values (booleans and strings).

use rand::Rng;
use rand::seq::SliceRandom;

use crate::attribute::{matches_any, AttributeConfig, FacetKind, FacetLookup, FacetValue, ValueRates, ValueStrategy};
use crate::config::ConfigError;


/// Facets declared by every boolean and string attribute.
pub const DISCRETE_FACETS: [&str; 5] = [
    "init_type",
    "default_value",
    "mutation_rate",
    "mutation_type",
    "value_mutation_rate",
];


/// Value types a [`DiscreteStrategy`] can be built for.
pub(crate) trait DiscreteValue: Clone + PartialEq + Sized {
    /// Facet kind of `default_value`.
    const KIND: FacetKind;

    fn from_facet(value: &FacetValue) -> Option<Self>;

    /// Parses a key of the `value_mutation_rate` mapping.
    fn from_rate_key(key: &str) -> Option<Self>;

    /// Values drawn from by random initialization.
    fn random_choices(rates: &[(Self, f64)]) -> Vec<Self>;
}


impl DiscreteValue for bool {
    const KIND: FacetKind = FacetKind::Bool;

    fn from_facet(value: &FacetValue) -> Option<Self> {
        value.as_bool()
    }

    fn from_rate_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }

    /// Always a fair coin flip.
    fn random_choices(_rates: &[(Self, f64)]) -> Vec<Self> {
        vec![false, true]
    }
}


impl DiscreteValue for String {
    const KIND: FacetKind = FacetKind::Str;

    fn from_facet(value: &FacetValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn from_rate_key(key: &str) -> Option<Self> {
        Some(key.to_owned())
    }

    fn random_choices(rates: &[(Self, f64)]) -> Vec<Self> {
        rates.iter().map(|(value, _)| value.clone()).collect()
    }
}


/// Per-instance facet defaults of a boolean or string attribute descriptor.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DiscreteFacets<T> {
    pub(crate) init_type: Option<String>,
    pub(crate) default_value: Option<T>,
    pub(crate) mutation_rate: Option<f64>,
    pub(crate) mutation_type: Option<String>,
    pub(crate) value_mutation_rate: Option<ValueRates>,
}


impl<T> Default for DiscreteFacets<T> {
    fn default() -> Self {
        Self {
            init_type: None,
            default_value: None,
            mutation_rate: None,
            mutation_type: None,
            value_mutation_rate: None,
        }
    }
}


/// Resolves the facets of a boolean or string attribute named `name`.
pub(crate) fn resolve<T: DiscreteValue>(
    name: &str,
    defaults: &DiscreteFacets<T>,
    config: &AttributeConfig,
) -> Result<DiscreteStrategy<T>, ConfigError> {
    let lookup = FacetLookup::new(name, config, &DISCRETE_FACETS)?;
    let mutation_rate = lookup.require("mutation_rate", lookup.float("mutation_rate", defaults.mutation_rate)?)?;
    let mutation = match lookup.string("mutation_type", defaults.mutation_type.as_deref())? {
        None => ValueMutation::Walk,
        Some(kind) if matches_any(&kind, &["uniform", "random"]) => ValueMutation::Uniform,
        Some(mutation_type) => {
            return Err(ConfigError::UnknownMutationType { attribute: name.to_owned(), mutation_type });
        }
    };
    let rates = match lookup.rates("value_mutation_rate", defaults.value_mutation_rate.as_ref())? {
        Some(rates) => Some(parse_rates::<T>(&lookup, &rates)?),
        None if mutation_rate > 0. => {
            return Err(ConfigError::MissingFacet { attribute: name.to_owned(), facet: "value_mutation_rate".to_owned() });
        }
        None => None,
    };
    let init = match lookup.string("init_type", defaults.init_type.as_deref())? {
        None => {
            let default_value = lookup.typed("default_value", defaults.default_value.clone(), T::KIND, T::from_facet)?;
            DiscreteInit::Default(lookup.require("default_value", default_value)?)
        }
        Some(kind) if matches_any(&kind, &["random", "uniform"]) => {
            let choices = T::random_choices(rates.as_deref().unwrap_or_default());
            if choices.is_empty() {
                return Err(lookup.invalid("value_mutation_rate", "random initialization needs at least one value"));
            }
            DiscreteInit::Random(choices)
        }
        Some(init_type) => {
            return Err(ConfigError::UnknownInitType { attribute: name.to_owned(), init_type });
        }
    };
    Ok(DiscreteStrategy { init, mutation_rate, mutation, rates: rates.unwrap_or_default() })
}


fn parse_rates<T: DiscreteValue>(lookup: &FacetLookup, rates: &ValueRates) -> Result<Vec<(T, f64)>, ConfigError> {
    rates.iter()
         .map(|(key, rate)| match T::from_rate_key(key) {
             Some(value) => Ok((value, rate)),
             None => Err(lookup.invalid("value_mutation_rate", format!("`{key}` is not a valid {}", T::KIND))),
         })
         .collect()
}


/// How a boolean or string attribute obtains its initial value.
#[derive(Clone, Debug, PartialEq)]
pub enum DiscreteInit<T> {
    /// Always the configured `default_value`.
    Default(T),
    /// Uniform choice among a non-empty set of values.
    Random(Vec<T>),
}


/// How a boolean or string attribute changes once its mutation trial fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueMutation {
    /// Walk the value→rate mapping in declared order, skipping the current value, and switch to
    /// the first value whose own trial succeeds.
    Walk,
    /// Pick any value of the mapping uniformly, possibly the current one.
    Uniform,
}


/// Resolved boolean or string attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscreteStrategy<T> {
    init: DiscreteInit<T>,
    mutation_rate: f64,
    mutation: ValueMutation,
    rates: Vec<(T, f64)>,
}


impl<T> DiscreteStrategy<T> {
    pub fn init(&self) -> &DiscreteInit<T> {
        &self.init
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn mutation(&self) -> ValueMutation {
        self.mutation
    }

    /// Values of the value→rate mapping in declared order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.rates.iter().map(|(value, _)| value)
    }
}


impl<T: Clone + PartialEq> ValueStrategy for DiscreteStrategy<T> {
    type Value = T;

    fn init_value<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        match &self.init {
            DiscreteInit::Default(value) => value.clone(),
            DiscreteInit::Random(choices) => choices[rng.gen_range(0..choices.len())].clone(),
        }
    }

    fn mutate_value<R: Rng + ?Sized>(&self, value: T, rng: &mut R) -> T {
        if rng.gen::<f64>() >= self.mutation_rate {
            return value;
        }
        match self.mutation {
            ValueMutation::Walk => {
                for (candidate, rate) in self.rates.iter().filter(|(candidate, _)| *candidate != value) {
                    if rng.gen::<f64>() < *rate {
                        return candidate.clone();
                    }
                }
                value
            }
            ValueMutation::Uniform => match self.rates.choose(rng) {
                Some((candidate, _)) => candidate.clone(),
                None => value,
            },
        }
    }
}
