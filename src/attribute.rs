//! Typed per-trait attribute descriptors.
//!
//! Every gene trait (`weight`, `bias`, `activation`, ...) is described by an attribute descriptor
//! of one of three kinds: [`FloatAttribute`], [`BoolAttribute`] or [`StringAttribute`]. A
//! descriptor declares a fixed set of named *facets* (`init_type`, `mean`, `mutation_rate`, ...)
//! and carries its own default for each of them.
//!
//! Facets are looked up in an [`AttributeConfig`] first and fall back to the descriptor's defaults.
//! Resolving a descriptor against a configuration yields a *strategy* ([`FloatStrategy`] or
//! [`DiscreteStrategy`]) which implements [`ValueStrategy::init_value`] and
//! [`ValueStrategy::mutate_value`] without any further lookups.

pub mod boolean;
pub mod discrete;
pub mod float;
pub mod string;

pub use boolean::BoolAttribute;
pub use discrete::{DiscreteInit, DiscreteStrategy, ValueMutation};
pub use float::{FloatAttribute, FloatInit, FloatStrategy};
pub use string::StringAttribute;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rand::Rng;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ConfigError;


/// Behaviour shared by all resolved attribute strategies.
pub trait ValueStrategy {
    /// Type of the attribute value.
    type Value;

    /// Draws an initial value for a freshly created gene.
    fn init_value<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value;

    /// Returns a possibly mutated version of `value`.
    fn mutate_value<R: Rng + ?Sized>(&self, value: Self::Value, rng: &mut R) -> Self::Value;
}


/// Behaviour shared by all attribute descriptors.
pub trait Attribute {
    /// Strategy the descriptor resolves into.
    type Strategy: ValueStrategy;

    /// Name of the gene trait described, e.g. `"weight"`.
    fn name(&self) -> &str;

    /// Looks up every facet of the attribute and validates the combination.
    ///
    /// # Errors
    /// [`ConfigError`] if a required facet is missing, has the wrong type, is not declared for
    /// this kind of attribute, or holds an unrecognized init/mutation type.
    fn resolve(&self, config: &AttributeConfig) -> Result<Self::Strategy, ConfigError>;

    /// Resolves the attribute and draws an initial value in one go.
    fn init_value<R: Rng + ?Sized>(
        &self,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<<Self::Strategy as ValueStrategy>::Value, ConfigError> {
        Ok(self.resolve(config)?.init_value(rng))
    }

    /// Resolves the attribute and mutates `value` in one go.
    fn mutate_value<R: Rng + ?Sized>(
        &self,
        value: <Self::Strategy as ValueStrategy>::Value,
        config: &AttributeConfig,
        rng: &mut R,
    ) -> Result<<Self::Strategy as ValueStrategy>::Value, ConfigError> {
        Ok(self.resolve(config)?.mutate_value(value, rng))
    }
}


/// Declared type of a facet value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacetKind {
    Bool,
    Float,
    Str,
    Rates,
}


impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacetKind::Bool => "bool",
            FacetKind::Float => "float",
            FacetKind::Str => "string",
            FacetKind::Rates => "value-rate mapping",
        };
        f.write_str(name)
    }
}


/// A single facet value as supplied by a configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetValue {
    Bool(bool),
    Float(f64),
    Str(String),
    Rates(ValueRates),
}


impl FacetValue {
    pub fn kind(&self) -> FacetKind {
        match self {
            FacetValue::Bool(_) => FacetKind::Bool,
            FacetValue::Float(_) => FacetKind::Float,
            FacetValue::Str(_) => FacetKind::Str,
            FacetValue::Rates(_) => FacetKind::Rates,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FacetValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FacetValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FacetValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_rates(&self) -> Option<&ValueRates> {
        match self {
            FacetValue::Rates(value) => Some(value),
            _ => None,
        }
    }
}


impl From<bool> for FacetValue {
    fn from(value: bool) -> Self {
        FacetValue::Bool(value)
    }
}

impl From<f64> for FacetValue {
    fn from(value: f64) -> Self {
        FacetValue::Float(value)
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        FacetValue::Str(value.to_owned())
    }
}

impl From<String> for FacetValue {
    fn from(value: String) -> Self {
        FacetValue::Str(value)
    }
}

impl From<ValueRates> for FacetValue {
    fn from(value: ValueRates) -> Self {
        FacetValue::Rates(value)
    }
}


/// Ordered mapping from a possible attribute value to the probability of switching to it.
///
/// Used by boolean and string attributes (`value_mutation_rate` facet). The declaration order is
/// significant and preserved through (de-)serialization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueRates(Vec<(String, f64)>);


impl ValueRates {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `value` with its switching probability, replacing an earlier entry for it in place.
    pub fn with<S: Into<String>>(mut self, value: S, rate: f64) -> Self {
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == value) {
            Some(entry) => entry.1 = rate,
            None => self.0.push((value, rate)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(value, rate)| (value.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}


impl<S: Into<String>> FromIterator<(S, f64)> for ValueRates {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        iter.into_iter().fold(ValueRates::new(), |rates, (value, rate)| rates.with(value, rate))
    }
}


impl Serialize for ValueRates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (value, rate) in &self.0 {
            map.serialize_entry(value, rate)?;
        }
        map.end()
    }
}


impl<'de> Deserialize<'de> for ValueRates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RatesVisitor;

        impl<'de> Visitor<'de> for RatesVisitor {
            type Value = ValueRates;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map from values to probabilities")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut rates = ValueRates::new();
                while let Some((value, rate)) = access.next_entry::<String, f64>()? {
                    rates = rates.with(value, rate);
                }
                Ok(rates)
            }
        }

        deserializer.deserialize_map(RatesVisitor)
    }
}


/// Facet values of a single gene trait, keyed by facet name.
pub type FacetTable = BTreeMap<String, FacetValue>;


/// Explicit per-trait configuration record.
///
/// Maps a trait name (e.g. `"weight"`) to the facets configured for it (e.g. `"mean"`). Anything
/// not configured here falls back to the defaults of the attribute descriptor.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeConfig {
    tables: HashMap<String, FacetTable>,
}


impl AttributeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single facet of a trait, replacing any earlier value.
    pub fn set<A, F, V>(&mut self, attribute: A, facet: F, value: V) -> &mut Self
    where
        A: Into<String>,
        F: Into<String>,
        V: Into<FacetValue>,
    {
        self.tables.entry(attribute.into()).or_default().insert(facet.into(), value.into());
        self
    }

    /// Builder variant of [`AttributeConfig::set`].
    pub fn with<A, F, V>(mut self, attribute: A, facet: F, value: V) -> Self
    where
        A: Into<String>,
        F: Into<String>,
        V: Into<FacetValue>,
    {
        self.set(attribute, facet, value);
        self
    }

    pub fn get(&self, attribute: &str, facet: &str) -> Option<&FacetValue> {
        self.tables.get(attribute).and_then(|table| table.get(facet))
    }

    pub fn table(&self, attribute: &str) -> Option<&FacetTable> {
        self.tables.get(attribute)
    }

    /// Names of all traits that have at least one configured facet.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}


/// Facet resolution for one attribute: configuration value first, descriptor default second.
pub(crate) struct FacetLookup<'a> {
    attribute: &'a str,
    table: Option<&'a FacetTable>,
}


impl<'a> FacetLookup<'a> {
    /// Fails if the configuration names a facet that is not in `declared`.
    pub(crate) fn new(
        attribute: &'a str,
        config: &'a AttributeConfig,
        declared: &[&str],
    ) -> Result<Self, ConfigError> {
        let table = config.table(attribute);
        if let Some(unknown) = table.into_iter().flat_map(|t| t.keys()).find(|f| !declared.contains(&f.as_str())) {
            return Err(ConfigError::UnknownFacet { attribute: attribute.to_owned(), facet: unknown.clone() });
        }
        Ok(Self { attribute, table })
    }

    fn typed<T>(
        &self,
        facet: &str,
        default: Option<T>,
        expected: FacetKind,
        extract: impl Fn(&FacetValue) -> Option<T>,
    ) -> Result<Option<T>, ConfigError> {
        match self.table.and_then(|table| table.get(facet)) {
            None => Ok(default),
            Some(value) => extract(value).map(Some).ok_or_else(|| ConfigError::FacetType {
                attribute: self.attribute.to_owned(),
                facet: facet.to_owned(),
                expected,
                actual: value.kind(),
            }),
        }
    }

    pub(crate) fn float(&self, facet: &str, default: Option<f64>) -> Result<Option<f64>, ConfigError> {
        self.typed(facet, default, FacetKind::Float, FacetValue::as_float)
    }

    pub(crate) fn string(&self, facet: &str, default: Option<&str>) -> Result<Option<String>, ConfigError> {
        self.typed(facet, default.map(str::to_owned), FacetKind::Str, |value| value.as_str().map(str::to_owned))
    }

    pub(crate) fn rates(&self, facet: &str, default: Option<&ValueRates>) -> Result<Option<ValueRates>, ConfigError> {
        self.typed(facet, default.cloned(), FacetKind::Rates, |value| value.as_rates().cloned())
    }

    /// Turns an absent required facet into [`ConfigError::MissingFacet`].
    pub(crate) fn require<T>(&self, facet: &str, value: Option<T>) -> Result<T, ConfigError> {
        value.ok_or_else(|| ConfigError::MissingFacet {
            attribute: self.attribute.to_owned(),
            facet: facet.to_owned(),
        })
    }

    pub(crate) fn invalid<S: Into<String>>(&self, facet: &str, reason: S) -> ConfigError {
        ConfigError::InvalidFacet {
            attribute: self.attribute.to_owned(),
            facet: facet.to_owned(),
            reason: reason.into(),
        }
    }
}


/// Returns `true` if `kind` (an `init_type` or `mutation_type` value) contains any of `patterns`.
pub(crate) fn matches_any(kind: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|pattern| kind.contains(pattern))
}
