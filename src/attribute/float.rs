//! Floating point attributes, e.g. `weight`, `bias` and `response`.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::attribute::{matches_any, Attribute, AttributeConfig, FacetLookup, ValueStrategy};
use crate::config::ConfigError;
use crate::utils::math::clamp;


/// Facets declared by every float attribute.
pub const FLOAT_FACETS: [&str; 9] = [
    "init_type",
    "default_value",
    "min_value",
    "max_value",
    "mean",
    "stdev",
    "replace_rate",
    "mutation_rate",
    "mutation_power",
];


#[derive(Clone, Debug, Default, PartialEq)]
struct FloatFacets {
    init_type: Option<String>,
    default_value: Option<f64>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    mean: Option<f64>,
    stdev: Option<f64>,
    replace_rate: Option<f64>,
    mutation_rate: Option<f64>,
    mutation_power: Option<f64>,
}


/// Descriptor of a floating point gene trait.
///
/// Without any overrides the only default is `init_type = "gaussian"`. Builder methods override
/// the defaults of this instance only.
///
/// # Example
/// ```rust
/// use neatevo::attribute::{Attribute, AttributeConfig, FloatAttribute};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let weight = FloatAttribute::new("weight")
///     .mean(0.)
///     .stdev(1.)
///     .bounds(-2., 2.)
///     .mutation_rate(0.)
///     .replace_rate(0.);
/// let config = AttributeConfig::new().with("weight", "stdev", 5.);
/// let mut rng = StdRng::seed_from_u64(0);
/// let value = weight.init_value(&config, &mut rng).unwrap();
/// assert!((-2. ..=2.).contains(&value));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FloatAttribute {
    name: String,
    defaults: FloatFacets,
}


impl FloatAttribute {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            defaults: FloatFacets { init_type: Some("gaussian".to_owned()), ..FloatFacets::default() },
        }
    }

    pub fn init_type<S: Into<String>>(mut self, init_type: S) -> Self {
        self.defaults.init_type = Some(init_type.into());
        self
    }

    /// Removes the default `init_type`, so values start at `default_value` unless configured.
    pub fn no_init_type(mut self) -> Self {
        self.defaults.init_type = None;
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.defaults.default_value = Some(value);
        self
    }

    pub fn bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.defaults.min_value = Some(min_value);
        self.defaults.max_value = Some(max_value);
        self
    }

    pub fn mean(mut self, mean: f64) -> Self {
        self.defaults.mean = Some(mean);
        self
    }

    pub fn stdev(mut self, stdev: f64) -> Self {
        self.defaults.stdev = Some(stdev);
        self
    }

    pub fn replace_rate(mut self, rate: f64) -> Self {
        self.defaults.replace_rate = Some(rate);
        self
    }

    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.defaults.mutation_rate = Some(rate);
        self
    }

    pub fn mutation_power(mut self, power: f64) -> Self {
        self.defaults.mutation_power = Some(power);
        self
    }

    fn resolve_bounds(&self, lookup: &FacetLookup) -> Result<(f64, f64), ConfigError> {
        let min_value = lookup.require("min_value", lookup.float("min_value", self.defaults.min_value)?)?;
        let max_value = lookup.require("max_value", lookup.float("max_value", self.defaults.max_value)?)?;
        if !min_value.is_finite() {
            return Err(lookup.invalid("min_value", format!("{min_value} is not finite")));
        }
        if !max_value.is_finite() {
            return Err(lookup.invalid("max_value", format!("{max_value} is not finite")));
        }
        if min_value > max_value {
            return Err(lookup.invalid("max_value", format!("{max_value} is below min_value {min_value}")));
        }
        if !(max_value - min_value).is_finite() {
            return Err(lookup.invalid("max_value", format!("range {min_value}..={max_value} is too wide")));
        }
        Ok((min_value, max_value))
    }

    fn normal(lookup: &FacetLookup, facet: &str, mean: f64, stdev: f64) -> Result<Normal<f64>, ConfigError> {
        Normal::new(mean, stdev).map_err(|error| lookup.invalid(facet, error.to_string()))
    }
}


impl Attribute for FloatAttribute {
    type Strategy = FloatStrategy;

    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, config: &AttributeConfig) -> Result<FloatStrategy, ConfigError> {
        let lookup = FacetLookup::new(&self.name, config, &FLOAT_FACETS)?;
        let defaults = &self.defaults;
        let init = match lookup.string("init_type", defaults.init_type.as_deref())? {
            None => FloatInit::Default(
                lookup.require("default_value", lookup.float("default_value", defaults.default_value)?)?
            ),
            Some(init_type) if matches_any(&init_type, &["normal", "gauss"]) => {
                let mean = lookup.require("mean", lookup.float("mean", defaults.mean)?)?;
                let stdev = lookup.require("stdev", lookup.float("stdev", defaults.stdev)?)?;
                let (min_value, max_value) = self.resolve_bounds(&lookup)?;
                let distribution = Self::normal(&lookup, "stdev", mean, stdev)?;
                FloatInit::Gaussian { distribution, min_value, max_value }
            }
            Some(init_type) if matches_any(&init_type, &["uniform", "random"]) => {
                let (min_value, max_value) = self.resolve_bounds(&lookup)?;
                FloatInit::Uniform { min_value, max_value }
            }
            Some(init_type) => {
                return Err(ConfigError::UnknownInitType { attribute: self.name.clone(), init_type });
            }
        };
        let mutation_rate = lookup.require("mutation_rate", lookup.float("mutation_rate", defaults.mutation_rate)?)?;
        let replace_rate = lookup.require("replace_rate", lookup.float("replace_rate", defaults.replace_rate)?)?;
        let perturbation = if mutation_rate > 0. {
            let power = lookup.require("mutation_power", lookup.float("mutation_power", defaults.mutation_power)?)?;
            let (min_value, max_value) = self.resolve_bounds(&lookup)?;
            let noise = Self::normal(&lookup, "mutation_power", 0., power)?;
            Some(Perturbation { noise, min_value, max_value })
        } else {
            None
        };
        Ok(FloatStrategy { init, mutation_rate, replace_rate, perturbation })
    }
}


/// How a float attribute obtains its initial value.
#[derive(Clone, Debug)]
pub enum FloatInit {
    /// Always the configured `default_value`.
    Default(f64),
    /// Gaussian sample clamped to the bounds.
    Gaussian { distribution: Normal<f64>, min_value: f64, max_value: f64 },
    /// Uniform sample within the bounds.
    Uniform { min_value: f64, max_value: f64 },
}


#[derive(Clone, Debug)]
struct Perturbation {
    noise: Normal<f64>,
    min_value: f64,
    max_value: f64,
}


/// Resolved float attribute.
#[derive(Clone, Debug)]
pub struct FloatStrategy {
    init: FloatInit,
    mutation_rate: f64,
    replace_rate: f64,
    perturbation: Option<Perturbation>,
}


impl FloatStrategy {
    pub fn init(&self) -> &FloatInit {
        &self.init
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn replace_rate(&self) -> f64 {
        self.replace_rate
    }
}


impl ValueStrategy for FloatStrategy {
    type Value = f64;

    fn init_value<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.init {
            FloatInit::Default(value) => *value,
            FloatInit::Gaussian { distribution, min_value, max_value } => {
                clamp(distribution.sample(rng), *min_value, *max_value)
            }
            FloatInit::Uniform { min_value, max_value } => rng.gen_range(*min_value..=*max_value),
        }
    }

    /// Perturbation and replacement are two sequential trials: the replacement trial only happens
    /// if the perturbation trial did not fire.
    fn mutate_value<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> f64 {
        if rng.gen::<f64>() < self.mutation_rate {
            if let Some(perturbation) = &self.perturbation {
                let delta = perturbation.noise.sample(rng);
                return clamp(value + delta, perturbation.min_value, perturbation.max_value);
            }
        }
        if rng.gen::<f64>() < self.replace_rate {
            return self.init_value(rng);
        }
        value
    }
}
