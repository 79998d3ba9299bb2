//! Definition of the `AggregationFunction` struct and the built-in list aggregation functions as
//! well as their derivatives.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::registered::Registered;


type Func = fn(&[f64]) -> f64;
type FuncPrime = fn(&[f64]) -> Vec<f64>;


/// Convenience struct to store an aggregation function together with its name and derivative.
///
/// An aggregation reduces all inputs arriving at a node to a single number. Its derivative returns
/// the partial derivative with respect to each input.
#[derive(Clone, Debug)]
pub struct AggregationFunction {
    name: String,
    function: Func,
    derivative: FuncPrime,
}


/// Methods for convenient construction and calling.
impl AggregationFunction {
    /// Basic constructor to manually define all fields.
    pub fn new<S: Into<String>>(name: S, function: Func, derivative: FuncPrime) -> Self {
        Self { name: name.into(), function, derivative }
    }

    /// Returns the built-in aggregation functions:
    /// - `sum`
    /// - `mean`
    /// - `product`
    /// - `max`
    /// - `min`
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::new("sum", sum, sum_prime),
            Self::new("mean", mean, mean_prime),
            Self::new("product", product, product_prime),
            Self::new("max", max, max_prime),
            Self::new("min", min, min_prime),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Proxy for the actual aggregation function.
    pub fn calc(&self, inputs: &[f64]) -> f64 {
        (self.function)(inputs)
    }

    /// Proxy for the derivative of the aggregation function.
    ///
    /// The returned vector always has the same length as `inputs`.
    pub fn derivative(&self, inputs: &[f64]) -> Vec<f64> {
        (self.derivative)(inputs)
    }
}


/// Functions with the same name are considered equal.
impl PartialEq for AggregationFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}


impl Registered<String> for AggregationFunction {
    fn key(&self) -> &String {
        &self.name
    }

    fn registry_post_init(registry: &mut HashMap<String, Self>) {
        for function in Self::builtins() {
            registry.insert(function.name.clone(), function);
        }
    }
}


/// Allows `serde` to serialize `AggregationFunction` objects by name.
impl Serialize for AggregationFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Registered::serialize_as_key(self, serializer)
    }
}


/// Allows `serde` to deserialize `AggregationFunction` objects from the name of a registered one.
impl<'de> Deserialize<'de> for AggregationFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Registered::deserialize_from_key(deserializer)
    }
}


pub fn sum(inputs: &[f64]) -> f64 {
    inputs.iter().sum()
}


pub fn sum_prime(inputs: &[f64]) -> Vec<f64> {
    vec![1.; inputs.len()]
}


/// Arithmetic mean; zero for an empty input.
pub fn mean(inputs: &[f64]) -> f64 {
    if inputs.is_empty() {
        return 0.;
    }
    sum(inputs) / inputs.len() as f64
}


pub fn mean_prime(inputs: &[f64]) -> Vec<f64> {
    vec![1. / inputs.len() as f64; inputs.len()]
}


/// Product of all inputs; one for an empty input.
pub fn product(inputs: &[f64]) -> f64 {
    inputs.iter().product()
}


/// Each partial derivative is the product of all *other* inputs.
pub fn product_prime(inputs: &[f64]) -> Vec<f64> {
    (0..inputs.len())
        .map(|idx| {
            inputs.iter()
                  .enumerate()
                  .filter(|(other_idx, _)| *other_idx != idx)
                  .map(|(_, input)| input)
                  .product::<f64>()
        })
        .collect()
}


/// Largest input; zero for an empty input.
pub fn max(inputs: &[f64]) -> f64 {
    inputs.iter().copied().reduce(f64::max).unwrap_or(0.)
}


/// One-hot on the first largest input.
pub fn max_prime(inputs: &[f64]) -> Vec<f64> {
    one_hot(inputs, max(inputs))
}


/// Smallest input; zero for an empty input.
pub fn min(inputs: &[f64]) -> f64 {
    inputs.iter().copied().reduce(f64::min).unwrap_or(0.)
}


/// One-hot on the first smallest input.
pub fn min_prime(inputs: &[f64]) -> Vec<f64> {
    one_hot(inputs, min(inputs))
}


fn one_hot(inputs: &[f64], selected: f64) -> Vec<f64> {
    let mut gradient = vec![0.; inputs.len()];
    if let Some(idx) = inputs.iter().position(|input| *input == selected) {
        gradient[idx] = 1.;
    }
    gradient
}
