//! Definition of the `ActivationFunction` struct and the built-in scalar activation functions as
//! well as their derivatives.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::registered::Registered;


type Func = fn(f64) -> f64;


/// Convenience struct to store a scalar activation function together with its name and derivative.
///
/// Node genes refer to activation functions by name; the name is resolved against a registry of
/// `ActivationFunction` instances when a node is evaluated. Facilitates (de-)serialization.
#[derive(Clone, Debug)]
pub struct ActivationFunction {
    name: String,
    function: Func,
    derivative: Func,
}


/// Methods for convenient construction and calling.
impl ActivationFunction {
    /// Basic constructor to manually define all fields.
    pub fn new<S: Into<String>>(name: S, function: Func, derivative: Func) -> Self {
        Self { name: name.into(), function, derivative }
    }

    /// Returns the built-in activation functions:
    /// - `sigmoid`
    /// - `tanh`
    /// - `relu`
    /// - `gaussian`
    /// - `identity`
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::new("sigmoid", sigmoid, sigmoid_prime),
            Self::new("tanh", tanh, tanh_prime),
            Self::new("relu", relu, relu_prime),
            Self::new("gaussian", gaussian, gaussian_prime),
            Self::new("identity", identity, identity_prime),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Proxy for the actual activation function.
    pub fn calc(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    /// Proxy for the derivative of the activation function.
    pub fn derivative(&self, x: f64) -> f64 {
        (self.derivative)(x)
    }
}


/// Functions with the same name are considered equal.
impl PartialEq for ActivationFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}


impl Registered<String> for ActivationFunction {
    fn key(&self) -> &String {
        &self.name
    }

    fn registry_post_init(registry: &mut HashMap<String, Self>) {
        for function in Self::builtins() {
            registry.insert(function.name.clone(), function);
        }
    }
}


/// Allows `serde` to serialize `ActivationFunction` objects by name.
impl Serialize for ActivationFunction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Registered::serialize_as_key(self, serializer)
    }
}


/// Allows `serde` to deserialize `ActivationFunction` objects from the name of a registered one.
impl<'de> Deserialize<'de> for ActivationFunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Registered::deserialize_from_key(deserializer)
    }
}


/// Logistic sigmoid.
pub fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}


/// Derivative of the logistic sigmoid, `σ(x) * (1 - σ(x))`.
pub fn sigmoid_prime(x: f64) -> f64 {
    let y = sigmoid(x);
    y * (1. - y)
}


/// Hyperbolic tangent.
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}


pub fn tanh_prime(x: f64) -> f64 {
    1. - x.tanh().powi(2)
}


/// Rectified Linear Unit (RELU).
pub fn relu(x: f64) -> f64 {
    if x <= 0. { 0. } else { x }
}


/// Derivative of the RELU; zero at the kink.
pub fn relu_prime(x: f64) -> f64 {
    if x <= 0. { 0. } else { 1. }
}


/// Unnormalized gaussian bump `exp(-x²)`.
pub fn gaussian(x: f64) -> f64 {
    (-x.powi(2)).exp()
}


pub fn gaussian_prime(x: f64) -> f64 {
    -2. * x * (-x.powi(2)).exp()
}


pub fn identity(x: f64) -> f64 {
    x
}


pub fn identity_prime(_x: f64) -> f64 {
    1.
}


#[cfg(test)]
mod tests {
    use super::*;

    mod test_activation_function {
        use super::*;

        #[test]
        fn test_get_builtin() {
            let activation = ActivationFunction::get("relu").unwrap();
            assert_eq!(activation, ActivationFunction::new("relu", relu, relu_prime));
            assert_eq!(activation.calc(-1.), 0.);
            assert_eq!(activation.calc(2.), 2.);
            assert_eq!(activation.derivative(-1.), 0.);
            assert_eq!(activation.derivative(2.), 1.);
        }

        #[test]
        fn test_register_custom() {
            fn square(x: f64) -> f64 { x * x }
            fn square_prime(x: f64) -> f64 { 2. * x }
            ActivationFunction::new("square", square, square_prime).register();
            let activation = ActivationFunction::get("square").unwrap();
            assert_eq!(activation.calc(3.), 9.);
            assert_eq!(activation.derivative(3.), 6.);
        }

        #[test]
        fn test_serde() {
            let activation = ActivationFunction::get("tanh").unwrap();
            let serialized = serde_json::to_string(&activation).unwrap();
            assert_eq!(serialized, "\"tanh\"");
            let deserialized: ActivationFunction = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, activation);
            assert!(serde_json::from_str::<ActivationFunction>("\"unknown\"").is_err());
        }
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.), 0.5);
        assert_eq!(sigmoid_prime(0.), 0.25);
        assert!(sigmoid(36.) > 0.999999);
    }

    #[test]
    fn test_gaussian() {
        assert_eq!(gaussian(0.), 1.);
        assert_eq!(gaussian_prime(0.), 0.);
        assert!((gaussian_prime(1.) + 2. * (-1f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_tanh_prime() {
        assert_eq!(tanh_prime(0.), 1.);
        assert!(tanh_prime(3.) < 0.01);
    }
}
