//! Definition of the [`Registered`] trait.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{PoisonError, RwLock};

use generic_singleton::get_or_init;
use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserializer, Serialize, Serializer};

use crate::utils::registry::{Registry, RegistryKey, RegistryValue};


/// Add instances to a static registry under an arbitrary key and retrieve them later.
///
/// The registry is a generic singleton. It is static from the moment of initialization and generic
/// over the key type. This means that different key types will use different registries. Likewise,
/// each type implementing [`Registered`] will have its own registry.
///
/// # Implementation detail
/// Under the hood the registry uses the **[`generic_singleton`]** crate to initialize and access
/// a [`HashMap`] with `K` type keys and `Self` type values.
///
/// [`generic_singleton`]: https://docs.rs/generic_singleton/latest/generic_singleton/
pub trait Registered<K>: Clone + RegistryValue
where
    K: DeserializeOwned + RegistryKey + Serialize,
{
    /// Key under which the instance is registered.
    fn key(&self) -> &K;

    /// Called by the default implementation of [`Registered::get_registry`] upon initialization.
    ///
    /// This means it will be called at most **once** for any `Registered<K>` type.
    /// Used to fill the registry with the built-in instances.
    #[allow(unused_variables)]
    fn registry_post_init(registry: &mut HashMap<K, Self>) {}

    /// Returns a reference to the associated registry singleton.
    ///
    /// When called for the first time, the registry is created and [`Registered::registry_post_init`]
    /// is called with it. Repeated calls simply return the registry singleton.
    fn get_registry() -> &'static RwLock<HashMap<K, Self>> {
        get_or_init!(|| {
            let mut registry = HashMap::new();
            Self::registry_post_init(&mut registry);
            RwLock::new(registry)
        })
    }

    /// Adds a clone of the instance to the associated registry under the key returned by
    /// [`Registered::key`].
    ///
    /// # Returns
    /// [`None`] if nothing was registered under the instance's key.
    /// Otherwise the previous instance is replaced and returned.
    fn register(&self) -> Option<Self> {
        Self::get_registry()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(self.key().clone(), self.clone())
    }

    /// Retrieves a clone of a previously registered instance.
    ///
    /// # Arguments
    /// - `key` - Key under which the original instance was registered.
    fn get(key: impl Into<K>) -> Option<Self> {
        Self::get_registry()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_ref(&key.into())
            .cloned()
    }

    /// Returns the keys of all currently registered instances, in no particular order.
    fn registered_keys() -> Vec<K> {
        Self::get_registry()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys_cloned()
    }

    /// Convenience method for implementing [`serde::Serialize`] such that instances are serialized
    /// through their keys.
    ///
    /// # Example
    /// ```rust
    /// use serde::{Serialize, Serializer};
    /// use neatevo::utils::registered::Registered;
    ///
    /// #[derive(Clone)]
    /// struct NamedFunction {
    ///     name: String,
    ///     function: fn(f64) -> f64,
    /// }
    ///
    /// impl Registered<String> for NamedFunction {
    ///     fn key(&self) -> &String {
    ///         &self.name
    ///     }
    /// }
    ///
    /// impl Serialize for NamedFunction {
    ///     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    ///         Registered::serialize_as_key(self, serializer)
    ///     }
    /// }
    ///
    /// fn double(x: f64) -> f64 { 2. * x }
    ///
    /// let named = NamedFunction { name: "double".to_owned(), function: double };
    /// let serialized = serde_json::to_string(&named).unwrap();
    /// assert_eq!(&serialized, "\"double\"");
    /// ```
    fn serialize_as_key<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.key().serialize(serializer)
    }

    /// Convenience function for implementing [`serde::Deserialize`] such that instances are
    /// deserialized from their keys.
    ///
    /// Fails with a custom deserialization error if nothing is registered under the key.
    fn deserialize_from_key<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
        K: Debug,
    {
        let key = K::deserialize(deserializer)?;
        Self::get(key.clone()).ok_or_else(|| D::Error::custom(format!("nothing registered under {key:?}")))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Constant {
        name: String,
        value: f64,
    }

    impl Registered<String> for Constant {
        fn key(&self) -> &String {
            &self.name
        }

        fn registry_post_init(registry: &mut HashMap<String, Self>) {
            registry.insert("one".to_owned(), Constant { name: "one".to_owned(), value: 1. });
        }
    }

    #[test]
    fn test_post_init_and_register() {
        assert_eq!(Constant::get("one").map(|c| c.value), Some(1.));
        let two = Constant { name: "two".to_owned(), value: 2. };
        assert_eq!(two.register(), None);
        assert_eq!(Constant::get("two"), Some(two.clone()));
        assert_eq!(two.register(), Some(two));
        assert!(Constant::registered_keys().contains(&"one".to_owned()));
    }

    #[test]
    fn test_deserialize_from_key() {
        let mut deserializer = serde_json::Deserializer::from_str("\"one\"");
        let constant = Constant::deserialize_from_key(&mut deserializer).unwrap();
        assert_eq!(constant.value, 1.);
        let mut deserializer = serde_json::Deserializer::from_str("\"missing\"");
        assert!(Constant::deserialize_from_key(&mut deserializer).is_err());
    }
}
