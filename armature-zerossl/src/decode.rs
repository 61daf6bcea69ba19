//! Strict and tolerant response decoding.
//!
//! ZeroSSL does not keep a stable shape for every field. The `validation`
//! object of a certificate in particular comes back as an empty JSON array
//! for some certificate states. Operations whose payloads carry such fields
//! decode in two stages: a strict pass into the target type, then, if that
//! fails, a field-by-field pass over the raw JSON that keeps everything
//! readable and records the paths it had to drop.

use crate::error::{Result, ZeroSslError};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::ops::Deref;

/// A value produced by tolerant decoding
///
/// Dereferences to the decoded value. When [`is_partial`](Self::is_partial)
/// returns true, the fields listed by
/// [`degraded_fields`](Self::degraded_fields) could not be read and hold
/// their default value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded<T> {
    value: T,
    degraded: Vec<String>,
}

impl<T> Decoded<T> {
    /// Wrap a value that decoded without loss
    pub fn clean(value: T) -> Self {
        Self {
            value,
            degraded: Vec::new(),
        }
    }

    /// Wrap a value that lost the given fields while decoding
    pub fn partial(value: T, degraded: Vec<String>) -> Self {
        Self { value, degraded }
    }

    /// Whether any field had to be dropped
    pub fn is_partial(&self) -> bool {
        !self.degraded.is_empty()
    }

    /// Paths of the fields that could not be decoded, e.g. `results[3].validation`
    ///
    /// `$` means the body was not JSON at all.
    pub fn degraded_fields(&self) -> &[String] {
        &self.degraded
    }

    /// Borrow the decoded value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the decoded value, discarding degradation details
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Decoded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Types that can be rebuilt field by field from loosely shaped JSON
pub(crate) trait Salvage: DeserializeOwned + Default {
    fn salvage(value: &Value, path: &str, degraded: &mut Vec<String>) -> Self;
}

/// Decode a body that must match `T` exactly
pub(crate) fn strict<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(ZeroSslError::Decode)
}

/// Decode a body, falling back to a field-by-field salvage on failure
pub(crate) fn tolerant<T: Salvage>(body: &[u8]) -> Decoded<T> {
    let err = match serde_json::from_slice::<T>(body) {
        Ok(value) => return Decoded::clean(value),
        Err(err) => err,
    };

    let mut degraded = Vec::new();
    let value = match serde_json::from_slice::<Value>(body) {
        Ok(json) => T::salvage(&json, "", &mut degraded),
        Err(_) => {
            degraded.push("$".to_string());
            T::default()
        }
    };

    tracing::warn!(
        error = %err,
        degraded = ?degraded,
        "Response did not decode cleanly, using partially decoded value"
    );

    Decoded::partial(value, degraded)
}

/// Field reader over one JSON object used by [`Salvage`] implementations
pub(crate) struct Fields<'a> {
    object: Option<&'a Map<String, Value>>,
    path: String,
    degraded: &'a mut Vec<String>,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(value: &'a Value, path: &str, degraded: &'a mut Vec<String>) -> Self {
        let object = match value {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => {
                let root = if path.is_empty() { "$" } else { path };
                degraded.push(root.to_string());
                None
            }
        };

        Self {
            object,
            path: path.to_string(),
            degraded,
        }
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        let object = self.object?;
        object.get(key).filter(|value| !value.is_null())
    }

    /// Read `key` with its plain `Deserialize` impl; missing and `null` give the default
    pub(crate) fn get<T: DeserializeOwned + Default>(&mut self, key: &str) -> T {
        self.get_with(key, |value| T::deserialize(value))
    }

    /// Read `key` with a custom deserializer function
    pub(crate) fn get_with<T, F>(&mut self, key: &str, read: F) -> T
    where
        T: Default,
        F: FnOnce(&'a Value) -> std::result::Result<T, serde_json::Error>,
    {
        let Some(value) = self.lookup(key) else {
            return T::default();
        };

        match read(value) {
            Ok(decoded) => decoded,
            Err(_) => {
                let path = self.path_of(key);
                self.degraded.push(path);
                T::default()
            }
        }
    }

    /// Read an array under `key`, salvaging each element on its own
    pub(crate) fn list<T: Salvage>(&mut self, key: &str) -> Vec<T> {
        let path = self.path_of(key);
        match self.lookup(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut decoded = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    decoded.push(T::salvage(item, &item_path, self.degraded));
                }
                decoded
            }
            Some(_) => {
                self.degraded.push(path);
                Vec::new()
            }
        }
    }
}

/// Deserialize `null` as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

/// Deserialize a count the API sends either as a number or a numeric string
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => u32::try_from(n).map(Some).map_err(D::Error::custom),
        Some(NumberOrText::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(D::Error::custom)
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(i64),
}

/// Deserialize a `0`/`1` flag as a bool
pub(crate) fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(value) => value != 0,
    })
}
