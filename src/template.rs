//! # URI Templates
//!
//! Expansion of templated links and curies goes through the [`Expander`] trait so a
//! processor can be configured with a different RFC6570 implementation. The default,
//! [`Rfc6570`], is backed by the `uritemplate` crate.

use serde_json::{Map, Value};
use uritemplate::UriTemplate;

/// Pure function `(template, parameters) -> uri`.
pub trait Expander: Send + Sync {
    fn expand(&self, template: &str, params: &Map<String, Value>) -> String;
}

/// RFC6570 expansion of JSON parameters.
///
/// Strings, numbers and booleans expand as scalars, arrays as lists, objects as
/// associative arrays. `null` leaves the variable undefined.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rfc6570;

impl Expander for Rfc6570 {
    fn expand(&self, template: &str, params: &Map<String, Value>) -> String {
        let mut uri = UriTemplate::new(template);
        for (name, value) in params {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    uri.set(name, items.iter().map(scalar).collect::<Vec<String>>());
                }
                Value::Object(pairs) => {
                    let pairs: Vec<(String, String)> =
                        pairs.iter().map(|(k, v)| (k.clone(), scalar(v))).collect();
                    uri.set(name, pairs);
                }
                other => {
                    uri.set(name, scalar(other));
                }
            }
        }
        uri.build()
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Builds the parameter map for a single variable.
pub(crate) fn single(name: &str, value: &str) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert(name.to_string(), Value::String(value.to_string()));
    params
}
