//! Request parameters, e.g. `?tag=rust&tag=web`.
//!
//! Unlike a plain map, a parameter can be submitted more than once,
//! and every value is kept in the order it was received.
use std::collections::{hash_map::IntoIter, HashMap};
use std::str::FromStr;

use super::urldecode;

/// Request parameters, keyed by input name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    params: HashMap<String, Vec<String>>,
}

impl Params {
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Parse `application/x-www-form-urlencoded` data, e.g. a query string or a form body.
    ///
    /// # Example
    ///
    /// ```
    /// # use rwf_forms::http::Params;
    /// let params = Params::parse("tag=rust&tag=web&name=J%C3%BCrgen+M");
    ///
    /// assert_eq!(params.all("tag"), &["rust", "web"]);
    /// assert_eq!(params.get::<String>("name").unwrap(), "Jürgen M");
    /// ```
    pub fn parse(data: &str) -> Self {
        let mut params = Self::new();

        // Remove the anchor if any.
        let without_anchor = data.split('#').next().unwrap_or("");

        for part in without_anchor.split('&') {
            if part.is_empty() {
                continue;
            }

            let mut key_value = part.splitn(2, '=');
            let key = urldecode(key_value.next().unwrap_or(""));
            let value = urldecode(key_value.next().unwrap_or("")); // ?key=&value=two

            params.insert(key, value);
        }

        params
    }

    /// Add a value to the end of the parameter's value list.
    pub fn insert(&mut self, name: impl ToString, value: impl ToString) {
        self.params
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    /// Get the first value of the parameter, converted to the requested type.
    pub fn get<T: FromStr>(&self, name: &str) -> Option<T> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<T>().ok())
    }

    /// All values submitted for the parameter, in order. Empty if none were.
    pub fn all(&self, name: &str) -> &[String] {
        match self.params.get(name) {
            Some(values) => values,
            None => &[],
        }
    }

    /// Append all values from other parameters after the values already stored.
    pub fn merge(mut self, other: Params) -> Self {
        for (name, values) in other.params {
            self.params.entry(name).or_default().extend(values);
        }

        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl IntoIterator for Params {
    type Item = (String, Vec<String>);
    type IntoIter = IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}
