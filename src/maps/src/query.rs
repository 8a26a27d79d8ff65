// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Query parameters and their encoding.

use url::form_urlencoded::byte_serialize;

/// Types that can be used as the value of a query parameter.
pub trait UrlValue {
    /// The value, before percent-encoding.
    fn to_url_value(&self) -> String;
}

impl UrlValue for str {
    fn to_url_value(&self) -> String {
        self.to_string()
    }
}

impl UrlValue for String {
    fn to_url_value(&self) -> String {
        self.clone()
    }
}

impl<T: UrlValue + ?Sized> UrlValue for &T {
    fn to_url_value(&self) -> String {
        (*self).to_url_value()
    }
}

macro_rules! url_value_display {
    ($($t:ty),*) => {
        $(impl UrlValue for $t {
            fn to_url_value(&self) -> String {
                self.to_string()
            }
        })*
    };
}
url_value_display!(bool, i32, i64, u32, u64, usize);

/// Times are sent as seconds since the Unix epoch.
impl UrlValue for std::time::SystemTime {
    fn to_url_value(&self) -> String {
        self.duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
            .to_string()
    }
}

/// Joins the URL values of `items` with `separator`.
pub fn join<I>(separator: char, items: I) -> String
where
    I: IntoIterator,
    I::Item: UrlValue,
{
    items
        .into_iter()
        .map(|i| i.to_url_value())
        .collect::<Vec<_>>()
        .join(&separator.to_string())
}

/// Percent-encodes `value` using the `application/x-www-form-urlencoded`
/// rules.
pub(crate) fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// An ordered collection of (possibly repeated) query parameters.
///
/// Parameter names keep the order in which they are first set. The values of
/// a repeated parameter keep the order in which they are added.
///
/// # Example
/// ```
/// # use google_maps_services::query::QueryParams;
/// let mut params = QueryParams::default();
/// params.set("origin", "Toronto");
/// params.add("waypoints", "Ottawa");
/// params.add("waypoints", "Kingston");
/// assert_eq!(params.get_all("waypoints"), ["Ottawa", "Kingston"]);
/// assert_eq!(params.to_query_string(), "origin=Toronto&waypoints=Ottawa&waypoints=Kingston");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Sets `name` to `value`, replacing any previous values.
    pub fn set<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        match self.entry_mut(&name) {
            Some(values) => *values = vec![value],
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Appends `value` to the values of `name`.
    pub fn add<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();
        match self.entry_mut(&name) {
            Some(values) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Removes all the values of `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| n != name);
    }

    /// The first value of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All the values of `name`, in order.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .unwrap_or_default()
    }

    /// Returns true if `name` has at least one value.
    pub fn contains(&self, name: &str) -> bool {
        !self.get_all(name).is_empty()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the parameters, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// The encoded query string, without the leading `?`.
    ///
    /// Repeated parameters appear once per value.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v)))
            .map(|(name, v)| format!("{name}={}", encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}
