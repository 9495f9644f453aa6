//! Index configuration records and running-status types

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Identifier of an index configuration.
///
/// The backend sends ids as JSON numbers, while the running-status map keys
/// them by string. Both forms normalise to the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexId(String);

impl IndexId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IndexId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for IndexId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for IndexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        id_value(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for IndexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => IndexId::from(n),
            RawId::Text(s) => IndexId(s),
        })
    }
}

/// An index configuration exactly as reported by `GET configs`.
///
/// The record shape belongs to the backend, so the JSON is kept as sent and
/// row fields are read from it leniently: a missing, null or mistyped field
/// reads as its default instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexConfig(Value);

impl IndexConfig {
    pub fn new(id: IndexId, name: impl Into<String>) -> Self {
        let mut record = Map::new();
        record.insert("id".to_string(), id_value(&id));
        record.insert("name".to_string(), Value::String(name.into()));
        Self(Value::Object(record))
    }

    pub fn id(&self) -> IndexId {
        match self.field("id") {
            Some(Value::String(s)) => IndexId::new(s.as_str()),
            Some(Value::Number(n)) => IndexId::new(n.to_string()),
            Some(other) => IndexId::new(other.to_string()),
            None => IndexId::new(""),
        }
    }

    pub fn name(&self) -> &str {
        self.field("name").and_then(Value::as_str).unwrap_or_default()
    }

    /// Dashboards using this index as `(dashboard id, title)`, in server order
    pub fn dashboards(&self) -> Vec<(String, String)> {
        let Some(Value::Object(dashboards)) = self.field("dashboards") else {
            return Vec::new();
        };
        dashboards
            .iter()
            .map(|(id, title)| (id.clone(), text(title)))
            .collect()
    }

    pub fn last_update(&self) -> Option<String> {
        match self.field("lastUpdate")? {
            Value::Null => None,
            value => Some(text(value)),
        }
    }

    pub fn successful_run(&self) -> bool {
        self.field("successfulRun")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn set_successful_run(&mut self, successful_run: bool) {
        self.set_field("successfulRun", Value::Bool(successful_run));
    }

    pub fn insert_dashboard(&mut self, id: impl Into<String>, title: impl Into<String>) {
        if !matches!(self.field("dashboards"), Some(Value::Object(_))) {
            self.set_field("dashboards", Value::Object(Map::new()));
        }
        if let Some(Value::Object(dashboards)) = self.0.get_mut("dashboards") {
            dashboards.insert(id.into(), Value::String(title.into()));
        }
    }

    /// The record as the server sent it
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    fn set_field(&mut self, key: &str, value: Value) {
        if let Value::Object(record) = &mut self.0 {
            record.insert(key.to_string(), value);
        }
    }
}

/// Numeric ids as JSON numbers, anything else as a string
fn id_value(id: &IndexId) -> Value {
    match id.as_str().parse::<u64>() {
        Ok(n) if n.to_string() == id.as_str() => Value::from(n),
        _ => Value::String(id.to_string()),
    }
}

/// Strings as-is, anything else as its JSON text
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Running-state descriptors keyed by index id, as reported by `GET running`.
///
/// The descriptor shape belongs to the backend; only key presence is
/// interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunningStatus(BTreeMap<IndexId, serde_json::Value>);

impl RunningStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: IndexId, state: serde_json::Value) {
        self.0.insert(id, state);
    }

    pub fn get(&self, id: &IndexId) -> Option<&serde_json::Value> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &IndexId) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &IndexId> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every id tracked here is still present in `next`
    pub fn is_subset_of(&self, next: &RunningStatus) -> bool {
        self.ids().all(|id| next.contains(id))
    }
}

/// Result of `POST import/configs`: `[new, changed]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct ImportCounts {
    pub created: u64,
    pub changed: u64,
}

impl From<(u64, u64)> for ImportCounts {
    fn from((created, changed): (u64, u64)) -> Self {
        Self { created, changed }
    }
}

impl From<ImportCounts> for (u64, u64) {
    fn from(counts: ImportCounts) -> Self {
        (counts.created, counts.changed)
    }
}
