//! Raw weather payload and its normalization
//!
//! The backend returns one JSON object whose fields are either flat arrays,
//! scalars, or keyed sub-objects whose values (in enumeration order) form the
//! same kind of sequence as a flat array. [`RawPayload::normalize`] flattens
//! every keyed field so that downstream code only ever sees scalars and flat
//! sequences.

use serde_json::{Map, Value};

use super::weather::WeatherError;

/// One top-level field of the payload as received
#[derive(Debug, Clone, PartialEq)]
pub enum RawField {
    /// Any non-array, non-object value (including `null`)
    Scalar(Value),
    /// A flat JSON array
    Sequence(Vec<Value>),
    /// A JSON object whose values encode an ordered sequence
    KeyedSequence(Map<String, Value>),
}

impl From<Value> for RawField {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => RawField::Sequence(items),
            Value::Object(map) => RawField::KeyedSequence(map),
            other => RawField::Scalar(other),
        }
    }
}

/// A field after normalization: keyed sequences no longer exist
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(Value),
    Sequence(Vec<Value>),
}

/// The payload exactly as decoded from the response body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPayload {
    fields: Vec<(String, RawField)>,
}

/// The payload with every field flattened to a scalar or an ordered sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPayload {
    fields: Vec<(String, Field)>,
}

impl RawPayload {
    /// Builds a payload from a decoded JSON document.
    ///
    /// Fails with [`WeatherError::InvalidPayload`] if the top level is not an object.
    pub fn from_value(value: Value) -> Result<Self, WeatherError> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(WeatherError::InvalidPayload(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Returns the raw field with the given name, if present
    pub fn get(&self, name: &str) -> Option<&RawField> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    /// Returns the number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattens keyed sub-objects into ordered sequences.
    ///
    /// Flat arrays and scalars pass through untouched. Lengths are not checked
    /// here; mismatches surface when the daily records are sliced.
    pub fn normalize(self) -> NormalizedPayload {
        let fields = self
            .fields
            .into_iter()
            .map(|(name, field)| {
                let field = match field {
                    RawField::Scalar(value) => Field::Scalar(value),
                    RawField::Sequence(items) => Field::Sequence(items),
                    RawField::KeyedSequence(map) => Field::Sequence(enumeration_values(map)),
                };
                (name, field)
            })
            .collect();

        NormalizedPayload { fields }
    }
}

impl FromIterator<(String, Value)> for RawPayload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name, RawField::from(value)))
                .collect(),
        }
    }
}

impl NormalizedPayload {
    /// Returns the normalized field with the given name, if present
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    /// Returns the named field as a sequence.
    ///
    /// Absent fields and scalars yield `None`.
    pub fn sequence(&self, name: &str) -> Option<&[Value]> {
        match self.get(name)? {
            Field::Sequence(items) => Some(items),
            Field::Scalar(_) => None,
        }
    }

    /// Returns the named field as a non-null scalar
    pub fn scalar(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            Field::Scalar(Value::Null) | Field::Sequence(_) => None,
            Field::Scalar(value) => Some(value),
        }
    }

    /// Field names in payload order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Collects an object's values in enumeration order:
/// canonical array-index keys ascending by numeric value, then every other key in
/// insertion order.
///
/// The backend serializes parallel arrays as `{"0": .., "1": .., .., "10": ..}`,
/// so a plain lexicographic order would put `"10"` before `"2"`.
fn enumeration_values(map: Map<String, Value>) -> Vec<Value> {
    let mut indexed = Vec::new();
    let mut named = Vec::new();

    for (key, value) in map {
        match array_index(&key) {
            Some(index) => indexed.push((index, value)),
            None => named.push(value),
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    indexed
        .into_iter()
        .map(|(_, value)| value)
        .chain(named)
        .collect()
}

/// Parses a key as a canonical array index (`"0"`, `"17"`, never `"01"` or `"+1"`)
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
