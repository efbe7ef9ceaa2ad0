use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{
    ty::{TensorCategory, TensorType},
    TensorData,
};
use crate::error::ParseError;

/// A human-entered value for one model input.
///
/// `Text` is free-form and goes through JSON / comma / single-value probing.
/// The other variants come from a guided form, where every leaf is one
/// element pending coercion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Scalar(String),
    Vector(Vec<String>),
    Matrix(Vec<Vec<String>>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        Self::Vector(value)
    }
}

impl From<Vec<Vec<String>>> for RawValue {
    fn from(value: Vec<Vec<String>>) -> Self {
        Self::Matrix(value)
    }
}

impl TryFrom<Value> for RawValue {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        fn leaf(value: Value) -> Result<String, String> {
            match value {
                Value::String(s) => Ok(s),
                Value::Number(n) => Ok(n.to_string()),
                Value::Bool(b) => Ok(b.to_string()),
                Value::Null => Ok(String::new()),
                value => Err(format!("unsupported guided element: {value}")),
            }
        }

        match value {
            Value::String(s) => Ok(Self::Text(s)),
            Value::Number(n) => Ok(Self::Scalar(n.to_string())),
            Value::Bool(b) => Ok(Self::Scalar(b.to_string())),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_array) => items
                .into_iter()
                .map(|row| match row {
                    Value::Array(row) => row.into_iter().map(leaf).collect(),
                    row => Err(format!("unsupported guided row: {row}")),
                })
                .collect::<Result<_, _>>()
                .map(Self::Matrix),
            Value::Array(items) => items
                .into_iter()
                .map(leaf)
                .collect::<Result<_, _>>()
                .map(Self::Vector),
            value => Err(format!("unsupported raw value: {value}")),
        }
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)?
            .try_into()
            .map_err(de::Error::custom)
    }
}

impl RawValue {
    /// Returns `true` if there is nothing to submit.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) | Self::Scalar(s) => s.trim().is_empty(),
            Self::Vector(v) => v.is_empty(),
            Self::Matrix(m) => m.iter().all(Vec::is_empty),
        }
    }

    /// Converts this value into a flat, type-coerced sequence.
    ///
    /// Coercion never fails: elements that do not parse as the category's
    /// number become `0`. The only error is an empty value.
    pub fn parse(&self, ty: &TensorType) -> Result<TensorData, ParseError> {
        if self.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let category = ty.category();
        let data = match self {
            _ if category == TensorCategory::Bytes => TensorData::Bytes(vec![encode_bytes(
                &self.leaves().collect::<Vec<_>>().join(","),
            )]),
            Self::Text(text) => parse_text(text.trim(), category),
            Self::Scalar(s) => coerce_strs(std::iter::once(s.as_str()), category),
            Self::Vector(_) | Self::Matrix(_) => coerce_strs(self.leaves(), category),
        };

        if data.is_empty() {
            Err(ParseError::EmptyInput)
        } else {
            Ok(data)
        }
    }

    /// Leaf elements, depth-first and left to right.
    fn leaves(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Text(s) | Self::Scalar(s) => Box::new(std::iter::once(s.trim())),
            Self::Vector(v) => Box::new(v.iter().map(String::as_str)),
            Self::Matrix(m) => Box::new(m.iter().flatten().map(String::as_str)),
        }
    }
}

fn encode_bytes(text: &str) -> String {
    STANDARD.encode(text.trim().as_bytes())
}

fn parse_text(text: &str, category: TensorCategory) -> TensorData {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        let mut flat = Vec::new();
        flatten_json(items, &mut flat);
        return coerce_json(flat, category);
    }

    if text.contains(',') {
        coerce_strs(text.split(',').map(str::trim), category)
    } else {
        coerce_strs(std::iter::once(text), category)
    }
}

fn flatten_json(items: Vec<Value>, flat: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(nested) => flatten_json(nested, flat),
            item => flat.push(item),
        }
    }
}

fn coerce_strs<'a>(items: impl Iterator<Item = &'a str>, category: TensorCategory) -> TensorData {
    match category {
        TensorCategory::Integer => TensorData::Int(items.map(coerce_int).collect()),
        TensorCategory::Float => TensorData::Float(items.map(coerce_float).collect()),
        TensorCategory::Bytes => TensorData::Bytes(items.map(ToString::to_string).collect()),
        TensorCategory::Generic => {
            TensorData::Generic(items.map(|s| Value::String(s.to_string())).collect())
        }
    }
}

fn coerce_json(items: Vec<Value>, category: TensorCategory) -> TensorData {
    match category {
        TensorCategory::Integer => TensorData::Int(
            items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => n
                        .as_i64()
                        .or_else(|| n.as_u64().map(|n| n.min(i64::MAX as u64) as i64))
                        .unwrap_or_else(|| n.as_f64().unwrap_or_default() as i64),
                    Value::String(s) => coerce_int(s),
                    item => substitute_zero(item),
                })
                .collect(),
        ),
        TensorCategory::Float => TensorData::Float(
            items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => n.as_f64().unwrap_or_default(),
                    Value::String(s) => coerce_float(s),
                    item => substitute_zero(item),
                })
                .collect(),
        ),
        TensorCategory::Bytes => TensorData::Bytes(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    item => item.to_string(),
                })
                .collect(),
        ),
        TensorCategory::Generic => TensorData::Generic(items),
    }
}

/// Parses the leading base-10 integer of `s`, ignoring any trailing text
/// (`"3.7"` is `3`).
fn coerce_int(s: &str) -> i64 {
    let s = s.trim();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits_len = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return substitute_zero(&s);
    }

    let prefix = &s[..sign_len + digits_len];
    prefix
        .parse::<i64>()
        .or_else(|_| prefix.parse::<f64>().map(|n| n as i64))
        .unwrap_or_else(|_| substitute_zero(&s))
}

/// Parses the leading decimal number of `s`, ignoring any trailing text
/// (`"1.5kg"` is `1.5`). Non-finite results become `0`.
fn coerce_float(s: &str) -> f64 {
    let s = s.trim();
    let prefix = &s[..float_prefix_len(s)];
    match prefix.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => substitute_zero(&s),
    }
}

/// Length of the longest `[+-]digits[.digits][(e|E)[+-]digits]` prefix.
fn float_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(s.starts_with(['+', '-']));
    let int_len = digits_from(end);
    end += int_len;

    let mut frac_len = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_len = digits_from(end + 1);
        if int_len + frac_len > 0 {
            end += 1 + frac_len;
        }
    }
    if int_len + frac_len == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign_len = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_len = digits_from(end + 1 + sign_len);
        if exp_len > 0 {
            end += 1 + sign_len + exp_len;
        }
    }
    end
}

fn substitute_zero<T, V>(value: &V) -> T
where
    T: Default,
    V: ?Sized + ::core::fmt::Debug,
{
    warn!(value = ?value, "could not coerce element; substituting zero");
    T::default()
}
