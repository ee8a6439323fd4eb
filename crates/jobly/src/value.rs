//! Request scalars and ordered payloads.
//!
//! [`Payload`] is the ordered key/value list that the clause builders walk. Keys keep the
//! order they arrived in (JSON objects are parsed with `serde_json`'s `preserve_order`), so
//! the Nth placeholder always binds the Nth value.
//!
//! [`SqlValue`] binds by the parameter type Postgres inferred for its placeholder: the text
//! `"1000"` compared against an `INTEGER` column is sent as an `int4`, a JSON number bound
//! into a `TEXT` column is sent as its decimal rendering.

use crate::error::{JoblyError, JoblyResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A scalar carried by a request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "Value")]
pub enum SqlValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl SqlValue {
    /// The string form, lower-cased.
    pub fn lowercased(&self) -> SqlValue {
        SqlValue::Text(self.to_string().to_lowercase())
    }

    /// `%value%`, lower-cased, for `LOWER(col) LIKE $n` predicates.
    pub fn wildcarded(&self) -> SqlValue {
        SqlValue::Text(format!("%{self}%").to_lowercase())
    }

    /// Booleans, plus their `"true"` / `"false"` spellings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Bool(b) => Some(*b),
            SqlValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Numbers, plus strings that parse as one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Number(n) => n.as_f64(),
            SqlValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("null"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Number(n) => f.write_str(&number_text(n)),
            SqlValue::Text(s) => f.write_str(s),
        }
    }
}

/// Text form of a JSON number. Whole floats print without a fraction, so `1000.0` and
/// `1e3` both read `"1000"`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e21 => {
            if v == 0.0 {
                "0".to_string()
            } else {
                format!("{v:.0}")
            }
        }
        _ => n.to_string(),
    }
}

impl TryFrom<Value> for SqlValue {
    type Error = JoblyError;

    fn try_from(value: Value) -> JoblyResult<Self> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Bool(b)),
            Value::Number(n) => Ok(SqlValue::Number(n)),
            Value::String(s) => Ok(SqlValue::Text(s)),
            Value::Array(_) | Value::Object(_) => Err(JoblyError::invalid_input(
                "payload values must be strings, numbers or booleans",
            )),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Number(value.into())
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Number(value.into())
    }
}

impl From<f64> for SqlValue {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(SqlValue::Null, SqlValue::Number)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlValue::Null, Into::into)
    }
}

fn mismatch(value: &SqlValue, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind {value:?} as {ty}").into()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, rust_decimal::Error> {
    let s = s.trim();
    Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s))
}

/// Encode the textual form of a scalar into the wire format of `ty`.
fn encode_str(
    value: &SqlValue,
    s: &str,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::NUMERIC => parse_decimal(s)?.to_sql(ty, out),
        Type::BOOL => parse_bool(s)
            .ok_or_else(|| mismatch(value, ty))?
            .to_sql(ty, out),
        _ if <&str as ToSql>::accepts(ty) => s.to_sql(ty, out),
        _ => Err(mismatch(value, ty)),
    }
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            SqlValue::Bool(b) if *ty == Type::BOOL => b.to_sql(ty, out),
            SqlValue::Bool(b) if <&str as ToSql>::accepts(ty) => b.to_string().to_sql(ty, out),
            SqlValue::Bool(_) => Err(mismatch(self, ty)),
            SqlValue::Number(n) => encode_str(self, &number_text(n), ty, out),
            SqlValue::Text(s) => encode_str(self, s, ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

/// An ordered set of request fields.
///
/// Inserting an existing key replaces its value in place, so order is that of first
/// appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    entries: Vec<(String, SqlValue)>,
}

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object. Nested arrays/objects are rejected.
    pub fn from_json(value: Value) -> JoblyResult<Self> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(JoblyError::invalid_input(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }

    /// Insert or replace a field (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SqlValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SqlValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut payload = Payload::new();
        for (k, v) in iter {
            payload.insert(k, v);
        }
        payload
    }
}

impl TryFrom<Map<String, Value>> for Payload {
    type Error = JoblyError;

    fn try_from(map: Map<String, Value>) -> JoblyResult<Self> {
        let mut payload = Payload::new();
        for (k, v) in map {
            payload.insert(k, SqlValue::try_from(v)?);
        }
        Ok(payload)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Payload::try_from(map).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(value: &SqlValue, ty: &Type) -> Result<Vec<u8>, Box<dyn Error + Sync + Send>> {
        let mut buf = BytesMut::new();
        value.to_sql_checked(ty, &mut buf)?;
        Ok(buf.to_vec())
    }

    fn expected<T: ToSql>(v: T, ty: &Type) -> Vec<u8> {
        let mut buf = BytesMut::new();
        v.to_sql(ty, &mut buf).unwrap();
        buf.to_vec()
    }

    #[test]
    fn payload_keeps_json_key_order() {
        let payload =
            Payload::from_json(json!({"numEmployees": "4", "description": "a company"})).unwrap();
        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(keys, vec!["numEmployees", "description"]);
    }

    #[test]
    fn payload_insert_replaces_in_place() {
        let payload = Payload::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        let entries: Vec<_> = payload.iter().map(|(k, v)| (k, v.clone())).collect();
        assert_eq!(
            entries,
            vec![("a", SqlValue::from(3)), ("b", SqlValue::from(2))]
        );
    }

    #[test]
    fn payload_rejects_nested_values() {
        let err = Payload::from_json(json!({"name": ["a", "b"]})).unwrap_err();
        assert!(matches!(err, JoblyError::InvalidInput(_)));
    }

    #[test]
    fn payload_rejects_non_object() {
        assert!(Payload::from_json(json!(["name"])).is_err());
    }

    #[test]
    fn payload_deserializes_from_str() {
        let payload: Payload =
            serde_json::from_str(r#"{"title": "eng", "hasEquity": true}"#).unwrap();
        assert_eq!(payload.get("hasEquity"), Some(&SqlValue::Bool(true)));
        assert_eq!(payload.keys().next(), Some("title"));
    }

    #[test]
    fn payload_serializes_as_object() {
        let payload = Payload::new().with("salary", 45000).with("title", "Cook");
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"salary":45000,"title":"Cook"}"#
        );
    }

    #[test]
    fn lowercased_string_forms() {
        assert_eq!(SqlValue::from("CaT").lowercased(), SqlValue::from("cat"));
        assert_eq!(SqlValue::from(1000).lowercased(), SqlValue::from("1000"));
        assert_eq!(SqlValue::from(true).lowercased(), SqlValue::from("true"));
        assert_eq!(SqlValue::Null.lowercased(), SqlValue::from("null"));
    }

    #[test]
    fn whole_floats_print_as_integers() {
        let payload: Payload =
            serde_json::from_str(r#"{"a": 1000.0, "b": 1e1, "c": -0.0, "d": 0.026}"#).unwrap();
        let texts: Vec<_> = payload.values().map(ToString::to_string).collect();
        assert_eq!(texts, vec!["1000", "10", "0", "0.026"]);
    }

    #[test]
    fn whole_float_binds_as_integer() {
        let value: SqlValue = serde_json::from_str("250.0").unwrap();
        let bytes = encode(&value, &Type::INT4).unwrap();
        assert_eq!(bytes, expected(250_i32, &Type::INT4));
    }

    #[test]
    fn fractional_float_into_integer_is_an_error() {
        assert!(encode(&SqlValue::from(2.5), &Type::INT4).is_err());
    }

    #[test]
    fn wildcarded_wraps_and_lowercases() {
        assert_eq!(SqlValue::from("Net").wildcarded(), SqlValue::from("%net%"));
    }

    #[test]
    fn as_bool_accepts_spelled_booleans() {
        assert_eq!(SqlValue::from("false").as_bool(), Some(false));
        assert_eq!(SqlValue::from(true).as_bool(), Some(true));
        assert_eq!(SqlValue::from(1).as_bool(), None);
    }

    #[test]
    fn text_binds_as_integer() {
        let bytes = encode(&SqlValue::from("1000"), &Type::INT4).unwrap();
        assert_eq!(bytes, expected(1000_i32, &Type::INT4));
    }

    #[test]
    fn number_binds_as_text() {
        let bytes = encode(&SqlValue::from(42), &Type::TEXT).unwrap();
        assert_eq!(bytes, b"42".to_vec());
    }

    #[test]
    fn number_binds_as_numeric() {
        let bytes = encode(&SqlValue::from(0), &Type::NUMERIC).unwrap();
        assert_eq!(bytes, expected(Decimal::ZERO, &Type::NUMERIC));
    }

    #[test]
    fn text_binds_as_numeric() {
        let bytes = encode(&SqlValue::from("0.026"), &Type::NUMERIC).unwrap();
        assert_eq!(
            bytes,
            expected(Decimal::from_str("0.026").unwrap(), &Type::NUMERIC)
        );
    }

    #[test]
    fn bool_binds_as_bool() {
        let bytes = encode(&SqlValue::from(false), &Type::BOOL).unwrap();
        assert_eq!(bytes, expected(false, &Type::BOOL));
    }

    #[test]
    fn null_binds_as_sql_null() {
        let mut buf = BytesMut::new();
        let is_null = SqlValue::Null.to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
    }

    #[test]
    fn unparseable_text_is_an_error() {
        assert!(encode(&SqlValue::from("lots"), &Type::INT4).is_err());
    }

    #[test]
    fn bool_into_integer_is_an_error() {
        assert!(encode(&SqlValue::from(true), &Type::INT4).is_err());
    }
}
