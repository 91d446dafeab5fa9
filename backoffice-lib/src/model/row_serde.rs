//! JSON mapping for Row.
//!
//! Rows serialize as flat JSON objects. Decimals are written as strings so no
//! precision is lost; dates, times and UUIDs as their canonical text. On the
//! way back in, numbers become `Int` or `Decimal`, strings stay strings (the
//! typed getters parse them lazily) and nested arrays/objects, such as joined
//! relations, are kept as their JSON text.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

use super::Row;
use super::Value;

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Decimal(v) => Serialize::serialize(v, serializer),
            Value::String(v) => serializer.serialize_str(v),
            Value::Uuid(v) => serializer.collect_str(v),
            Value::Date(v) => serializer.collect_str(&v.format("%Y-%m-%d")),
            Value::Time(v) => serializer.collect_str(&v.format("%H:%M:%S")),
            Value::DateTime(v) => serializer.serialize_str(&v.to_rfc3339()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    let text = n.to_string();
                    text.parse::<Decimal>()
                        .or_else(|_| Decimal::from_scientific(&text))
                        .map(Value::Decimal)
                        .unwrap_or(Value::String(text))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Sorted keys keep the output stable for diffs and tests.
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();

        let mut map = serializer.serialize_map(Some(keys.len()))?;
        for key in keys {
            map.serialize_entry(key, &self.fields[key])?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = HashMap::<String, Value>::deserialize(deserializer)?;
        Ok(Row { fields })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_serialize_is_flat_and_sorted() {
        let id = Uuid::nil();
        let row = Row::with_id(id)
            .set("amount", Decimal::new(5000, 2))
            .set("date", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            format!(r#"{{"amount":"50.00","date":"2024-01-02","id":"{id}"}}"#)
        );
    }

    #[test]
    fn test_deserialize_numbers() {
        let row: Row = serde_json::from_str(r#"{"hours": 40, "rate": 25.5, "notes": null, "profiles": {"full_name": "Ann"}}"#).unwrap();
        assert_eq!(row.get("hours"), Some(&Value::Int(40)));
        assert_eq!(row.get_decimal("rate").unwrap(), Some(Decimal::new(255, 1)));
        assert_eq!(row.get("notes"), Some(&Value::Null));
        assert!(row.get_string("profiles").unwrap().unwrap().contains("Ann"));
    }
}
