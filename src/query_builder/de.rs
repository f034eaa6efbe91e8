//! JSON-shaped input for conditions and options.
//!
//! ```json
//! {
//!   "where": [{"column": "name", "opt": {"type": "=", "value": "John Smith"}}],
//!   "order": {"id": "DESC", "name": null},
//!   "limit": 10
//! }
//! ```
//! Order entries are kept in document order when read straight from text. A
//! `serde_json::Value` sorts object keys, so build ordering in code when it matters.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{Condition, ConditionValue, Direction, GetOptions, OrderBy, Operator};
use crate::types::RowValues;

#[derive(Deserialize)]
struct RawCondition {
    column: String,
    opt: RawComparison,
}

#[derive(Deserialize)]
struct RawComparison {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    value: JsonValue,
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCondition::deserialize(deserializer)?;
        let operator = match raw.opt.kind {
            Some(kind) => Some(
                Operator::parse(&kind)
                    .ok_or_else(|| de::Error::custom(format!("unknown operator {kind:?}")))?,
            ),
            None => None,
        };
        let value = match raw.opt.value {
            JsonValue::Array(items) => {
                ConditionValue::Any(items.into_iter().map(RowValues::from).collect())
            }
            other => ConditionValue::One(RowValues::from(other)),
        };
        Ok(Condition {
            column: raw.column,
            operator,
            value,
        })
    }
}

#[derive(Deserialize)]
struct RawOptions {
    #[serde(rename = "where", alias = "conditions", default)]
    conditions: Option<Vec<Condition>>,
    #[serde(default, deserialize_with = "order_entries")]
    order: Vec<OrderBy>,
    #[serde(default)]
    limit: Option<i64>,
}

impl<'de> Deserialize<'de> for GetOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawOptions::deserialize(deserializer)?;
        Ok(GetOptions {
            conditions: raw.conditions.unwrap_or_default(),
            order: raw.order,
            limit: raw.limit,
        })
    }
}

fn parse_direction(direction: &str) -> Option<Direction> {
    if direction.eq_ignore_ascii_case("asc") {
        Some(Direction::Asc)
    } else if direction.eq_ignore_ascii_case("desc") {
        Some(Direction::Desc)
    } else {
        None
    }
}

fn order_entries<'de, D>(deserializer: D) -> Result<Vec<OrderBy>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderVisitor;

    impl<'de> Visitor<'de> for OrderVisitor {
        type Value = Vec<OrderBy>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of column name to \"ASC\", \"DESC\" or null")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::new();
            while let Some((column, direction)) = map.next_entry::<String, Option<String>>()? {
                let direction = match direction {
                    Some(text) => Some(parse_direction(&text).ok_or_else(|| {
                        de::Error::custom(format!("unknown order direction {text:?}"))
                    })?),
                    None => None,
                };
                entries.push(OrderBy { column, direction });
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_any(OrderVisitor)
}
