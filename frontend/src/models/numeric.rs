//! Numbers that the backend may send either as JSON numbers or as strings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric value kept in the backend's own textual rendering.
///
/// Decimal fields arrive as `"500.00"` while integer fields arrive as `500`;
/// both are displayed exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Numeric(String);

impl Numeric {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Numeric(value.to_string())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumeric {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawNumeric>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawNumeric::Number(n)) => Numeric(n.to_string()),
            Some(RawNumeric::Text(s)) => Numeric(s),
            None => Numeric::default(),
        })
    }
}

impl Serialize for Numeric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
