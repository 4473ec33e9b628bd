use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FormField, ValidationError};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(DocenteId);

/// A row of the `Docentes` table as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Docente {
    #[serde(rename = "ID_Docente")]
    pub id: DocenteId,
    #[serde(rename = "Nome", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Regime", default, deserialize_with = "null_as_default")]
    pub regime: i64,
    #[serde(rename = "Ordem", default, deserialize_with = "null_as_default")]
    pub order: i64,
    #[serde(default, deserialize_with = "store_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "store_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "is_deleted", default, deserialize_with = "null_as_default")]
    pub deleted: bool,
}

impl Docente {
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Case-insensitive substring match on the name. An empty needle matches.
    pub fn name_matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Validated output of the create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocenteFields {
    pub name: String,
    pub regime: i64,
    pub order: i64,
}

impl DocenteFields {
    /// Validates raw form text. Only a zero-length field counts as missing.
    /// Numbers take the leading integer of the text, so `"40h"` reads as 40.
    pub fn parse(name: &str, regime: &str, order: &str) -> Result<Self, ValidationError> {
        if name.is_empty() || regime.is_empty() || order.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        Ok(Self {
            name: name.to_string(),
            regime: leading_integer(regime).ok_or(ValidationError::NotANumber {
                field: FormField::Regime,
            })?,
            order: leading_integer(order).ok_or(ValidationError::NotANumber {
                field: FormField::Order,
            })?,
        })
    }
}

/// Reads an optionally signed integer prefix after leading whitespace.
/// A `0x` prefix switches to hexadecimal. Trailing text is ignored; `None`
/// when no digit is found or the value overflows.
pub fn leading_integer(raw: &str) -> Option<i64> {
    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude = i64::from_str_radix(&rest[..end], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Insert payload. `is_deleted` is always sent as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocente {
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Regime")]
    pub regime: i64,
    #[serde(rename = "Ordem")]
    pub order: i64,
    #[serde(rename = "is_deleted")]
    pub deleted: bool,
}

impl From<DocenteFields> for NewDocente {
    fn from(fields: DocenteFields) -> Self {
        Self {
            name: fields.name,
            regime: fields.regime,
            order: fields.order,
            deleted: false,
        }
    }
}

/// Update payload matched by identifier. Unset members are left untouched by
/// the store and are not serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocentePatch {
    #[serde(rename = "Nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Regime", default, skip_serializing_if = "Option::is_none")]
    pub regime: Option<i64>,
    #[serde(rename = "Ordem", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(rename = "is_deleted", default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
}

impl DocentePatch {
    pub fn fields(fields: DocenteFields) -> Self {
        Self {
            name: Some(fields.name),
            regime: Some(fields.regime),
            order: Some(fields.order),
            deleted: None,
        }
    }

    pub fn soft_delete() -> Self {
        Self {
            deleted: Some(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.regime.is_none() && self.order.is_none() && self.deleted.is_none()
    }
}

/// Parses timestamps as rendered by either `timestamptz` (RFC 3339) or a naive
/// `timestamp` column, which is taken as UTC.
pub fn parse_store_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))?;
    Ok(naive.and_utc())
}

fn store_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_store_timestamp(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Null columns read as the type's default: empty text, zero, or `false`
/// for the deleted flag.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
