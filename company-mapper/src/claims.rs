//! Claim insertion primitive used by the issuance pipeline.
//!
//! Mappers hand a value to [`ClaimSink::map_claim`]; where it lands
//! (claim name, nesting) and how it is typed (`jsonType.label`) is decided
//! here from the mapper's configuration, not by the mapper itself.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::ClaimSettings;
use crate::models::{IdToken, MapperModel, TokenKind};

#[derive(Debug, Error)]
pub enum ClaimMappingError {
    #[error("cannot map value to claim type '{0}'")]
    InvalidValue(String),

    #[error("unsupported claim type '{0}'")]
    UnsupportedType(String),

    #[error("claim path '{0}' crosses a claim that is not an object")]
    PathConflict(String),
}

/// Anything that can receive mapped claims.
pub trait ClaimSink {
    fn map_claim(&mut self, model: &MapperModel, value: Value) -> Result<(), ClaimMappingError>;
}

impl ClaimSink for IdToken {
    fn map_claim(&mut self, model: &MapperModel, value: Value) -> Result<(), ClaimMappingError> {
        map_claim(self, model, value)
    }
}

/// Whether `model` asks for its claim in tokens of `kind`.
pub fn includes(model: &MapperModel, kind: TokenKind) -> bool {
    ClaimSettings::resolve(model).includes(kind)
}

/// Insert `value` into `token` under the mapper's configured claim name.
///
/// Without a claim name nothing is inserted.
pub fn map_claim(
    token: &mut IdToken,
    model: &MapperModel,
    value: Value,
) -> Result<(), ClaimMappingError> {
    let settings = ClaimSettings::resolve(model);
    let Some(claim_name) = settings.claim_name else {
        tracing::debug!(mapper = %model.name, "No claim name configured, skipping claim");
        return Ok(());
    };

    let value = convert_to_type(settings.json_type.as_deref(), value)?;
    let path = split_claim_path(&claim_name);
    insert_nested(token.other_claims_mut(), &path, value, &claim_name)
}

/// Split a claim name on unescaped dots. `\.` stands for a literal dot.
pub fn split_claim_path(claim_name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = claim_name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'.') => {
                chars.next();
                current.push('.');
            }
            '.' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Coerce `value` to the configured JSON type.
pub fn convert_to_type(json_type: Option<&str>, value: Value) -> Result<Value, ClaimMappingError> {
    let Some(json_type) = json_type else {
        return Ok(value);
    };

    match json_type {
        "JSON" => match value {
            Value::String(s) => serde_json::from_str(&s)
                .map_err(|_| ClaimMappingError::InvalidValue(json_type.to_string())),
            other => Ok(other),
        },
        "String" => match value {
            Value::String(s) => Ok(Value::String(s)),
            other => Ok(Value::String(other.to_string())),
        },
        "long" | "int" => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| ClaimMappingError::InvalidValue(json_type.to_string())),
            _ => Err(ClaimMappingError::InvalidValue(json_type.to_string())),
        },
        "boolean" => match value {
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(ClaimMappingError::InvalidValue(json_type.to_string())),
        },
        other => Err(ClaimMappingError::UnsupportedType(other.to_string())),
    }
}

fn insert_nested(
    claims: &mut Map<String, Value>,
    path: &[String],
    value: Value,
    claim_name: &str,
) -> Result<(), ClaimMappingError> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };

    let mut node = claims;
    for component in parents {
        let entry = node
            .entry(component.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        node = match entry {
            Value::Object(map) => map,
            _ => return Err(ClaimMappingError::PathConflict(claim_name.to_string())),
        };
    }

    node.insert(last.clone(), value);
    Ok(())
}
