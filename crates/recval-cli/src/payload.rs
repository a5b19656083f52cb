//! # Payload Loading
//!
//! Reads payload files as `serde_json::Value`. The format follows the file
//! extension: `.yaml`/`.yml` are YAML, anything else is JSON.

use std::path::Path;

use anyhow::{anyhow, Context};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Yaml,
}

impl PayloadFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => PayloadFormat::Yaml,
            _ => PayloadFormat::Json,
        }
    }
}

/// Read and parse a payload file.
pub fn load_payload(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read payload {}", path.display()))?;
    parse_payload(&content, PayloadFormat::from_path(path))
        .with_context(|| format!("cannot parse payload {}", path.display()))
}

pub fn parse_payload(content: &str, format: PayloadFormat) -> anyhow::Result<Value> {
    match format {
        PayloadFormat::Json => serde_json::from_str(content).context("invalid JSON"),
        PayloadFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content).context("invalid YAML")?;
            yaml_to_json_value(&yaml).map_err(|e| anyhow!("YAML-to-JSON conversion failed: {e}"))
        }
    }
}

/// Convert a `serde_yaml::Value` tree into the equivalent JSON tree.
///
/// Tags are dropped. Non-scalar mapping keys are rejected.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(object))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
