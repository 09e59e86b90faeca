// src/store.rs
// Persisted description records: one JSON file per property under
// descriptions/css/properties/, in the exact canonical form the
// source-format rules check (2-space indent, trailing newline).

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::consts::{DESCRIPTIONS_DIR, PROPERTIES_SUBDIR};

/// Per-property payload inside a record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyEntry {
    #[serde(rename = "__short_description")]
    pub short_description: String,
}

pub fn properties_dir() -> PathBuf {
    PathBuf::from(DESCRIPTIONS_DIR).join(PROPERTIES_SUBDIR)
}

/// The canonical persisted serialization of a record.
pub fn to_canonical_json(value: &Value) -> Result<String, Box<dyn Error>> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

pub fn record_for(name: &str, html: &str) -> Value {
    json!({ "css": { "properties": { name: { "__short_description": html } } } })
}

/// Write `descriptions/css/properties/<name>.json`; returns the path.
pub fn write_description(name: &str, html: &str) -> Result<PathBuf, Box<dyn Error>> {
    let dir = properties_dir();
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{name}.json"));
    fs::write(&path, to_canonical_json(&record_for(name, html))?)?;
    Ok(path)
}

/// Every `.json` file under `dir`, sorted for a stable processing order.
pub fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut out = Vec::new();
    walk(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), Box<dyn Error>> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }
    Ok(())
}

/// First property name and its short description from a parsed record.
pub fn extract_description(record: &Value) -> Result<(String, String), Box<dyn Error>> {
    let props = record
        .get("css")
        .and_then(|c| c.get("properties"))
        .and_then(Value::as_object)
        .ok_or("record has no css.properties object")?;
    let (name, entry) = props.iter().next().ok_or("record has no properties")?;
    let entry: PropertyEntry = serde_json::from_value(entry.clone())?;
    Ok((name.clone(), entry.short_description))
}

/// Deep-merge every description file under `dir` into one exported object.
pub fn aggregate(dir: &Path) -> Result<Value, Box<dyn Error>> {
    let mut merged = Value::Object(Map::new());
    for path in collect_json_files(dir)? {
        let text = fs::read_to_string(&path)?;
        let next: Value = serde_json::from_str(&text)?;
        deep_merge(&mut merged, next);
    }
    Ok(merged)
}

fn deep_merge(into: &mut Value, from: Value) {
    match (into, from) {
        (Value::Object(a), Value::Object(b)) => {
            for (key, value) in b {
                match a.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        a.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_shape_and_canonical_form() {
        let record = record_for("color", "The color.");
        let text = to_canonical_json(&record).unwrap();
        assert_eq!(
            text,
            "{\n  \"css\": {\n    \"properties\": {\n      \"color\": {\n        \"__short_description\": \"The color.\"\n      }\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn extract_round_trips() {
        let record = record_for("opacity", "See-through.");
        let (name, desc) = extract_description(&record).unwrap();
        assert_eq!(name, "opacity");
        assert_eq!(desc, "See-through.");
    }

    #[test]
    fn deep_merge_combines_sibling_properties() {
        let mut merged = Value::Object(Map::new());
        deep_merge(&mut merged, record_for("color", "a"));
        deep_merge(&mut merged, record_for("width", "b"));
        let props = merged["css"]["properties"].as_object().unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props["color"]["__short_description"], "a");
        assert_eq!(props["width"]["__short_description"], "b");
    }
}
