//! Shared utilities for command handlers

use crate::error::{Error, ErrorContext, Result};
use remap_core::{Document, MappingRule, TransformRequest};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Whether an optional path argument means stdin
pub fn is_stdin(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == "-")
}

/// Whether a path names a YAML file
pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a file, or stdin when the path is absent or '-'
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if !is_stdin(Some(path)) => {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            Ok(fs::read_to_string(path)?)
        }
        _ => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("reading stdin")?;
            Ok(content)
        }
    }
}

/// Parse JSON or, for `.yaml`/`.yml` files, YAML into a JSON value
pub fn parse_value(content: &str, path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) if is_yaml(path) => Ok(serde_yaml::from_str(content)?),
        _ => Ok(serde_json::from_str(content)?),
    }
}

/// Load a rule set without validating it
///
/// The file holds either an array of rules or an object with a `rules` array.
pub fn load_rules(path: &Path) -> Result<Vec<MappingRule>> {
    let content = read_source(Some(path))?;
    let value = parse_value(&content, Some(path))?;
    parse_rules(value, path)
}

/// Load a rule set and reject it if any rule cannot be applied
pub fn load_valid_rules(path: &Path) -> Result<Vec<MappingRule>> {
    let rules = load_rules(path)?;
    remap_core::validate_rules(&rules)?;
    tracing::debug!(count = rules.len(), path = %path.display(), "Loaded rule set");
    Ok(rules)
}

fn parse_rules(value: Value, path: &Path) -> Result<Vec<MappingRule>> {
    let rules = match value {
        Value::Array(_) => value,
        Value::Object(mut object) => match object.remove("rules") {
            Some(rules @ Value::Array(_)) => rules,
            _ => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "an object with a 'rules' array".to_string(),
                })
            }
        },
        _ => {
            return Err(Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "an array of mapping rules".to_string(),
            })
        }
    };

    serde_json::from_value(rules).with_context(|| format!("invalid rule in {}", path.display()))
}

/// Load the document to transform from a file or stdin
///
/// A `{"input_data": {...}}` request envelope is unwrapped.
pub fn load_document(path: Option<&Path>) -> Result<Document> {
    let content = read_source(path)?;
    let value = parse_value(&content, path)?;
    document_from_value(value, path)
}

/// Accept an object or request envelope as a document
pub fn document_from_value(value: Value, path: Option<&Path>) -> Result<Document> {
    TransformRequest::from_value(value).ok_or_else(|| Error::InvalidFormat {
        path: path.map_or_else(|| "<stdin>".into(), Path::to_path_buf),
        expected: "a JSON object".to_string(),
    })
}

/// Write a value to a file as YAML or pretty JSON depending on its extension
pub fn save_value(path: &Path, value: &Value) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        json
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_stdin_markers() {
        assert!(is_stdin(None));
        assert!(is_stdin(Some(Path::new("-"))));
        assert!(!is_stdin(Some(Path::new("input.json"))));
    }

    #[test]
    fn test_load_rules_array_and_wrapped_object() {
        let dir = TempDir::new().unwrap();
        let array = write(
            &dir,
            "rules.json",
            r#"[{"source_path": ["a"], "destination_path": ["x"], "transform_type": "toString"}]"#,
        );
        let wrapped = write(
            &dir,
            "rules.yaml",
            "rules:\n  - sourcePath: [a]\n    destinationPath: [x, y]\n    transformLogic: value + 1\n",
        );

        let rules = load_rules(&array).unwrap();
        assert_eq!(rules[0].transform_type, "toString");

        let rules = load_rules(&wrapped).unwrap();
        assert_eq!(rules[0].destination_path, vec!["x", "y"]);
        assert_eq!(rules[0].expression(), Some("value + 1"));
    }

    #[test]
    fn test_rule_file_shape_errors() {
        let dir = TempDir::new().unwrap();
        let scalar = write(&dir, "rules.json", "42");
        assert!(matches!(load_rules(&scalar), Err(Error::InvalidFormat { .. })));

        let object = write(&dir, "other.json", r#"{"mappings": []}"#);
        assert!(matches!(load_rules(&object), Err(Error::InvalidFormat { .. })));

        let bad_rule = write(&dir, "bad.json", r#"[{"source_path": "a"}]"#);
        let err = load_rules(&bad_rule).unwrap_err();
        assert!(err.to_string().contains("invalid rule in"));
    }

    #[test]
    fn test_load_valid_rules_rejects_empty_paths() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "rules.json", r#"[{"source_path": [], "destination_path": ["x"]}]"#);
        assert!(matches!(
            load_valid_rules(&path),
            Err(Error::Core(remap_core::Error::InvalidRule { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_rules(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_document_envelope_is_unwrapped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "input.json", r#"{"input_data": {"firstName": "A"}}"#);
        let document = load_document(Some(&path)).unwrap();
        assert_eq!(document.get("firstName"), Some(&json!("A")));
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err = document_from_value(json!([1, 2]), None).unwrap_err();
        assert!(err.to_string().contains("<stdin>"));
    }

    #[test]
    fn test_save_value_by_extension() {
        let dir = TempDir::new().unwrap();
        let value = json!({"user": {"first_name": "Jane"}});

        let json_path = dir.path().join("out/result.json");
        save_value(&json_path, &value).unwrap();
        let saved: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(saved, value);

        let yaml_path = dir.path().join("result.yml");
        save_value(&yaml_path, &value).unwrap();
        assert!(fs::read_to_string(&yaml_path).unwrap().contains("first_name: Jane"));
    }
}
