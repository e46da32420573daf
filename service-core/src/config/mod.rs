use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// Load a flat settings map from an optional file overlaid by environment
/// variables.
///
/// Nested tables are flattened into dotted keys, so `[jdbc] url = "..."` and
/// `PREFIX__JDBC__URL=...` both land under `jdbc.url`. Scalars are rendered
/// as strings and nulls are dropped.
pub fn load_settings(path: Option<&Path>, env_prefix: &str) -> Result<HashMap<String, String>, AppError> {
    dotenvy::dotenv().ok();

    let mut builder = Cfg::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(false));
    }
    let config = builder
        .add_source(Environment::with_prefix(env_prefix).separator("__"))
        .build()?;

    let root: Map<String, Value> = config.try_deserialize()?;

    let mut settings = HashMap::new();
    flatten_into(&mut settings, None, Value::Object(root));
    Ok(settings)
}

fn flatten_into(settings: &mut HashMap<String, String>, prefix: Option<&str>, value: Value) {
    match value {
        Value::Object(table) => {
            for (key, nested) in table {
                let full_key = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key,
                };
                flatten_into(settings, Some(&full_key), nested);
            }
        }
        Value::Null => {}
        Value::String(s) => {
            if let Some(key) = prefix {
                settings.insert(key.to_string(), s);
            }
        }
        other => {
            if let Some(key) = prefix {
                settings.insert(key.to_string(), other.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flattens_nested_tables_into_dotted_keys() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(
            file,
            r#"
[jdbc]
driver = "org.sqlite.JDBC"
url = "jdbc:sqlite:/tmp/companies.db"

[db]
username = "keycloak"

[claim]
name = "companies"

[access.token]
claim = true
"#
        )
        .expect("Failed to write settings");

        let settings = load_settings(Some(file.path()), "SERVICE_CORE_TEST_UNUSED")
            .expect("Failed to load settings");

        assert_eq!(settings.get("jdbc.driver").map(String::as_str), Some("org.sqlite.JDBC"));
        assert_eq!(
            settings.get("jdbc.url").map(String::as_str),
            Some("jdbc:sqlite:/tmp/companies.db")
        );
        assert_eq!(settings.get("db.username").map(String::as_str), Some("keycloak"));
        assert_eq!(settings.get("claim.name").map(String::as_str), Some("companies"));
        assert_eq!(settings.get("access.token.claim").map(String::as_str), Some("true"));
    }

    #[test]
    fn missing_file_yields_empty_settings() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("absent.toml");

        let settings = load_settings(Some(&path), "SERVICE_CORE_TEST_UNUSED")
            .expect("Missing file should not be an error");

        assert!(!settings.contains_key("jdbc.url"));
    }

    #[test]
    fn flatten_drops_nulls_and_stringifies_scalars() {
        let mut settings = HashMap::new();
        flatten_into(
            &mut settings,
            None,
            serde_json::json!({ "a": { "b": null, "c": 5 }, "d": false }),
        );

        assert!(!settings.contains_key("a.b"));
        assert_eq!(settings.get("a.c").map(String::as_str), Some("5"));
        assert_eq!(settings.get("d").map(String::as_str), Some("false"));
    }
}
