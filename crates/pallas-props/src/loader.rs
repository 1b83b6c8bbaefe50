//! Layered property loading.
//!
//! This module provides the [`PropertiesLoader`] for building a
//! [`Properties`] map from multiple sources: defaults, files, `.env` files
//! and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{PropertyError, PropertyResult};
use crate::properties::Properties;

/// Property loader with a layered approach.
///
/// Layers are applied in the order they are added, later layers overriding
/// earlier ones. Environment overrides are applied last, when
/// [`load`](Self::load) is called.
///
/// Files may be `.properties`, `.toml` or `.json`. Nested TOML tables and
/// JSON objects are flattened to dotted keys (`server.port`), arrays to
/// indexed keys (`hosts.0`).
///
/// # Example
///
/// ```no_run
/// use pallas_props::PropertiesLoader;
///
/// # fn main() -> Result<(), pallas_props::PropertyError> {
/// let props = PropertiesLoader::new()
///     .with_defaults([("env", "DEV")])
///     .with_optional_file("app.properties")?
///     .with_env_prefix("APP")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PropertiesLoader {
    properties: Properties,
    env_prefix: Option<String>,
    env_vars: Option<Vec<(String, String)>>,
}

impl PropertiesLoader {
    /// Create a new, empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add default values.
    ///
    /// # Example
    ///
    /// ```
    /// use pallas_props::PropertiesLoader;
    ///
    /// let props = PropertiesLoader::new()
    ///     .with_defaults([("numThreads", "4")])
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(props.get("numThreads"), Some("4"));
    /// ```
    pub fn with_defaults<K, V>(mut self, defaults: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.properties.extend(defaults);
        self
    }

    /// Load properties from a file.
    ///
    /// The format is determined by the file extension.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file is not valid for its format
    /// - The extension is not `properties`, `toml` or `json`
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> PropertyResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PropertyError::file_not_found(path));
        }

        let content =
            fs::read_to_string(path).map_err(|e| PropertyError::read_error(path, e))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| PropertyError::UnsupportedFormat(path.display().to_string()))?;

        let layer = parse_layer(&content, &format)?;
        debug!(path = %path.display(), entries = layer.len(), "loaded properties file");
        self.properties.merge(layer);

        Ok(self)
    }

    /// Load properties from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> PropertyResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            debug!(path = %path.as_ref().display(), "optional properties file not present");
            Ok(self)
        }
    }

    /// Load properties from a string.
    ///
    /// `format` is `"properties"`, `"toml"` or `"json"`.
    ///
    /// # Example
    ///
    /// ```
    /// use pallas_props::PropertiesLoader;
    ///
    /// let toml = r#"
    ///     env = "DEV"
    ///     [pool]
    ///     size = 8
    /// "#;
    ///
    /// let props = PropertiesLoader::new()
    ///     .with_string(toml, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(props.get("pool.size"), Some("8"));
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> PropertyResult<Self> {
        let layer = parse_layer(content, &format.to_lowercase())?;
        self.properties.merge(layer);
        Ok(self)
    }

    /// Set the environment variable prefix for overrides.
    ///
    /// Variables use the form `PREFIX__SECTION__KEY`, which maps to the key
    /// `section.key`. If a key that equals it ignoring case already exists,
    /// that key is overwritten instead, so `APP__NUMTHREADS` updates
    /// `numThreads`.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Use the given variables instead of the process environment.
    pub fn with_env_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Load a `.env` file from the current directory or its parents into the
    /// process environment, if one exists.
    pub fn with_dotenv(self) -> PropertyResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => debug!(".env file not present"),
            Err(e) => return Err(e.into()),
        }
        Ok(self)
    }

    /// Load a specific `.env` file into the process environment.
    ///
    /// # Errors
    ///
    /// Returns `PropertyError::Dotenv` if the file is missing or malformed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> PropertyResult<Self> {
        dotenvy::from_path(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loaded .env file");
        Ok(self)
    }

    /// Finalize and return the loaded properties.
    ///
    /// Applies environment overrides if a prefix was set.
    pub fn load(mut self) -> PropertyResult<Properties> {
        if let Some(prefix) = self.env_prefix.take() {
            let vars = match self.env_vars.take() {
                Some(vars) => vars,
                None => env::vars().collect(),
            };
            self.apply_env_overrides(&prefix, vars);
        }

        Ok(self.properties)
    }

    // Apply PREFIX__A__B=value as a.b=value
    fn apply_env_overrides(&mut self, prefix: &str, vars: Vec<(String, String)>) {
        let marker = format!("{prefix}__");
        let mut applied = 0_usize;

        for (name, value) in vars {
            let Some(rest) = name.strip_prefix(&marker) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let dotted = rest
                .split("__")
                .map(str::to_lowercase)
                .collect::<Vec<_>>()
                .join(".");
            let key = self
                .properties
                .find_key_ignore_case(&dotted)
                .map_or(dotted, str::to_string);

            debug!(var = %name, key = %key, "applying environment override");
            self.properties.set(key, value);
            applied += 1;
        }

        debug!(prefix, applied, "applied environment overrides");
    }
}

fn parse_layer(content: &str, format: &str) -> PropertyResult<Properties> {
    match format {
        "properties" => Properties::parse(content),
        "toml" => {
            let table: toml::Table = toml::from_str(content)?;
            let mut props = Properties::new();
            for (key, value) in table {
                flatten_toml(&mut props, key, value);
            }
            Ok(props)
        }
        "json" => {
            let value: serde_json::Value = serde_json::from_str(content)?;
            let mut props = Properties::new();
            match value {
                serde_json::Value::Object(map) => {
                    for (key, value) in map {
                        flatten_json(&mut props, key, value);
                    }
                }
                other => {
                    return Err(PropertyError::UnsupportedFormat(format!(
                        "JSON properties must be an object, found {other}"
                    )))
                }
            }
            Ok(props)
        }
        other => Err(PropertyError::UnsupportedFormat(other.to_string())),
    }
}

fn flatten_toml(props: &mut Properties, key: String, value: toml::Value) {
    match value {
        toml::Value::String(s) => {
            props.set(key, s);
        }
        toml::Value::Table(table) => {
            for (child, value) in table {
                flatten_toml(props, format!("{key}.{child}"), value);
            }
        }
        toml::Value::Array(items) => {
            for (index, value) in items.into_iter().enumerate() {
                flatten_toml(props, format!("{key}.{index}"), value);
            }
        }
        other => {
            props.set(key, other.to_string());
        }
    }
}

fn flatten_json(props: &mut Properties, key: String, value: serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Null => {}
        Value::String(s) => {
            props.set(key, s);
        }
        Value::Object(map) => {
            for (child, value) in map {
                flatten_json(props, format!("{key}.{child}"), value);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.into_iter().enumerate() {
                flatten_json(props, format!("{key}.{index}"), value);
            }
        }
        other => {
            props.set(key, other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_only() {
        let props = PropertiesLoader::new()
            .with_defaults([("a", "1"), ("b", "2")])
            .load()
            .unwrap();
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_properties_file_overrides_defaults() {
        let file = temp_file(".properties", "env=PROD\nnumThreads=8\n");
        let props = PropertiesLoader::new()
            .with_defaults([("env", "DEV"), ("region", "eu")])
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(props.get("env"), Some("PROD"));
        assert_eq!(props.get("numThreads"), Some("8"));
        assert_eq!(props.get("region"), Some("eu"));
    }

    #[test]
    fn test_toml_file_is_flattened() {
        let file = temp_file(
            ".toml",
            "name = \"svc\"\ndebug = true\n[pool]\nsize = 8\nhosts = [\"a\", \"b\"]\n",
        );
        let props = PropertiesLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(props.get("name"), Some("svc"));
        assert_eq!(props.get("debug"), Some("true"));
        assert_eq!(props.get("pool.size"), Some("8"));
        assert_eq!(props.get("pool.hosts.1"), Some("b"));
    }

    #[test]
    fn test_json_string_is_flattened() {
        let props = PropertiesLoader::new()
            .with_string(r#"{"server": {"port": 9000, "tls": null}, "env": "QA"}"#, "json")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(props.get("server.port"), Some("9000"));
        assert_eq!(props.get("env"), Some("QA"));
        assert!(!props.contains_key("server.tls"));
    }

    #[test]
    fn test_missing_file() {
        let err = PropertiesLoader::new()
            .with_file("/nonexistent/app.properties")
            .unwrap_err();
        assert!(matches!(err, PropertyError::FileNotFound { .. }));
    }

    #[test]
    fn test_optional_missing_file() {
        let props = PropertiesLoader::new()
            .with_optional_file("/nonexistent/app.properties")
            .unwrap()
            .load()
            .unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_file(".yaml", "a: 1\n");
        let err = PropertiesLoader::new().with_file(file.path()).unwrap_err();
        assert!(matches!(err, PropertyError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_env_overrides_match_existing_keys() {
        let props = PropertiesLoader::new()
            .with_defaults([("numThreads", "4")])
            .with_env_prefix("app")
            .with_env_vars([
                ("APP__NUMTHREADS", "16"),
                ("APP__POOL__SIZE", "2"),
                ("OTHER__IGNORED", "x"),
            ])
            .load()
            .unwrap();

        assert_eq!(props.get("numThreads"), Some("16"));
        assert_eq!(props.get("pool.size"), Some("2"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_env_vars_ignored_without_prefix() {
        let props = PropertiesLoader::new()
            .with_env_vars([("APP__X", "1")])
            .load()
            .unwrap();
        assert!(props.is_empty());
    }
}
