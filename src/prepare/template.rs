//! Indexer config templates: YAML documents with the placeholder `Country`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use deunicode::deunicode;
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;

use crate::common::write_atomic;

const PLACEHOLDER: &str = "Country";

pub fn load_template(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[prepare::load_template] Failed to read template {}", path.display()))?;
    serde_yaml::from_str(&text)
        .with_context(|| format!("[prepare::load_template] Failed to parse YAML in {}", path.display()))
}

/// Replace the placeholder in every string value, transliterating values to ASCII.
/// Mapping keys are left untouched.
pub fn replace_country(node: Value, country: &str) -> Value {
    match node {
        Value::String(s) => Value::String(deunicode(&s).replace(PLACEHOLDER, country)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(|item| replace_country(item, country)).collect()),
        Value::Mapping(map) => Value::Mapping(map.into_iter().map(|(k, v)| (k, replace_country(v, country))).collect()),
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            Value::Tagged(Box::new(TaggedValue { tag, value: replace_country(value, country) }))
        }
        other => other,
    }
}

/// Instantiate `template` for one country and write it.
pub fn write_config(template: &Value, country: &str, path: &Path) -> Result<()> {
    let config = replace_country(template.clone(), country);
    let text = serde_yaml::to_string(&config)
        .context("[prepare::write_config] Failed to serialize config")?;
    write_atomic(path, text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
aoi: data/Country.geojson
layers:
  - name: roads
    file: data/Country_roads.geojson
  - name: Country oceans
    threshold: 5
Country: Côte
";

    #[test]
    fn replaces_values_recursively() {
        let template: Value = serde_yaml::from_str(TEMPLATE).unwrap();
        let config = replace_country(template, "Kenya");

        assert_eq!(config["aoi"], Value::from("data/Kenya.geojson"));
        assert_eq!(config["layers"][0]["file"], Value::from("data/Kenya_roads.geojson"));
        assert_eq!(config["layers"][1]["name"], Value::from("Kenya oceans"));
        assert_eq!(config["layers"][1]["threshold"], Value::from(5));
        // keys stay, values are transliterated
        assert_eq!(config["Country"], Value::from("Cote"));
    }

    #[test]
    fn writes_instantiated_config() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Country_config.yml");
        fs::write(&source, TEMPLATE).unwrap();

        let template = load_template(&source).unwrap();
        let out = dir.path().join("prep").join("Kenya_config.yml");
        write_config(&template, "Kenya", &out).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("data/Kenya.geojson"));
        assert!(!written.contains("data/Country"));
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_template(&dir.path().join("none.yml")).is_err());
    }
}
