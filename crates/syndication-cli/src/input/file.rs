use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Document formats accepted by `--input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// `.yaml` / `.yml` are YAML; everything else is parsed as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// Read a JSON or YAML file and deserialise into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse(&contents, InputFormat::from_path(&canonical))
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
}

fn parse<T: DeserializeOwned>(
    contents: &str,
    format: InputFormat,
) -> Result<T, Box<dyn std::error::Error>> {
    let value = match format {
        InputFormat::Json => serde_json::from_str(contents)?,
        InputFormat::Yaml => serde_yaml::from_str(contents)?,
    };
    Ok(value)
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use syndication_core::financing::{FinancingType, Scenario};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("deal.yml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("deal.YAML")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("deal.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("deal")), InputFormat::Json);
    }

    #[test]
    fn test_partial_yaml_scenario() {
        let yaml = "financing_type: Cash\nadjusted_raise: 555000\n";
        let scenario: Scenario = parse(yaml, InputFormat::Yaml).unwrap();
        assert_eq!(scenario.financing_type, FinancingType::Cash);
        assert_eq!(scenario.adjusted_raise, dec!(555000));
        assert_eq!(scenario.term, 25);
    }
}
