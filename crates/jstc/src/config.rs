//! `jstconvert.toml` project configuration, mirroring
//! `snow-pkg::manifest::Manifest`'s shape: a thin `serde`-derived struct
//! read with `toml::from_str`, carrying just enough to seed the prompt
//! loop's defaults so a repeat run doesn't re-ask the same answers.

use serde::Deserialize;
use std::path::Path;

/// A parsed `jstconvert.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source_root: Option<String>,
    #[serde(default)]
    pub output_root: Option<String>,
    #[serde(default)]
    pub rule_set: Option<String>,
    #[serde(default)]
    pub dump_dom: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Config, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse jstconvert.toml: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let toml = r#"
source_root = "src"
output_root = "dist"
rule_set = "py"
dump_dom = true
"#;
        let cfg = Config::from_str(toml).unwrap();
        assert_eq!(cfg.source_root.as_deref(), Some("src"));
        assert_eq!(cfg.output_root.as_deref(), Some("dist"));
        assert_eq!(cfg.rule_set.as_deref(), Some("py"));
        assert!(cfg.dump_dom);
    }

    #[test]
    fn every_field_is_optional() {
        let cfg = Config::from_str("").unwrap();
        assert_eq!(cfg.source_root, None);
        assert_eq!(cfg.output_root, None);
        assert_eq!(cfg.rule_set, None);
        assert!(!cfg.dump_dom);
    }
}
