use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::PassOptions;

pub const CONFIG_FILE_NAME: &str = ".keyshrinkrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Build output directory holding the artifacts.
    #[serde(default = "default_dist_root")]
    pub dist_root: String,
    #[serde(default = "default_reference_language")]
    pub reference_language: String,
    #[serde(default = "default_translation_functions")]
    pub translation_functions: Vec<String>,
    #[serde(default = "default_usage_extensions")]
    pub usage_extensions: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_dist_root() -> String {
    "./dist".to_string()
}

fn default_reference_language() -> String {
    "en".to_string()
}

fn default_translation_functions() -> Vec<String> {
    ["$t", "$tc", "$te"].map(String::from).to_vec()
}

fn default_usage_extensions() -> Vec<String> {
    ["js", "mjs", "cjs"].map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dist_root: default_dist_root(),
            reference_language: default_reference_language(),
            translation_functions: default_translation_functions(),
            usage_extensions: default_usage_extensions(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        let language = &self.reference_language;
        if language.is_empty()
            || !language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid 'referenceLanguage': \"{}\"", language);
        }

        if self.translation_functions.iter().any(|f| f.trim().is_empty()) {
            bail!("Empty name in 'translationFunctions'");
        }

        if let Some(ext) = self
            .usage_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(['.', '/']))
        {
            bail!(
                "Invalid extension in 'usageExtensions': \"{}\" (use e.g. \"js\")",
                ext
            );
        }

        Ok(())
    }

    pub fn pass_options(&self, verbose: bool) -> PassOptions {
        PassOptions {
            reference_language: self.reference_language.clone(),
            translation_functions: self.translation_functions.clone(),
            usage_extensions: self.usage_extensions.clone(),
            verbose,
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory relative paths in the config resolve against.
    pub base_dir: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                base_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}
