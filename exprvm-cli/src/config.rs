//! Configuration handling for the exprvm CLI

use anyhow::{Context, Result};
use exprvm_parser::CompilerOptions;
use exprvm_vm::{VMConfig, DEFAULT_MAX_STACK_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub vm: VmConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_true")]
    pub allow_braces: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmConfig {
    #[serde(default = "default_max_stack_depth")]
    pub max_stack_depth: usize,

    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            allow_braces: default_true(),
        }
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: default_max_stack_depth(),
            trace: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            max_depth: self.compiler.max_depth,
            allow_braces: self.compiler.allow_braces,
        }
    }

    pub fn vm_config(&self) -> VMConfig {
        VMConfig {
            max_stack_depth: self.vm.max_stack_depth,
            trace: self.vm.trace,
        }
    }
}

fn default_max_depth() -> usize { CompilerOptions::default().max_depth }
fn default_max_stack_depth() -> usize { DEFAULT_MAX_STACK_DEPTH }
fn default_true() -> bool { true }
fn default_log_level() -> String { "warn".to_string() }

/// `~/.exprvm/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".exprvm").join("config.toml"))
}

/// Load configuration from file or use defaults
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        read_config(&path)
    } else {
        match default_config_path() {
            Some(default_path) if default_path.exists() => read_config(&default_path),
            _ => Ok(Config::default()),
        }
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
