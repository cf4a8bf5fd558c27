//! TOML run configuration for passrun.
//!
//! A config file supplies defaults the CLI can override; the binary resolves
//! built-in defaults, then file values, then flags.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    pub version: u32,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub compute: ComputeSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Offscreen target size as `[width, height]` in pixels.
    #[serde(default = "default_size")]
    pub size: [u32; 2],
    #[serde(default)]
    pub power: Option<PowerSetting>,
    /// Directory the default shader paths resolve against.
    #[serde(default)]
    pub shader_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            size: default_size(),
            power: None,
            shader_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSetting {
    Low,
    High,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderSection {
    /// Grid divisions for the tile uniform.
    #[serde(default = "default_grid")]
    pub grid: u32,
    /// Clear color as RGBA components in 0.0..=1.0.
    #[serde(default = "default_clear")]
    pub clear: [f64; 4],
    #[serde(default)]
    pub shader: Option<PathBuf>,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            grid: default_grid(),
            clear: default_clear(),
            shader: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComputeSection {
    /// Number of stream elements the compute demo processes.
    #[serde(default = "default_elements")]
    pub elements: u32,
    /// Invocations per workgroup; must match the shader's `@workgroup_size`.
    #[serde(default = "default_workgroup_size")]
    pub workgroup_size: u32,
    #[serde(default)]
    pub shader: Option<PathBuf>,
}

impl Default for ComputeSection {
    fn default() -> Self {
        Self {
            elements: default_elements(),
            workgroup_size: default_workgroup_size(),
            shader: None,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            defaults: Defaults::default(),
            render: RenderSection::default(),
            compute: ComputeSection::default(),
        }
    }
}

fn default_size() -> [u32; 2] {
    [512, 512]
}

fn default_grid() -> u32 {
    4
}

fn default_clear() -> [f64; 4] {
    [0.0, 0.5, 1.0, 1.0]
}

fn default_elements() -> u32 {
    1000
}

fn default_workgroup_size() -> u32 {
    64
}

impl RunConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported version {} (expected {SUPPORTED_VERSION})",
                self.version
            )));
        }
        if self.defaults.size.iter().any(|&dimension| dimension == 0) {
            return Err(ConfigError::Invalid(
                "defaults.size dimensions must be greater than zero".into(),
            ));
        }
        if self.render.grid == 0 {
            return Err(ConfigError::Invalid(
                "render.grid must be greater than zero".into(),
            ));
        }
        if self.render.clear.iter().any(|component| !component.is_finite()) {
            return Err(ConfigError::Invalid(
                "render.clear components must be finite".into(),
            ));
        }
        if self.compute.elements == 0 {
            return Err(ConfigError::Invalid(
                "compute.elements must be greater than zero".into(),
            ));
        }
        if !(1..=1024).contains(&self.compute.workgroup_size) {
            return Err(ConfigError::Invalid(
                "compute.workgroup_size must be within 1..=1024".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = RunConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(config.defaults.size, [512, 512]);
        assert_eq!(config.render.grid, 4);
        assert_eq!(config.render.clear, [0.0, 0.5, 1.0, 1.0]);
        assert_eq!(config.compute.elements, 1000);
        assert_eq!(config.compute.workgroup_size, 64);
        assert_eq!(config.defaults.power, None);
    }

    #[test]
    fn full_config_round_trips_values() {
        let config = RunConfig::from_toml_str(
            r#"
version = 1

[defaults]
size = [1280, 720]
power = "high"
shader_dir = "assets/shaders"

[render]
grid = 8
clear = [0.1, 0.2, 0.3, 1.0]
shader = "assets/shaders/custom.wgsl"

[compute]
elements = 4096
workgroup_size = 128
"#,
        )
        .unwrap();
        assert_eq!(config.defaults.size, [1280, 720]);
        assert_eq!(config.defaults.power, Some(PowerSetting::High));
        assert_eq!(
            config.defaults.shader_dir.as_deref(),
            Some(std::path::Path::new("assets/shaders"))
        );
        assert_eq!(config.render.grid, 8);
        assert_eq!(config.compute.elements, 4096);
        assert_eq!(config.compute.workgroup_size, 128);
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let err = RunConfig::from_toml_str("version = 99").unwrap_err();
        assert!(err.to_string().contains("unsupported version 99"));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = RunConfig::from_toml_str(
            "version = 1\n\n[defaults]\nsize = [0, 512]\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn workgroup_size_bounds_are_enforced() {
        let err = RunConfig::from_toml_str(
            "version = 1\n\n[compute]\nworkgroup_size = 0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("workgroup_size"));

        let err = RunConfig::from_toml_str(
            "version = 1\n\n[compute]\nworkgroup_size = 2048\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("workgroup_size"));
    }

    #[test]
    fn malformed_toml_reports_a_parse_error() {
        let err = RunConfig::from_toml_str("version = ").unwrap_err();
        assert!(err.to_string().contains("failed to parse configuration"));
    }
}
