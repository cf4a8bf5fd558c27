use std::path::PathBuf;

use orchestrator::PowerPreference;
use runconfig::{PowerSetting, RunConfig};

use crate::cli::{Cli, Command};

/// Fully resolved knobs for one run.
///
/// Resolution order: built-in defaults, then the config file, then CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub size: (u32, u32),
    pub power: PowerPreference,
    pub fallback_adapter: bool,
    pub report: Option<PathBuf>,
    pub render: RenderSettings,
    pub compute: ComputeSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub shader: PathBuf,
    pub grid: u32,
    pub clear: [f64; 4],
    pub export: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeSettings {
    pub shader: PathBuf,
    pub elements: u32,
    pub workgroup_size: u32,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<&RunConfig>) -> Self {
        let config = file.cloned().unwrap_or_default();
        let shader_dir = config
            .defaults
            .shader_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("shaders"));

        let size = cli
            .size
            .unwrap_or((config.defaults.size[0], config.defaults.size[1]));
        let power = cli.power.unwrap_or(match config.defaults.power {
            Some(PowerSetting::High) => PowerPreference::High,
            Some(PowerSetting::Low) | None => PowerPreference::Low,
        });

        let render_args = match &cli.command {
            Command::Render(args) => Some(args),
            Command::Compute(_) => None,
        };
        let compute_args = match &cli.command {
            Command::Compute(args) => Some(args),
            Command::Render(_) => None,
        };

        let render = RenderSettings {
            shader: render_args
                .and_then(|args| args.shader.clone())
                .or_else(|| config.render.shader.clone())
                .unwrap_or_else(|| shader_dir.join("mandelbrot.wgsl")),
            grid: render_args
                .and_then(|args| args.grid)
                .unwrap_or(config.render.grid),
            clear: config.render.clear,
            export: render_args.and_then(|args| args.export.clone()),
        };

        let compute = ComputeSettings {
            shader: compute_args
                .and_then(|args| args.shader.clone())
                .or_else(|| config.compute.shader.clone())
                .unwrap_or_else(|| shader_dir.join("doubler.wgsl")),
            elements: compute_args
                .and_then(|args| args.elements)
                .unwrap_or(config.compute.elements),
            workgroup_size: compute_args
                .and_then(|args| args.workgroup_size)
                .unwrap_or(config.compute.workgroup_size),
        };

        Settings {
            size,
            power,
            fallback_adapter: cli.fallback_adapter,
            report: cli.report.clone(),
            render,
            compute,
        }
    }
}
