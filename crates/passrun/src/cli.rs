use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use orchestrator::PowerPreference;

#[derive(Parser, Debug)]
#[command(
    name = "passrun",
    author,
    version,
    about = "Headless GPU pass runner"
)]
pub struct Cli {
    /// Optional TOML run configuration merged beneath command-line flags.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Offscreen target size (e.g. `512x512`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_dimensions, global = true)]
    pub size: Option<(u32, u32)>,

    /// Adapter power preference: `low` or `high`.
    #[arg(long, value_name = "MODE", value_parser = parse_power, global = true)]
    pub power: Option<PowerPreference>,

    /// Prefer the fallback (software) adapter even when hardware exists.
    #[arg(long, global = true)]
    pub fallback_adapter: bool,

    /// Write a JSON run report to the given path.
    #[arg(long, value_name = "FILE", global = true)]
    pub report: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draw the fullscreen quad demo into an offscreen target.
    Render(RenderArgs),
    /// Run the element-stream compute demo and read the results back.
    Compute(ComputeArgs),
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// WGSL shader with `vertex_main` and `fragment_main` entry points.
    #[arg(long, value_name = "FILE")]
    pub shader: Option<PathBuf>,

    /// Grid divisions for the tile uniform.
    #[arg(long, value_name = "N")]
    pub grid: Option<u32>,

    /// Export the rendered target as a PNG.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// WGSL shader with a `main` compute entry point.
    #[arg(long, value_name = "FILE")]
    pub shader: Option<PathBuf>,

    /// Number of stream elements to process.
    #[arg(long, value_name = "N")]
    pub elements: Option<u32>,

    /// Invocations per workgroup; must match the shader's `@workgroup_size`.
    #[arg(long, value_name = "N")]
    pub workgroup_size: Option<u32>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_dimensions(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = width
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width".to_string())?;
    let height = height
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height".to_string())?;
    if width == 0 || height == 0 {
        return Err("dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_power(value: &str) -> Result<PowerPreference, String> {
    match value.to_ascii_lowercase().as_str() {
        "low" => Ok(PowerPreference::Low),
        "high" => Ok(PowerPreference::High),
        other => Err(format!(
            "unknown power preference '{other}' (expected `low` or `high`)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dimension_variants() {
        assert_eq!(parse_dimensions("512x512").unwrap(), (512, 512));
        assert_eq!(parse_dimensions("1920X1080").unwrap(), (1920, 1080));
        assert_eq!(parse_dimensions(" 640 x 480 ").unwrap(), (640, 480));
        assert!(parse_dimensions("640").is_err());
        assert!(parse_dimensions("0x480").is_err());
        assert!(parse_dimensions("wide x tall").is_err());
    }

    #[test]
    fn parses_power_values() {
        assert_eq!(parse_power("low").unwrap(), PowerPreference::Low);
        assert_eq!(parse_power("HIGH").unwrap(), PowerPreference::High);
        assert!(parse_power("turbo").is_err());
    }

    #[test]
    fn parses_render_subcommand_with_globals() {
        let cli = Cli::try_parse_from([
            "passrun", "--size", "640x480", "render", "--grid", "8",
        ])
        .unwrap();
        assert_eq!(cli.size, Some((640, 480)));
        match cli.command {
            Command::Render(args) => assert_eq!(args.grid, Some(8)),
            Command::Compute(_) => panic!("expected render subcommand"),
        }
    }

    #[test]
    fn parses_compute_subcommand() {
        let cli = Cli::try_parse_from([
            "passrun",
            "compute",
            "--elements",
            "2048",
            "--workgroup-size",
            "128",
        ])
        .unwrap();
        match cli.command {
            Command::Compute(args) => {
                assert_eq!(args.elements, Some(2048));
                assert_eq!(args.workgroup_size, Some(128));
            }
            Command::Render(_) => panic!("expected compute subcommand"),
        }
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Cli::try_parse_from(["passrun"]).is_err());
    }
}
