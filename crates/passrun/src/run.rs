use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use orchestrator::{
    read_staging_as, read_target, workgroups_for, BufferPool, BufferRole, BufferSpec,
    ComputePipelineSpec, ContextOptions, DeviceContext, DispatchSpec, DrawSpec, FramePlan,
    FrameReport, MemoryMode, PipelineCache, RenderPipelineSpec, ShaderCatalog, TargetFormat,
    TargetSpec, Topology, VertexFormat, VertexLayout,
};
use runconfig::RunConfig;

use crate::cli::{Cli, Command};
use crate::demo;
use crate::settings::Settings;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let file_config = match cli.config.as_deref() {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let settings = Settings::resolve(&cli, file_config.as_ref());
    match cli.command {
        Command::Render(_) => run_render(&settings),
        Command::Compute(_) => run_compute(&settings),
    }
}

fn load_config(path: &Path) -> Result<RunConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    RunConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config at {}", path.display()))
}

/// Acquires the device, turning the two terminal acquisition failures into a
/// visible fallback notice before bailing out.
fn acquire_context(settings: &Settings) -> Result<DeviceContext> {
    let options = ContextOptions {
        power: settings.power,
        memory: MemoryMode::Balanced,
        force_fallback_adapter: settings.fallback_adapter,
    };
    match DeviceContext::new(&options) {
        Ok(context) => {
            tracing::info!(adapter = %context.adapter_profile(), "acquired GPU device");
            Ok(context)
        }
        Err(err @ (orchestrator::Error::Unsupported(_)
        | orchestrator::Error::DeviceUnavailable(_))) => {
            eprintln!(
                "passrun needs a GPU-capable environment; no usable adapter or device was found."
            );
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn run_render(settings: &Settings) -> Result<()> {
    let context = acquire_context(settings)?;
    let mut shaders = ShaderCatalog::new();
    let mut pipelines = PipelineCache::new();
    let mut pool = BufferPool::new();

    pool.create_init(
        &context,
        "quad vertices",
        BufferRole::Vertex,
        bytemuck::cast_slice(&demo::QUAD_VERTICES),
    )?;
    pool.create(
        &context,
        BufferSpec::new(
            "grid uniform",
            BufferRole::Uniform,
            std::mem::size_of::<demo::GridUniform>() as u64,
        ),
    )?;
    pool.write(
        &context,
        "grid uniform",
        bytemuck::bytes_of(&demo::GridUniform::new(settings.render.grid)),
    )?;

    let (width, height) = settings.size;
    let mut plan = FramePlan::new();
    plan.set_target(TargetSpec {
        label: "offscreen target".into(),
        width,
        height,
        format: TargetFormat::Rgba8UnormSrgb,
    });
    plan.draw(DrawSpec {
        pipeline: RenderPipelineSpec {
            label: "quad pipeline".into(),
            shader: settings.render.shader.clone(),
            vertex_entry: "vertex_main".into(),
            fragment_entry: "fragment_main".into(),
            layout: VertexLayout::new(vec![VertexFormat::Float32x2]),
            target_format: TargetFormat::Rgba8UnormSrgb,
            topology: Topology::TriangleList,
        },
        vertex_buffer: "quad vertices".into(),
        bindings: vec!["grid uniform".into()],
        vertex_count: demo::QUAD_VERTEX_COUNT,
        clear: settings.render.clear,
    });

    let output = plan.execute(&context, &pool, &mut shaders, &mut pipelines)?;
    tracing::info!(
        draws = output.report.draws,
        buffers = output.report.buffers_created,
        pipelines = output.report.pipelines_created,
        "render plan submitted"
    );

    if let Some(export) = &settings.render.export {
        let target = output
            .target
            .as_ref()
            .ok_or_else(|| anyhow!("render plan produced no offscreen target"))?;
        let pixels = read_target(&context, target)?;
        let image = image::RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| anyhow!("readback returned a mis-sized pixel buffer"))?;
        image
            .save(export)
            .with_context(|| format!("failed to write PNG to {}", export.display()))?;
        tracing::info!(path = %export.display(), "exported offscreen target");
    }

    write_report(settings, "render", &output.report, &pool)
}

fn run_compute(settings: &Settings) -> Result<()> {
    let context = acquire_context(settings)?;
    let mut shaders = ShaderCatalog::new();
    let mut pipelines = PipelineCache::new();
    let mut pool = BufferPool::new();

    let input = demo::stream_input(settings.compute.elements);
    let payload: &[u8] = bytemuck::cast_slice(&input);
    pool.create_init(&context, "stream", BufferRole::Storage, payload)?;
    pool.create(
        &context,
        BufferSpec::new("stream staging", BufferRole::Staging, payload.len() as u64),
    )?;

    let workgroups = workgroups_for(settings.compute.elements, settings.compute.workgroup_size)?;
    let mut plan = FramePlan::new();
    plan.dispatch(DispatchSpec {
        pipeline: ComputePipelineSpec {
            label: "stream pipeline".into(),
            shader: settings.compute.shader.clone(),
            entry: "main".into(),
        },
        bindings: vec!["stream".into()],
        workgroups,
    });
    plan.copy_to_staging("stream", "stream staging", payload.len() as u64);

    let output = plan.execute(&context, &pool, &mut shaders, &mut pipelines)?;
    tracing::info!(
        dispatches = output.report.dispatches,
        workgroups,
        copies = output.report.copies,
        bytes = output.report.bytes_copied,
        "compute plan submitted"
    );

    let results: Vec<u32> =
        read_staging_as(&context, &pool, "stream staging", payload.len() as u64)?;
    // Only the stock doubler kernel has a known CPU expectation to check.
    let is_doubler = settings
        .compute
        .shader
        .file_name()
        .is_some_and(|name| name == "doubler.wgsl");
    if is_doubler {
        let mismatches = results
            .iter()
            .zip(input.iter())
            .filter(|(out, inp)| **out != **inp * 2)
            .count();
        if mismatches == 0 {
            tracing::info!(elements = results.len(), "stream verified against CPU expectation");
        } else {
            tracing::warn!(mismatches, "stream diverged from CPU expectation");
        }
    }

    let preview: Vec<u32> = results.iter().take(4).copied().collect();
    println!("stream[0..{}] = {:?}", preview.len(), preview);
    println!(
        "sum = {}",
        results.iter().map(|&value| u64::from(value)).sum::<u64>()
    );

    write_report(settings, "compute", &output.report, &pool)
}

fn write_report(
    settings: &Settings,
    kind: &str,
    report: &FrameReport,
    pool: &BufferPool,
) -> Result<()> {
    let Some(path) = &settings.report else {
        return Ok(());
    };
    let ledger = pool.ledger();
    let document = serde_json::json!({
        "kind": kind,
        "buffers": {
            "created": report.buffers_created,
            "vertex": ledger.role_count(BufferRole::Vertex),
            "uniform": ledger.role_count(BufferRole::Uniform),
            "storage": ledger.role_count(BufferRole::Storage),
            "staging": ledger.role_count(BufferRole::Staging),
        },
        "pipelines_created": report.pipelines_created,
        "shader_modules": report.shader_modules,
        "draws": report.draws,
        "dispatches": report.dispatches,
        "copies": report.copies,
        "bytes_copied": report.bytes_copied,
    });
    fs::write(path, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote run report");
    Ok(())
}
