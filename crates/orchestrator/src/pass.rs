use crate::buffers::{BufferLedger, BufferPool, BufferRole};
use crate::context::DeviceContext;
use crate::error::Error;
use crate::pipeline::{ComputePipelineSpec, PipelineCache, RenderPipelineSpec};
use crate::shader::ShaderCatalog;
use crate::types::TargetFormat;

/// Offscreen color target description for draw commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
}

/// One recorded render pass that clears the target and issues a single draw.
#[derive(Debug, Clone)]
pub struct DrawSpec {
    pub pipeline: RenderPipelineSpec,
    /// Label of the vertex-role buffer bound to slot 0.
    pub vertex_buffer: String,
    /// Labels bound at group 0 in binding order (uniform/storage roles).
    pub bindings: Vec<String>,
    pub vertex_count: u32,
    /// Clear color applied to the target before the draw.
    pub clear: [f64; 4],
}

/// One recorded compute pass.
#[derive(Debug, Clone)]
pub struct DispatchSpec {
    pub pipeline: ComputePipelineSpec,
    /// Labels bound at group 0 in binding order (uniform/storage roles).
    pub bindings: Vec<String>,
    /// Workgroup count along x; see [`workgroups_for`].
    pub workgroups: u32,
}

/// One recorded buffer-to-buffer copy into a staging buffer.
#[derive(Debug, Clone)]
pub struct CopySpec {
    pub src: String,
    pub dst: String,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub enum PassCommand {
    Draw(DrawSpec),
    Dispatch(DispatchSpec),
    Copy(CopySpec),
}

/// Counters describing what a plan execution actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub buffers_created: usize,
    pub pipelines_created: usize,
    pub shader_modules: usize,
    pub draws: usize,
    pub dispatches: usize,
    pub copies: usize,
    pub bytes_copied: u64,
}

/// The offscreen texture a plan rendered into, kept alive for readback.
pub struct RenderTarget {
    pub(crate) texture: wgpu::Texture,
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
}

/// Result of [`FramePlan::execute`].
pub struct FrameOutput {
    pub report: FrameReport,
    pub target: Option<RenderTarget>,
}

/// A frame plan records work as data.
///
/// Nothing touches the device until [`FramePlan::execute`], and validation
/// runs before any encoding, so a malformed plan fails before a single
/// command is recorded. This is also what keeps plans testable on machines
/// without a GPU.
#[derive(Debug, Clone, Default)]
pub struct FramePlan {
    target: Option<TargetSpec>,
    commands: Vec<PassCommand>,
}

impl FramePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offscreen color target draws render into.
    pub fn set_target(&mut self, target: TargetSpec) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<&TargetSpec> {
        self.target.as_ref()
    }

    pub fn draw(&mut self, spec: DrawSpec) {
        self.commands.push(PassCommand::Draw(spec));
    }

    pub fn dispatch(&mut self, spec: DispatchSpec) {
        self.commands.push(PassCommand::Dispatch(spec));
    }

    pub fn copy_to_staging(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        bytes: u64,
    ) {
        self.commands.push(PassCommand::Copy(CopySpec {
            src: src.into(),
            dst: dst.into(),
            bytes,
        }));
    }

    pub fn commands(&self) -> &[PassCommand] {
        &self.commands
    }

    /// Checks every recorded command against the ledger and device limits.
    pub fn validate(&self, ledger: &BufferLedger, limits: &wgpu::Limits) -> Result<(), Error> {
        if self.commands.is_empty() {
            return Err(Error::validation("plan records no work"));
        }

        if let Some(target) = &self.target {
            if target.width == 0 || target.height == 0 {
                return Err(Error::validation(format!(
                    "target '{}' has a zero dimension",
                    target.label
                )));
            }
            let max = limits.max_texture_dimension_2d;
            if target.width > max || target.height > max {
                return Err(Error::validation(format!(
                    "target '{}' is {}x{} but the device caps 2d textures at {max}",
                    target.label, target.width, target.height
                )));
            }
        }

        for command in &self.commands {
            match command {
                PassCommand::Draw(draw) => self.validate_draw(draw, ledger)?,
                PassCommand::Dispatch(dispatch) => validate_dispatch(dispatch, ledger, limits)?,
                PassCommand::Copy(copy) => validate_copy(copy, ledger)?,
            }
        }
        Ok(())
    }

    fn validate_draw(&self, draw: &DrawSpec, ledger: &BufferLedger) -> Result<(), Error> {
        let target = self.target.as_ref().ok_or_else(|| {
            Error::validation("draw recorded without an offscreen target")
        })?;
        if target.format != draw.pipeline.target_format {
            return Err(Error::validation(format!(
                "pipeline '{}' targets {:?} but the plan target is {:?}",
                draw.pipeline.label, draw.pipeline.target_format, target.format
            )));
        }
        if draw.vertex_count == 0 {
            return Err(Error::validation("draw records zero vertices"));
        }

        let entry = ledger.entry(&draw.vertex_buffer).ok_or_else(|| {
            Error::validation(format!(
                "draw references unknown buffer '{}'",
                draw.vertex_buffer
            ))
        })?;
        if entry.role != BufferRole::Vertex {
            return Err(Error::validation(format!(
                "draw reads '{}' which has role {:?}, not Vertex",
                draw.vertex_buffer, entry.role
            )));
        }
        let stride = draw.pipeline.layout.array_stride();
        let needed = u64::from(draw.vertex_count) * stride;
        if needed > entry.size {
            return Err(Error::validation(format!(
                "draw of {} vertices needs {needed} bytes but '{}' holds {}",
                draw.vertex_count, draw.vertex_buffer, entry.size
            )));
        }
        validate_bindings(&draw.bindings, ledger)
    }
}

fn validate_dispatch(
    dispatch: &DispatchSpec,
    ledger: &BufferLedger,
    limits: &wgpu::Limits,
) -> Result<(), Error> {
    if dispatch.workgroups == 0 {
        return Err(Error::validation("dispatch records zero workgroups"));
    }
    if dispatch.workgroups > limits.max_compute_workgroups_per_dimension {
        return Err(Error::validation(format!(
            "dispatch of {} workgroups exceeds the device cap of {}",
            dispatch.workgroups, limits.max_compute_workgroups_per_dimension
        )));
    }
    validate_bindings(&dispatch.bindings, ledger)
}

fn validate_copy(copy: &CopySpec, ledger: &BufferLedger) -> Result<(), Error> {
    let src = ledger.entry(&copy.src).ok_or_else(|| {
        Error::validation(format!("copy reads unknown buffer '{}'", copy.src))
    })?;
    let dst = ledger.entry(&copy.dst).ok_or_else(|| {
        Error::validation(format!("copy writes unknown buffer '{}'", copy.dst))
    })?;
    if src.role != BufferRole::Storage {
        return Err(Error::validation(format!(
            "copy source '{}' has role {:?}, which is not copyable",
            copy.src, src.role
        )));
    }
    if dst.role != BufferRole::Staging {
        return Err(Error::validation(format!(
            "copy destination '{}' has role {:?}, not Staging",
            copy.dst, dst.role
        )));
    }
    if copy.bytes == 0 {
        return Err(Error::validation("copy records zero bytes"));
    }
    if copy.bytes % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(Error::validation(format!(
            "copy of {} bytes is not {}-byte aligned",
            copy.bytes,
            wgpu::COPY_BUFFER_ALIGNMENT
        )));
    }
    if copy.bytes > src.size || copy.bytes > dst.size {
        return Err(Error::validation(format!(
            "copy of {} bytes overflows '{}' ({}) or '{}' ({})",
            copy.bytes, copy.src, src.size, copy.dst, dst.size
        )));
    }
    Ok(())
}

fn validate_bindings(bindings: &[String], ledger: &BufferLedger) -> Result<(), Error> {
    for label in bindings {
        let entry = ledger.entry(label).ok_or_else(|| {
            Error::validation(format!("binding references unknown buffer '{label}'"))
        })?;
        if !matches!(entry.role, BufferRole::Uniform | BufferRole::Storage) {
            return Err(Error::validation(format!(
                "buffer '{label}' has role {:?} and cannot be bound",
                entry.role
            )));
        }
    }
    Ok(())
}

/// Number of workgroups needed to cover `element_count` items at
/// `workgroup_size` invocations each.
pub fn workgroups_for(element_count: u32, workgroup_size: u32) -> Result<u32, Error> {
    if workgroup_size == 0 {
        return Err(Error::validation("workgroup size must be non-zero"));
    }
    Ok(element_count.div_ceil(workgroup_size))
}

enum Prepared {
    Draw {
        pipeline: wgpu::RenderPipeline,
        bind_group: Option<wgpu::BindGroup>,
        vertex: wgpu::Buffer,
        vertex_count: u32,
        clear: wgpu::Color,
    },
    Dispatch {
        pipeline: wgpu::ComputePipeline,
        bind_group: Option<wgpu::BindGroup>,
        workgroups: u32,
    },
    Copy {
        src: wgpu::Buffer,
        dst: wgpu::Buffer,
        bytes: u64,
    },
}

impl FramePlan {
    /// Validates, resolves pipelines and bind groups, encodes every pass in
    /// recorded order, and submits once.
    pub fn execute(
        &self,
        context: &DeviceContext,
        pool: &BufferPool,
        shaders: &mut ShaderCatalog,
        pipelines: &mut PipelineCache,
    ) -> Result<FrameOutput, Error> {
        self.validate(pool.ledger(), context.limits())?;

        let target = self.create_target(context);
        let target_view = target
            .as_ref()
            .map(|target| target.texture.create_view(&wgpu::TextureViewDescriptor::default()));

        let mut prepared = Vec::with_capacity(self.commands.len());
        for command in &self.commands {
            match command {
                PassCommand::Draw(draw) => {
                    let pipeline = pipelines.render_pipeline(context, shaders, &draw.pipeline)?;
                    let bind_group =
                        build_bind_group(context, pool, &draw.bindings, |index| {
                            pipeline.get_bind_group_layout(index)
                        })?;
                    prepared.push(Prepared::Draw {
                        pipeline,
                        bind_group,
                        vertex: pool.buffer(&draw.vertex_buffer)?,
                        vertex_count: draw.vertex_count,
                        clear: wgpu::Color {
                            r: draw.clear[0],
                            g: draw.clear[1],
                            b: draw.clear[2],
                            a: draw.clear[3],
                        },
                    });
                }
                PassCommand::Dispatch(dispatch) => {
                    let pipeline =
                        pipelines.compute_pipeline(context, shaders, &dispatch.pipeline)?;
                    let bind_group =
                        build_bind_group(context, pool, &dispatch.bindings, |index| {
                            pipeline.get_bind_group_layout(index)
                        })?;
                    prepared.push(Prepared::Dispatch {
                        pipeline,
                        bind_group,
                        workgroups: dispatch.workgroups,
                    });
                }
                PassCommand::Copy(copy) => prepared.push(Prepared::Copy {
                    src: pool.buffer(&copy.src)?,
                    dst: pool.buffer(&copy.dst)?,
                    bytes: copy.bytes,
                }),
            }
        }

        let mut report = FrameReport {
            buffers_created: pool.created(),
            pipelines_created: pipelines.created(),
            shader_modules: shaders.module_count(),
            ..FrameReport::default()
        };

        let mut encoder = context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame plan encoder"),
            });

        for command in &prepared {
            match command {
                Prepared::Draw {
                    pipeline,
                    bind_group,
                    vertex,
                    vertex_count,
                    clear,
                } => {
                    let view = target_view.as_ref().ok_or_else(|| {
                        Error::validation("draw encoded without an offscreen target")
                    })?;
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("render pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(*clear),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        occlusion_query_set: None,
                        timestamp_writes: None,
                    });
                    pass.set_pipeline(pipeline);
                    if let Some(bind_group) = bind_group {
                        pass.set_bind_group(0, bind_group, &[]);
                    }
                    pass.set_vertex_buffer(0, vertex.slice(..));
                    pass.draw(0..*vertex_count, 0..1);
                    drop(pass);
                    report.draws += 1;
                }
                Prepared::Dispatch {
                    pipeline,
                    bind_group,
                    workgroups,
                } => {
                    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                        label: Some("compute pass"),
                        timestamp_writes: None,
                    });
                    pass.set_pipeline(pipeline);
                    if let Some(bind_group) = bind_group {
                        pass.set_bind_group(0, bind_group, &[]);
                    }
                    pass.dispatch_workgroups(*workgroups, 1, 1);
                    drop(pass);
                    report.dispatches += 1;
                }
                Prepared::Copy { src, dst, bytes } => {
                    encoder.copy_buffer_to_buffer(src, 0, dst, 0, *bytes);
                    report.copies += 1;
                    report.bytes_copied += bytes;
                }
            }
        }

        context.queue().submit(std::iter::once(encoder.finish()));
        tracing::debug!(
            draws = report.draws,
            dispatches = report.dispatches,
            copies = report.copies,
            "submitted frame plan"
        );

        Ok(FrameOutput { report, target })
    }

    fn create_target(&self, context: &DeviceContext) -> Option<RenderTarget> {
        let spec = self.target.as_ref()?;
        let texture = context.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(&spec.label),
            size: wgpu::Extent3d {
                width: spec.width,
                height: spec.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: spec.format.to_wgpu(),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        Some(RenderTarget {
            texture,
            width: spec.width,
            height: spec.height,
            format: spec.format,
        })
    }
}

fn build_bind_group(
    context: &DeviceContext,
    pool: &BufferPool,
    bindings: &[String],
    layout_for: impl Fn(u32) -> wgpu::BindGroupLayout,
) -> Result<Option<wgpu::BindGroup>, Error> {
    if bindings.is_empty() {
        return Ok(None);
    }
    let buffers = bindings
        .iter()
        .map(|label| pool.buffer(label))
        .collect::<Result<Vec<_>, _>>()?;
    let entries: Vec<wgpu::BindGroupEntry> = buffers
        .iter()
        .enumerate()
        .map(|(index, buffer)| wgpu::BindGroupEntry {
            binding: index as u32,
            resource: buffer.as_entire_binding(),
        })
        .collect();
    let bind_group = context
        .device()
        .create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plan bind group"),
            layout: &layout_for(0),
            entries: &entries,
        });
    Ok(Some(bind_group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffers::{BufferLedger, BufferSpec};
    use crate::pipeline::VertexLayout;
    use crate::types::{Topology, VertexFormat};
    use std::path::PathBuf;

    fn quad_pipeline() -> RenderPipelineSpec {
        RenderPipelineSpec {
            label: "quad pipeline".into(),
            shader: PathBuf::from("shaders/mandelbrot.wgsl"),
            vertex_entry: "vertex_main".into(),
            fragment_entry: "fragment_main".into(),
            layout: VertexLayout::new(vec![VertexFormat::Float32x2]),
            target_format: TargetFormat::Rgba8UnormSrgb,
            topology: Topology::TriangleList,
        }
    }

    fn stream_pipeline() -> ComputePipelineSpec {
        ComputePipelineSpec {
            label: "stream pipeline".into(),
            shader: PathBuf::from("shaders/doubler.wgsl"),
            entry: "main".into(),
        }
    }

    fn quad_ledger() -> BufferLedger {
        let mut ledger = BufferLedger::new();
        ledger
            .record(&BufferSpec::new("quad vertices", BufferRole::Vertex, 48))
            .unwrap();
        ledger
            .record(&BufferSpec::new("grid uniform", BufferRole::Uniform, 16))
            .unwrap();
        ledger
    }

    fn stream_ledger() -> BufferLedger {
        let mut ledger = BufferLedger::new();
        ledger
            .record(&BufferSpec::new("stream", BufferRole::Storage, 4000))
            .unwrap();
        ledger
            .record(&BufferSpec::new("stream staging", BufferRole::Staging, 4000))
            .unwrap();
        ledger
    }

    fn quad_plan() -> FramePlan {
        let mut plan = FramePlan::new();
        plan.set_target(TargetSpec {
            label: "offscreen target".into(),
            width: 512,
            height: 512,
            format: TargetFormat::Rgba8UnormSrgb,
        });
        plan.draw(DrawSpec {
            pipeline: quad_pipeline(),
            vertex_buffer: "quad vertices".into(),
            bindings: vec!["grid uniform".into()],
            vertex_count: 6,
            clear: [0.0, 0.5, 1.0, 1.0],
        });
        plan
    }

    #[test]
    fn quad_plan_validates_and_records_one_draw_of_six_vertices() {
        let plan = quad_plan();
        plan.validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap();

        let draws: Vec<_> = plan
            .commands()
            .iter()
            .filter_map(|command| match command {
                PassCommand::Draw(draw) => Some(draw),
                _ => None,
            })
            .collect();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].vertex_count, 6);
    }

    #[test]
    fn stream_plan_validates_sixteen_workgroups_and_one_copy() {
        let workgroups = workgroups_for(1000, 64).unwrap();
        assert_eq!(workgroups, 16);

        let mut plan = FramePlan::new();
        plan.dispatch(DispatchSpec {
            pipeline: stream_pipeline(),
            bindings: vec!["stream".into()],
            workgroups,
        });
        plan.copy_to_staging("stream", "stream staging", 4000);
        plan.validate(&stream_ledger(), &wgpu::Limits::default())
            .unwrap();

        assert_eq!(plan.commands().len(), 2);
    }

    #[test]
    fn workgroup_math_rounds_up() {
        assert_eq!(workgroups_for(64, 64).unwrap(), 1);
        assert_eq!(workgroups_for(65, 64).unwrap(), 2);
        assert_eq!(workgroups_for(0, 64).unwrap(), 0);
        assert!(workgroups_for(1000, 0).is_err());
    }

    #[test]
    fn empty_plans_are_rejected() {
        let plan = FramePlan::new();
        let err = plan
            .validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap_err();
        assert!(err.to_string().contains("no work"));
    }

    #[test]
    fn draws_need_a_target() {
        let mut plan = FramePlan::new();
        plan.draw(DrawSpec {
            pipeline: quad_pipeline(),
            vertex_buffer: "quad vertices".into(),
            bindings: vec![],
            vertex_count: 6,
            clear: [0.0; 4],
        });
        let err = plan
            .validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap_err();
        assert!(err.to_string().contains("without an offscreen target"));
    }

    #[test]
    fn draws_reject_unknown_and_misrole_buffers() {
        let mut plan = quad_plan();
        plan.commands.clear();
        plan.draw(DrawSpec {
            pipeline: quad_pipeline(),
            vertex_buffer: "missing".into(),
            bindings: vec![],
            vertex_count: 6,
            clear: [0.0; 4],
        });
        let err = plan
            .validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap_err();
        assert!(err.to_string().contains("unknown buffer 'missing'"));

        plan.commands.clear();
        plan.draw(DrawSpec {
            pipeline: quad_pipeline(),
            vertex_buffer: "grid uniform".into(),
            bindings: vec![],
            vertex_count: 2,
            clear: [0.0; 4],
        });
        let err = plan
            .validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap_err();
        assert!(err.to_string().contains("not Vertex"));
    }

    #[test]
    fn overdraw_is_rejected() {
        let mut plan = quad_plan();
        plan.commands.clear();
        plan.draw(DrawSpec {
            pipeline: quad_pipeline(),
            vertex_buffer: "quad vertices".into(),
            bindings: vec![],
            // 48 bytes at stride 8 holds exactly 6 vertices.
            vertex_count: 7,
            clear: [0.0; 4],
        });
        let err = plan
            .validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap_err();
        assert!(err.to_string().contains("needs 56 bytes"));
    }

    #[test]
    fn copies_enforce_roles_alignment_and_bounds() {
        let limits = wgpu::Limits::default();

        let mut plan = FramePlan::new();
        plan.copy_to_staging("stream staging", "stream staging", 4000);
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("not copyable"));

        let mut plan = FramePlan::new();
        plan.copy_to_staging("stream", "stream", 4000);
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("not Staging"));

        let mut plan = FramePlan::new();
        plan.copy_to_staging("stream", "stream staging", 1001);
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("aligned"));

        let mut plan = FramePlan::new();
        plan.copy_to_staging("stream", "stream staging", 8000);
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn dispatches_reject_zero_and_oversized_workgroup_counts() {
        let limits = wgpu::Limits::default();

        let mut plan = FramePlan::new();
        plan.dispatch(DispatchSpec {
            pipeline: stream_pipeline(),
            bindings: vec!["stream".into()],
            workgroups: 0,
        });
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("zero workgroups"));

        let mut plan = FramePlan::new();
        plan.dispatch(DispatchSpec {
            pipeline: stream_pipeline(),
            bindings: vec!["stream".into()],
            workgroups: limits.max_compute_workgroups_per_dimension + 1,
        });
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("exceeds the device cap"));
    }

    #[test]
    fn bindings_must_exist_and_be_bindable() {
        let limits = wgpu::Limits::default();

        let mut plan = FramePlan::new();
        plan.dispatch(DispatchSpec {
            pipeline: stream_pipeline(),
            bindings: vec!["missing".into()],
            workgroups: 1,
        });
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("unknown buffer 'missing'"));

        let mut plan = FramePlan::new();
        plan.dispatch(DispatchSpec {
            pipeline: stream_pipeline(),
            bindings: vec!["stream staging".into()],
            workgroups: 1,
        });
        let err = plan.validate(&stream_ledger(), &limits).unwrap_err();
        assert!(err.to_string().contains("cannot be bound"));
    }

    #[test]
    fn mismatched_target_formats_are_rejected() {
        let mut plan = FramePlan::new();
        plan.set_target(TargetSpec {
            label: "offscreen target".into(),
            width: 512,
            height: 512,
            format: TargetFormat::Rgba8Unorm,
        });
        plan.draw(DrawSpec {
            pipeline: quad_pipeline(),
            vertex_buffer: "quad vertices".into(),
            bindings: vec![],
            vertex_count: 6,
            clear: [0.0; 4],
        });
        let err = plan
            .validate(&quad_ledger(), &wgpu::Limits::default())
            .unwrap_err();
        assert!(err.to_string().contains("targets"));
    }
}
