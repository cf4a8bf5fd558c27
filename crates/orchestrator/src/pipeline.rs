use std::collections::HashMap;
use std::path::PathBuf;

use crate::context::DeviceContext;
use crate::error::Error;
use crate::shader::ShaderCatalog;
use crate::types::{TargetFormat, Topology, VertexFormat};

/// Vertex attribute layout described as data.
///
/// Offsets and the array stride are computed from the format list in
/// declaration order; shader locations follow the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    formats: Vec<VertexFormat>,
}

impl VertexLayout {
    pub fn new(formats: impl Into<Vec<VertexFormat>>) -> Self {
        Self {
            formats: formats.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Bytes consumed per vertex.
    pub fn array_stride(&self) -> u64 {
        self.formats.iter().map(|format| format.size()).sum()
    }

    pub(crate) fn attributes(&self) -> Vec<wgpu::VertexAttribute> {
        let mut offset = 0;
        self.formats
            .iter()
            .enumerate()
            .map(|(index, format)| {
                let attribute = wgpu::VertexAttribute {
                    format: format.to_wgpu(),
                    offset,
                    shader_location: index as u32,
                };
                offset += format.size();
                attribute
            })
            .collect()
    }

    fn signature(&self) -> Vec<VertexFormat> {
        self.formats.clone()
    }
}

/// Everything that affects render pipeline compilation.
#[derive(Debug, Clone)]
pub struct RenderPipelineSpec {
    pub label: String,
    pub shader: PathBuf,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub layout: VertexLayout,
    pub target_format: TargetFormat,
    pub topology: Topology,
}

/// Everything that affects compute pipeline compilation.
#[derive(Debug, Clone)]
pub struct ComputePipelineSpec {
    pub label: String,
    pub shader: PathBuf,
    pub entry: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PipelineKey {
    Render {
        shader: PathBuf,
        vertex_entry: String,
        fragment_entry: String,
        signature: Vec<VertexFormat>,
        target_format: TargetFormat,
        topology: Topology,
    },
    Compute {
        shader: PathBuf,
        entry: String,
    },
}

impl PipelineKey {
    fn render(spec: &RenderPipelineSpec) -> Self {
        PipelineKey::Render {
            shader: spec.shader.clone(),
            vertex_entry: spec.vertex_entry.clone(),
            fragment_entry: spec.fragment_entry.clone(),
            signature: spec.layout.signature(),
            target_format: spec.target_format,
            topology: spec.topology,
        }
    }

    fn compute(spec: &ComputePipelineSpec) -> Self {
        PipelineKey::Compute {
            shader: spec.shader.clone(),
            entry: spec.entry.clone(),
        }
    }
}

enum PipelineHandle {
    Render(wgpu::RenderPipeline),
    Compute(wgpu::ComputePipeline),
}

/// Builds pipelines on demand and hands back cached handles for specs that
/// were already compiled this run.
#[derive(Default)]
pub struct PipelineCache {
    entries: HashMap<PipelineKey, PipelineHandle>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pipelines compiled so far.
    pub fn created(&self) -> usize {
        self.entries.len()
    }

    pub fn render_pipeline(
        &mut self,
        context: &DeviceContext,
        shaders: &mut ShaderCatalog,
        spec: &RenderPipelineSpec,
    ) -> Result<wgpu::RenderPipeline, Error> {
        let key = PipelineKey::render(spec);
        if let Some(PipelineHandle::Render(pipeline)) = self.entries.get(&key) {
            return Ok(pipeline.clone());
        }

        let module = shaders.load(context, &spec.shader)?;
        let attributes = spec.layout.attributes();
        let buffers = if spec.layout.is_empty() {
            vec![]
        } else {
            vec![wgpu::VertexBufferLayout {
                array_stride: spec.layout.array_stride(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &attributes,
            }]
        };

        let pipeline = context
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&spec.label),
                layout: None,
                vertex: wgpu::VertexState {
                    module: &module,
                    entry_point: Some(spec.vertex_entry.as_str()),
                    buffers: &buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: spec.topology.to_wgpu(),
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &module,
                    entry_point: Some(spec.fragment_entry.as_str()),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: spec.target_format.to_wgpu(),
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview: None,
                cache: None,
            });

        tracing::debug!(label = %spec.label, shader = %spec.shader.display(), "built render pipeline");
        self.entries
            .insert(key, PipelineHandle::Render(pipeline.clone()));
        Ok(pipeline)
    }

    pub fn compute_pipeline(
        &mut self,
        context: &DeviceContext,
        shaders: &mut ShaderCatalog,
        spec: &ComputePipelineSpec,
    ) -> Result<wgpu::ComputePipeline, Error> {
        let key = PipelineKey::compute(spec);
        if let Some(PipelineHandle::Compute(pipeline)) = self.entries.get(&key) {
            return Ok(pipeline.clone());
        }

        let module = shaders.load(context, &spec.shader)?;
        let pipeline = context
            .device()
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&spec.label),
                layout: None,
                module: &module,
                entry_point: Some(spec.entry.as_str()),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

        tracing::debug!(label = %spec.label, shader = %spec.shader.display(), "built compute pipeline");
        self.entries
            .insert(key, PipelineHandle::Compute(pipeline.clone()));
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_vec2_layout_matches_the_quad() {
        // The quad demo: one float32x2 position per vertex, stride 8.
        let layout = VertexLayout::new(vec![VertexFormat::Float32x2]);
        assert_eq!(layout.array_stride(), 8);
        let attributes = layout.attributes();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[0].shader_location, 0);
        assert_eq!(attributes[0].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn mixed_layout_accumulates_offsets() {
        let layout = VertexLayout::new(vec![VertexFormat::Float32x3, VertexFormat::Float32x2]);
        assert_eq!(layout.array_stride(), 20);
        let attributes = layout.attributes();
        assert_eq!(attributes[0].offset, 0);
        assert_eq!(attributes[1].offset, 12);
        assert_eq!(attributes[1].shader_location, 1);
    }

    #[test]
    fn render_keys_distinguish_layout_and_format() {
        let base = RenderPipelineSpec {
            label: "quad pipeline".into(),
            shader: PathBuf::from("shaders/mandelbrot.wgsl"),
            vertex_entry: "vertex_main".into(),
            fragment_entry: "fragment_main".into(),
            layout: VertexLayout::new(vec![VertexFormat::Float32x2]),
            target_format: TargetFormat::Rgba8UnormSrgb,
            topology: Topology::TriangleList,
        };
        let mut other = base.clone();
        other.target_format = TargetFormat::Rgba8Unorm;
        assert_eq!(PipelineKey::render(&base), PipelineKey::render(&base));
        assert_ne!(PipelineKey::render(&base), PipelineKey::render(&other));
    }
}
