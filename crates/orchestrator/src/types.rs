use std::fmt;

/// Adapter power preference requested when picking a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerPreference {
    /// Prefer the battery-friendly adapter (integrated GPU where present).
    #[default]
    Low,
    /// Prefer the fastest adapter the instance can offer.
    High,
}

/// Memory strategy hint forwarded to device creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryMode {
    #[default]
    Balanced,
    Performance,
}

/// Immutable options handed to [`crate::DeviceContext::new`].
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub power: PowerPreference,
    pub memory: MemoryMode,
    /// Ask the instance for its fallback (software) adapter even when
    /// hardware adapters exist.
    pub force_fallback_adapter: bool,
}

/// Identity of the adapter a context ended up with, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct AdapterProfile {
    pub name: String,
    pub backend: wgpu::Backend,
    pub device_type: wgpu::DeviceType,
}

impl AdapterProfile {
    pub(crate) fn from_wgpu(info: &wgpu::AdapterInfo) -> Self {
        Self {
            name: info.name.clone(),
            backend: info.backend,
            device_type: info.device_type,
        }
    }

    /// True when the selected adapter rasterises on the CPU.
    pub fn is_software(&self) -> bool {
        let name = self.name.to_ascii_lowercase();
        matches!(self.device_type, wgpu::DeviceType::Cpu)
            || name.contains("llvmpipe")
            || name.contains("swiftshader")
    }
}

impl fmt::Display for AdapterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:?}, {:?})",
            self.name, self.backend, self.device_type
        )
    }
}

/// Color target formats the layer can render into and read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetFormat {
    /// 8-bit RGBA, sRGB-encoded on store. The default for image export.
    #[default]
    Rgba8UnormSrgb,
    /// 8-bit RGBA, linear.
    Rgba8Unorm,
}

impl TargetFormat {
    pub(crate) fn to_wgpu(self) -> wgpu::TextureFormat {
        match self {
            TargetFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            TargetFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    pub const fn bytes_per_pixel(self) -> u32 {
        4
    }
}

/// Per-vertex attribute formats supported by [`crate::VertexLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub const fn size(self) -> u64 {
        match self {
            VertexFormat::Float32 => 4,
            VertexFormat::Float32x2 => 8,
            VertexFormat::Float32x3 => 12,
            VertexFormat::Float32x4 => 16,
        }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::VertexFormat {
        match self {
            VertexFormat::Float32 => wgpu::VertexFormat::Float32,
            VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            VertexFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            VertexFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// Primitive assembly for render pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    #[default]
    TriangleList,
    TriangleStrip,
}

impl Topology {
    pub(crate) fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}
