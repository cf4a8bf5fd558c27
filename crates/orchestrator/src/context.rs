use crate::error::Error;
use crate::types::{AdapterProfile, ContextOptions, MemoryMode, PowerPreference};

/// Owns the wgpu instance/device/queue wiring for a headless run.
///
/// There is no surface here: targets are offscreen textures and results leave
/// through staging buffers, so the context never touches a window system.
pub struct DeviceContext {
    _instance: wgpu::Instance,
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_profile: AdapterProfile,
    limits: wgpu::Limits,
}

impl DeviceContext {
    /// Acquires instance, adapter, and device in sequence.
    ///
    /// Both acquisition steps are terminal on failure: an environment without
    /// a usable adapter yields [`Error::Unsupported`], an adapter that will
    /// not hand out a device yields [`Error::DeviceUnavailable`]. Neither is
    /// retried.
    pub fn new(options: &ContextOptions) -> Result<Self, Error> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let power_preference = match options.power {
            PowerPreference::Low => wgpu::PowerPreference::LowPower,
            PowerPreference::High => wgpu::PowerPreference::HighPerformance,
        };
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: None,
            force_fallback_adapter: options.force_fallback_adapter,
        }))
        .map_err(Error::Unsupported)?;

        let adapter_info = adapter.get_info();
        let limits = adapter.limits();
        let adapter_profile = AdapterProfile::from_wgpu(&adapter_info);
        if adapter_profile.is_software() {
            tracing::warn!(
                name = %adapter_profile.name,
                "software rasterizer selected; expect low throughput"
            );
        }
        tracing::debug!(
            name = %adapter_profile.name,
            backend = ?adapter_profile.backend,
            device_type = ?adapter_profile.device_type,
            "selected GPU adapter"
        );

        let memory_hints = match options.memory {
            MemoryMode::Balanced => wgpu::MemoryHints::MemoryUsage,
            MemoryMode::Performance => wgpu::MemoryHints::Performance,
        };
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("passrun device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints,
            trace: wgpu::Trace::default(),
        }))
        .map_err(Error::DeviceUnavailable)?;

        Ok(Self {
            _instance: instance,
            device,
            queue,
            adapter_profile,
            limits,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_profile(&self) -> &AdapterProfile {
        &self.adapter_profile
    }

    /// Limits of the adapter backing this device, used by plan validation.
    pub fn limits(&self) -> &wgpu::Limits {
        &self.limits
    }
}
