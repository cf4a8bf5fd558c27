//! Headless GPU resource and pass orchestration on top of wgpu.
//!
//! The crate keeps the path from data to submitted work small and checkable:
//! - `context` owns wgpu instance/device/queue wiring for surface-free runs
//!   and classifies the two terminal acquisition failures.
//! - `shader` reads WGSL from disk and caches one module per source file.
//! - `buffers` pairs a pure-data ledger (labels, roles, padded sizes) with
//!   the device-side pool that mirrors it.
//! - `pipeline` turns declarative render/compute specs into pipelines,
//!   cached by everything that affects compilation.
//! - `pass` records draws, dispatches, and staging copies as a `FramePlan`,
//!   validates the plan against the ledger and device limits, then encodes
//!   and submits it in one go.
//! - `readback` maps staging buffers and offscreen targets back to the host,
//!   stripping row padding on the way out.
//!
//! Plans and ledgers are plain data, so everything up to the encode step can
//! be exercised without a GPU.

pub mod buffers;
pub mod context;
pub mod error;
pub mod pass;
pub mod pipeline;
pub mod readback;
pub mod shader;
pub mod types;

pub use buffers::{align_to, padded_bytes_per_row, BufferLedger, BufferPool, BufferRole, BufferSpec};
pub use context::DeviceContext;
pub use error::Error;
pub use pass::{
    workgroups_for, CopySpec, DispatchSpec, DrawSpec, FrameOutput, FramePlan, FrameReport,
    PassCommand, RenderTarget, TargetSpec,
};
pub use pipeline::{ComputePipelineSpec, PipelineCache, RenderPipelineSpec, VertexLayout};
pub use readback::{read_staging, read_staging_as, read_target};
pub use shader::ShaderCatalog;
pub use types::{
    AdapterProfile, ContextOptions, MemoryMode, PowerPreference, TargetFormat, Topology,
    VertexFormat,
};
