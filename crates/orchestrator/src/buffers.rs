use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::context::DeviceContext;
use crate::error::Error;

/// Usage class of a pool buffer.
///
/// Roles pick the exact `wgpu::BufferUsages` union and drive pass validation:
/// a draw may only read vertex-role buffers, a copy may only land in a
/// staging-role buffer, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferRole {
    Vertex,
    Uniform,
    Storage,
    /// Host-readable buffer used solely to retrieve device-written results.
    Staging,
}

impl BufferRole {
    pub fn usages(self) -> wgpu::BufferUsages {
        match self {
            BufferRole::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferRole::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            BufferRole::Storage => {
                wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC
            }
            BufferRole::Staging => wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        }
    }

    /// Alignment the role's size is padded to at creation.
    ///
    /// Uniform blocks round up to 16 so std140-style layouts always fit;
    /// anything that participates in copies or mapping rounds to the 4-byte
    /// copy alignment; vertex data keeps its exact length so overdraw checks
    /// stay tight.
    fn size_alignment(self) -> u64 {
        match self {
            BufferRole::Vertex => 1,
            BufferRole::Uniform => 16,
            BufferRole::Storage | BufferRole::Staging => wgpu::COPY_BUFFER_ALIGNMENT,
        }
    }
}

/// Description of a buffer to create in the pool.
#[derive(Debug, Clone)]
pub struct BufferSpec {
    pub label: String,
    pub role: BufferRole,
    pub size: u64,
}

impl BufferSpec {
    pub fn new(label: impl Into<String>, role: BufferRole, size: u64) -> Self {
        Self {
            label: label.into(),
            role,
            size,
        }
    }

    /// Size after role-specific padding; this is what the ledger records.
    pub fn padded_size(&self) -> u64 {
        align_to(self.size, self.role.size_alignment())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub role: BufferRole,
    pub size: u64,
}

/// Pure-data registry of buffer descriptions.
///
/// The pool mirrors it on the device side; plan validation runs entirely
/// against this view, which is why plans can be checked without a GPU.
#[derive(Debug, Clone, Default)]
pub struct BufferLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl BufferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a spec, rejecting empty labels, duplicates, and zero sizes.
    pub fn record(&mut self, spec: &BufferSpec) -> Result<(), Error> {
        if spec.label.is_empty() {
            return Err(Error::validation("buffer label must not be empty"));
        }
        if spec.size == 0 {
            return Err(Error::validation(format!(
                "buffer '{}' has zero size",
                spec.label
            )));
        }
        if self.entries.contains_key(&spec.label) {
            return Err(Error::validation(format!(
                "buffer '{}' is already registered",
                spec.label
            )));
        }
        self.entries.insert(
            spec.label.clone(),
            LedgerEntry {
                role: spec.role,
                size: spec.padded_size(),
            },
        );
        Ok(())
    }

    pub fn entry(&self, label: &str) -> Option<LedgerEntry> {
        self.entries.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many registered buffers carry the given role.
    pub fn role_count(&self, role: BufferRole) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.role == role)
            .count()
    }
}

struct PoolEntry {
    buffer: wgpu::Buffer,
}

/// Owns every buffer created for a run, keyed by label.
///
/// Creation goes through the ledger first, so the data-side registry and the
/// device-side pool can never disagree about what exists.
#[derive(Default)]
pub struct BufferPool {
    ledger: BufferLedger,
    entries: HashMap<String, PoolEntry>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &BufferLedger {
        &self.ledger
    }

    /// Number of buffers created on the device.
    pub fn created(&self) -> usize {
        self.entries.len()
    }

    /// Creates an uninitialised buffer described by `spec`.
    pub fn create(&mut self, context: &DeviceContext, spec: BufferSpec) -> Result<(), Error> {
        self.check_device_limit(context, &spec)?;
        self.ledger.record(&spec)?;
        let buffer = context.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(&spec.label),
            size: spec.padded_size(),
            usage: spec.role.usages(),
            mapped_at_creation: false,
        });
        tracing::debug!(label = %spec.label, role = ?spec.role, size = spec.padded_size(), "created buffer");
        self.entries.insert(spec.label, PoolEntry { buffer });
        Ok(())
    }

    /// Creates a buffer and uploads `contents` in one step.
    pub fn create_init(
        &mut self,
        context: &DeviceContext,
        label: impl Into<String>,
        role: BufferRole,
        contents: &[u8],
    ) -> Result<(), Error> {
        let spec = BufferSpec::new(label, role, contents.len() as u64);
        self.check_device_limit(context, &spec)?;
        self.ledger.record(&spec)?;
        let buffer = context
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&spec.label),
                contents,
                usage: role.usages(),
            });
        tracing::debug!(label = %spec.label, role = ?role, size = contents.len(), "created buffer with contents");
        self.entries.insert(spec.label, PoolEntry { buffer });
        Ok(())
    }

    /// Uploads `contents` into an existing buffer from offset zero.
    pub fn write(
        &self,
        context: &DeviceContext,
        label: &str,
        contents: &[u8],
    ) -> Result<(), Error> {
        let entry = self.ledger.entry(label).ok_or_else(|| {
            Error::validation(format!("write targets unknown buffer '{label}'"))
        })?;
        let len = contents.len() as u64;
        if len > entry.size {
            return Err(Error::validation(format!(
                "write of {len} bytes overflows buffer '{label}' ({} bytes)",
                entry.size
            )));
        }
        if len % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
            return Err(Error::validation(format!(
                "write of {len} bytes to '{label}' is not {}-byte aligned",
                wgpu::COPY_BUFFER_ALIGNMENT
            )));
        }
        let buffer = self.buffer(label)?;
        context.queue().write_buffer(&buffer, 0, contents);
        Ok(())
    }

    /// Clones out the handle for `label` (wgpu buffers are reference counted).
    pub fn buffer(&self, label: &str) -> Result<wgpu::Buffer, Error> {
        self.entries
            .get(label)
            .map(|entry| entry.buffer.clone())
            .ok_or_else(|| Error::validation(format!("unknown buffer '{label}'")))
    }

    fn check_device_limit(&self, context: &DeviceContext, spec: &BufferSpec) -> Result<(), Error> {
        let max = context.limits().max_buffer_size;
        if spec.padded_size() > max {
            return Err(Error::validation(format!(
                "buffer '{}' wants {} bytes but the device caps buffers at {max}",
                spec.label,
                spec.padded_size()
            )));
        }
        Ok(())
    }
}

/// Rounds `value` up to the next multiple of `alignment`.
pub fn align_to(value: u64, alignment: u64) -> u64 {
    debug_assert!(alignment > 0);
    value.div_ceil(alignment) * alignment
}

/// Bytes per row a texture readback must use: the tight row size rounded up
/// to `wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`.
pub fn padded_bytes_per_row(width: u32, bytes_per_pixel: u32) -> u32 {
    let tight = width * bytes_per_pixel;
    let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    tight.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_to_rounds_up() {
        assert_eq!(align_to(0, 4), 0);
        assert_eq!(align_to(1, 4), 4);
        assert_eq!(align_to(4, 4), 4);
        assert_eq!(align_to(1000, 4), 1000);
        assert_eq!(align_to(1001, 4), 1004);
        assert_eq!(align_to(8, 16), 16);
    }

    #[test]
    fn padded_rows_hit_the_256_byte_alignment() {
        // 512 px of RGBA is already aligned; 100 px is not.
        assert_eq!(padded_bytes_per_row(512, 4), 2048);
        assert_eq!(padded_bytes_per_row(100, 4), 512);
        assert_eq!(padded_bytes_per_row(64, 4), 256);
        assert_eq!(padded_bytes_per_row(65, 4), 512);
    }

    #[test]
    fn uniform_specs_pad_to_sixteen_bytes() {
        let spec = BufferSpec::new("grid uniform", BufferRole::Uniform, 8);
        assert_eq!(spec.padded_size(), 16);
    }

    #[test]
    fn staging_specs_keep_copy_alignment() {
        // A 1000-byte staging target is already 4-aligned and stays put.
        assert_eq!(
            BufferSpec::new("s", BufferRole::Staging, 1000).padded_size(),
            1000
        );
        assert_eq!(
            BufferSpec::new("s", BufferRole::Staging, 1001).padded_size(),
            1004
        );
    }

    #[test]
    fn vertex_specs_keep_their_exact_length() {
        let spec = BufferSpec::new("quad vertices", BufferRole::Vertex, 48);
        assert_eq!(spec.padded_size(), 48);
    }

    #[test]
    fn ledger_rejects_duplicates_and_zero_sizes() {
        let mut ledger = BufferLedger::new();
        ledger
            .record(&BufferSpec::new("quad vertices", BufferRole::Vertex, 48))
            .unwrap();

        let duplicate = ledger
            .record(&BufferSpec::new("quad vertices", BufferRole::Vertex, 48))
            .unwrap_err();
        assert!(duplicate.to_string().contains("already registered"));

        let empty = ledger
            .record(&BufferSpec::new("empty", BufferRole::Storage, 0))
            .unwrap_err();
        assert!(empty.to_string().contains("zero size"));
    }

    #[test]
    fn ledger_counts_roles() {
        let mut ledger = BufferLedger::new();
        ledger
            .record(&BufferSpec::new("quad vertices", BufferRole::Vertex, 48))
            .unwrap();
        ledger
            .record(&BufferSpec::new("grid uniform", BufferRole::Uniform, 16))
            .unwrap();
        assert_eq!(ledger.role_count(BufferRole::Vertex), 1);
        assert_eq!(ledger.role_count(BufferRole::Uniform), 1);
        assert_eq!(ledger.role_count(BufferRole::Staging), 0);
        assert_eq!(ledger.len(), 2);
    }
}
