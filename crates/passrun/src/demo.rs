//! Hardcoded demo scenes the two subcommands feed into the orchestrator.

use bytemuck::{Pod, Zeroable};

/// Fullscreen quad: two counter-clockwise triangles in clip space, one
/// float32x2 position per vertex.
pub const QUAD_VERTICES: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, // lower-right triangle
    -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, // upper-left triangle
];

pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Grid divisions uniform, padded out to a 16-byte block.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GridUniform {
    grid: [f32; 2],
    _pad: [f32; 2],
}

impl GridUniform {
    pub fn new(divisions: u32) -> Self {
        Self {
            grid: [divisions as f32, divisions as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Sequential seed data for the compute stream.
pub fn stream_input(elements: u32) -> Vec<u32> {
    (0..elements).collect()
}
