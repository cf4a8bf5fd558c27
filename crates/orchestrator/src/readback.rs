use std::sync::mpsc;

use crate::buffers::{padded_bytes_per_row, BufferPool, BufferRole};
use crate::context::DeviceContext;
use crate::error::Error;
use crate::pass::RenderTarget;

/// Maps the first `bytes` of a staging buffer and copies them out.
///
/// The map completion callback hands its result over an mpsc channel while a
/// blocking poll drives the device, so the call returns only once the
/// mapping has actually resolved.
pub fn read_staging(
    context: &DeviceContext,
    pool: &BufferPool,
    label: &str,
    bytes: u64,
) -> Result<Vec<u8>, Error> {
    let entry = pool
        .ledger()
        .entry(label)
        .ok_or_else(|| Error::validation(format!("readback targets unknown buffer '{label}'")))?;
    if entry.role != BufferRole::Staging {
        return Err(Error::validation(format!(
            "readback targets '{label}' which has role {:?}, not Staging",
            entry.role
        )));
    }
    if bytes == 0 || bytes > entry.size {
        return Err(Error::validation(format!(
            "readback of {bytes} bytes does not fit buffer '{label}' ({} bytes)",
            entry.size
        )));
    }
    if bytes % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(Error::validation(format!(
            "readback of {bytes} bytes is not {}-byte aligned",
            wgpu::COPY_BUFFER_ALIGNMENT
        )));
    }

    let buffer = pool.buffer(label)?;
    let slice = buffer.slice(..bytes);
    block_on_map(context, &slice)?;
    let data = slice.get_mapped_range();
    let contents = data.to_vec();
    drop(data);
    buffer.unmap();
    Ok(contents)
}

/// Typed convenience over [`read_staging`] for Pod element types.
pub fn read_staging_as<T: bytemuck::Pod>(
    context: &DeviceContext,
    pool: &BufferPool,
    label: &str,
    bytes: u64,
) -> Result<Vec<T>, Error> {
    let raw = read_staging(context, pool, label, bytes)?;
    let element = std::mem::size_of::<T>();
    if element == 0 || raw.len() % element != 0 {
        return Err(Error::validation(format!(
            "readback of {} bytes does not divide into {element}-byte elements",
            raw.len()
        )));
    }
    Ok(bytemuck::pod_collect_to_vec(&raw))
}

/// Copies a rendered target through a temporary staging buffer and returns
/// tightly packed pixels with the per-row padding stripped.
pub fn read_target(context: &DeviceContext, target: &RenderTarget) -> Result<Vec<u8>, Error> {
    let bytes_per_pixel = target.format.bytes_per_pixel();
    let padded_row = padded_bytes_per_row(target.width, bytes_per_pixel);
    let staging_size = u64::from(padded_row) * u64::from(target.height);

    let staging = context.device().create_buffer(&wgpu::BufferDescriptor {
        label: Some("target readback"),
        size: staging_size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = context
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("target readback encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target.texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &staging,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(target.height),
            },
        },
        wgpu::Extent3d {
            width: target.width,
            height: target.height,
            depth_or_array_layers: 1,
        },
    );
    context.queue().submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..);
    block_on_map(context, &slice)?;
    let data = slice.get_mapped_range();
    let pixels = strip_row_padding(
        &data,
        target.width,
        target.height,
        bytes_per_pixel,
        padded_row,
    );
    drop(data);
    staging.unmap();
    Ok(pixels)
}

fn block_on_map(context: &DeviceContext, slice: &wgpu::BufferSlice<'_>) -> Result<(), Error> {
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    context
        .device()
        .poll(wgpu::PollType::Wait)
        .map_err(Error::Poll)?;
    rx.recv()
        .map_err(|_| Error::ReadbackChannel)?
        .map_err(Error::Readback)
}

fn strip_row_padding(
    data: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    padded_row: u32,
) -> Vec<u8> {
    let tight_row = (width * bytes_per_pixel) as usize;
    let padded_row = padded_row as usize;
    let mut pixels = Vec::with_capacity(tight_row * height as usize);
    for row in 0..height as usize {
        let start = row * padded_row;
        pixels.extend_from_slice(&data[start..start + tight_row]);
    }
    pixels
}
