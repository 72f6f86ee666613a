//! GPU buffer management for fixed-degree graph data
//!
//! Uploads the CSR components (`vertex_offsets`, `edge_array`, `weight_array`)
//! once per graph and reads result buffers back through a staging buffer.

use super::GpuDevice;
use crate::storage::FixedDegreeGraph;
use anyhow::{Context, Result};

/// Round `global_size` up to the next multiple of `group_size`
///
/// A `group_size` of zero is treated as one.
#[must_use]
pub const fn round_work_size_up(group_size: u32, global_size: u32) -> u32 {
    let group_size = if group_size == 0 { 1 } else { group_size };
    let remainder = global_size % group_size;
    if remainder == 0 {
        global_size
    } else {
        global_size - remainder + group_size
    }
}

/// Read-only graph buffers resident on the device
///
/// Empty edge arrays are padded to a single element because zero-sized
/// storage bindings are invalid.
#[derive(Debug)]
pub struct GpuGraphBuffers {
    /// Number of vertices in the graph
    pub num_vertices: usize,

    /// Number of edges in the graph
    pub num_edges: usize,

    /// CSR offsets (size: `num_vertices` + 1)
    pub vertex_offsets: wgpu::Buffer,

    /// Edge targets (size: `max(num_edges, 1)`)
    pub edge_array: wgpu::Buffer,

    /// Edge weights (size: `max(num_edges, 1)`)
    pub weight_array: wgpu::Buffer,
}

impl GpuGraphBuffers {
    /// Upload a graph to the device
    ///
    /// # Errors
    ///
    /// Returns error if any buffer exceeds the device limits
    pub fn upload(device: &GpuDevice, graph: &FixedDegreeGraph) -> Result<Self> {
        let (offsets, targets, weights) = graph.csr_components();
        let usage =
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC;

        let vertex_offsets =
            device.create_buffer_init("SSSP vertex_offsets", bytemuck::cast_slice(offsets), usage)?;

        let edge_array = if targets.is_empty() {
            device.create_buffer_init("SSSP edge_array", bytemuck::bytes_of(&0u32), usage)?
        } else {
            device.create_buffer_init("SSSP edge_array", bytemuck::cast_slice(targets), usage)?
        };

        let weight_array = if weights.is_empty() {
            device.create_buffer_init("SSSP weight_array", bytemuck::bytes_of(&0f32), usage)?
        } else {
            device.create_buffer_init("SSSP weight_array", bytemuck::cast_slice(weights), usage)?
        };

        Ok(Self {
            num_vertices: graph.num_vertices(),
            num_edges: graph.num_edges(),
            vertex_offsets,
            edge_array,
            weight_array,
        })
    }

    /// Get number of vertices
    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Get number of edges
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.num_edges
    }
}

/// Copy `len` elements of `buffer` into host memory
pub(crate) async fn read_back<T: bytemuck::Pod>(
    device: &GpuDevice,
    buffer: &wgpu::Buffer,
    len: usize,
) -> Result<Vec<T>> {
    let size = (len * std::mem::size_of::<T>()) as u64;
    let staging_buffer = device.create_buffer(
        "SSSP Staging",
        size,
        wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
    )?;

    let mut encoder = device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("SSSP Readback Encoder"),
        });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging_buffer, 0, size);
    device.queue().submit(Some(encoder.finish()));

    let buffer_slice = staging_buffer.slice(..);
    let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();

    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    device.device().poll(wgpu::Maintain::Wait);
    rx.receive()
        .await
        .context("Failed to receive map result")?
        .context("Buffer mapping failed")?;

    let data = buffer_slice.get_mapped_range();
    let values: Vec<T> = bytemuck::cast_slice(&data).to_vec();
    drop(data);
    staging_buffer.unmap();

    Ok(values)
}
