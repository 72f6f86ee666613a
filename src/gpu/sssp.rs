//! GPU bulk-synchronous SSSP
//!
//! Host-driven superstep loop over the `relax`/`commit` kernels. Each burst
//! records [`OffloadConfig::superstep_burst`] dispatch pairs into one compute
//! pass, submits it, and reads the active mask back to decide whether to go
//! on. Supersteps after convergence within a burst are no-ops.

use super::buffer::{read_back, round_work_size_up};
use super::kernels::WORKGROUP_SIZE;
use super::{GpuDevice, GpuDeviceError, GpuGraphBuffers, SsspKernels};
use crate::config::OffloadConfig;
use crate::storage::GraphError;
use crate::NodeId;
use anyhow::Result;
use log::{debug, trace};

/// Device-side distance of a vertex that has not been reached
const UNREACHED: f32 = f32::MAX;

/// Kernel parameters (uniform)
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SsspParams {
    num_vertices: u32,
    num_edges: u32,
    _padding: [u32; 2],
}

/// GPU SSSP result
#[derive(Debug, Clone, PartialEq)]
pub struct GpuSsspResult {
    /// Distance per vertex (`f32::INFINITY` when unreachable)
    pub distances: Vec<f32>,

    /// Supersteps dispatched, including the no-op tail of the last burst
    pub supersteps: usize,

    /// Host readbacks of the active mask
    pub bursts: usize,
}

impl GpuSsspResult {
    /// Get distance to a specific vertex
    #[must_use]
    pub fn distance(&self, node: NodeId) -> Option<f32> {
        self.distances
            .get(node.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    /// Check if vertex is reachable from source
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.distance(node).is_some()
    }
}

/// Run bulk-synchronous SSSP on the device from `source`
///
/// # Errors
///
/// Returns error if:
/// - `source` is not a vertex of the uploaded graph
/// - the dispatch needs more workgroups than the device allows
/// - work buffers cannot be allocated
/// - result readback fails
///
/// # Example
///
/// ```ignore
/// # use degree_sssp::gpu::{gpu_sssp, GpuDevice, GpuGraphBuffers, SsspKernels};
/// # use degree_sssp::{FixedDegreeGraph, NodeId, OffloadConfig};
/// let device = GpuDevice::new().await?;
/// let kernels = SsspKernels::compile(&device).await?;
/// let graph = FixedDegreeGraph::generate(1000, 8, 42)?;
/// let buffers = GpuGraphBuffers::upload(&device, &graph)?;
///
/// let result = gpu_sssp(&device, &kernels, &buffers, NodeId(0), &OffloadConfig::default()).await?;
/// assert_eq!(result.distance(NodeId(0)), Some(0.0));
/// ```
#[allow(clippy::too_many_lines)]
#[allow(clippy::cast_possible_truncation)]
pub async fn gpu_sssp(
    device: &GpuDevice,
    kernels: &SsspKernels,
    buffers: &GpuGraphBuffers,
    source: NodeId,
    config: &OffloadConfig,
) -> Result<GpuSsspResult> {
    let num_vertices = buffers.num_vertices();
    if source.index() >= num_vertices {
        return Err(GraphError::VertexOutOfBounds {
            vertex: source.0,
            num_vertices,
        }
        .into());
    }

    // Vertex count fits u32: the graph constructors reject anything larger
    let n = num_vertices as u32;
    let num_workgroups = round_work_size_up(WORKGROUP_SIZE, n) / WORKGROUP_SIZE;
    let limit = device.limits().max_compute_workgroups_per_dimension;
    if num_workgroups > limit {
        return Err(GpuDeviceError::DispatchTooLarge {
            workgroups: num_workgroups,
            limit,
        }
        .into());
    }

    let burst = config.superstep_burst.max(1);
    debug!(
        "gpu sssp: {num_vertices} vertices from source {} on {}, {num_workgroups} workgroups, burst {burst}",
        source.0,
        device.info().name
    );

    // Work buffers
    let mut initial_distances = vec![UNREACHED; num_vertices];
    initial_distances[source.index()] = 0.0;
    let mut initial_active = vec![0u32; num_vertices];
    initial_active[source.index()] = 1;

    device.device().push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let params_buffer = device.create_buffer_init(
        "SSSP Params",
        bytemuck::bytes_of(&SsspParams {
            num_vertices: n,
            num_edges: buffers.num_edges() as u32,
            _padding: [0; 2],
        }),
        wgpu::BufferUsages::UNIFORM,
    );
    let active_buffer = device.create_buffer_init(
        "SSSP active",
        bytemuck::cast_slice(&initial_active),
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
    );
    let distance_buffer = device.create_buffer_init(
        "SSSP distance",
        bytemuck::cast_slice(&initial_distances),
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
    );
    let updating_buffer = device.create_buffer_init(
        "SSSP updating",
        bytemuck::cast_slice(&initial_distances),
        wgpu::BufferUsages::STORAGE,
    );
    if let Some(err) = device.device().pop_error_scope().await {
        return Err(GpuDeviceError::Allocation(err.to_string()).into());
    }
    let (params_buffer, active_buffer, distance_buffer, updating_buffer) =
        (params_buffer?, active_buffer?, distance_buffer?, updating_buffer?);

    let bind_group = device
        .device()
        .create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SSSP Bind Group"),
            layout: &kernels.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: buffers.vertex_offsets.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: buffers.edge_array.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: buffers.weight_array.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: active_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 5,
                    resource: distance_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 6,
                    resource: updating_buffer.as_entire_binding(),
                },
            ],
        });

    // Superstep loop: the active mask is only inspected between bursts
    let mut supersteps = 0;
    let mut bursts = 0;
    loop {
        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("SSSP Command Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("SSSP Compute Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_bind_group(0, &bind_group, &[]);
            for _ in 0..burst {
                compute_pass.set_pipeline(&kernels.relax);
                compute_pass.dispatch_workgroups(num_workgroups, 1, 1);
                compute_pass.set_pipeline(&kernels.commit);
                compute_pass.dispatch_workgroups(num_workgroups, 1, 1);
            }
        }

        device.queue().submit(Some(encoder.finish()));
        device.device().poll(wgpu::Maintain::Wait);
        supersteps += burst;
        bursts += 1;

        let active: Vec<u32> = read_back(device, &active_buffer, num_vertices).await?;
        let active_count = active.iter().filter(|&&a| a != 0).count();
        trace!("gpu sssp: burst {bursts}, {active_count} active after {supersteps} supersteps");
        if active_count == 0 {
            break;
        }
    }

    let raw: Vec<f32> = read_back(device, &distance_buffer, num_vertices).await?;
    let distances = raw
        .into_iter()
        .map(|d| if d >= UNREACHED { f32::INFINITY } else { d })
        .collect();

    debug!("gpu sssp: converged within {supersteps} supersteps, {bursts} readbacks");
    Ok(GpuSsspResult {
        distances,
        supersteps,
        bursts,
    })
}
