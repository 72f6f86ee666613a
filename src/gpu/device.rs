//! GPU device discovery, initialization and resource creation
//!
//! Discovery never fails: it reports which kinds of adapters could be turned
//! into devices, and callers skip the backends that are missing.

use log::{info, warn};
use std::path::PathBuf;
use thiserror::Error;
use wgpu::util::DeviceExt;

/// GPU device errors
#[derive(Debug, Error)]
pub enum GpuDeviceError {
    /// No compatible GPU adapter found
    #[error("No compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device
    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(String),

    /// Kernel program failed validation/compilation; carries the compiler diagnostic
    #[error("Kernel program failed to build:\n{0}")]
    KernelBuild(String),

    /// Kernel program source could not be read
    #[error("Failed to read kernel program {path}: {source}")]
    KernelSource {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Requested buffer exceeds the device limit
    #[error("Buffer '{label}' needs {size} bytes, device limit is {limit}")]
    BufferTooLarge {
        /// Buffer label
        label: String,
        /// Requested size in bytes
        size: u64,
        /// Device limit in bytes
        limit: u64,
    },

    /// Graph needs more workgroups than one dispatch dimension allows
    #[error("Dispatch of {workgroups} workgroups exceeds device limit {limit}")]
    DispatchTooLarge {
        /// Required workgroups
        workgroups: u32,
        /// Device limit per dimension
        limit: u32,
    },

    /// Device reported an allocation failure
    #[error("GPU allocation failed: {0}")]
    Allocation(String),
}

/// GPU device wrapper for SSSP offload
///
/// # Example
///
/// ```ignore
/// # use degree_sssp::gpu::GpuDevice;
/// let device = GpuDevice::new().await?;
/// println!("{}", device.info().name);
/// ```
#[derive(Debug)]
pub struct GpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter: wgpu::Adapter,
}

impl GpuDevice {
    /// Check if GPU is available without keeping a device
    ///
    /// This is useful for tests to skip gracefully when GPU is not available.
    pub async fn is_gpu_available() -> bool {
        Self::new().await.is_ok()
    }

    /// Initialize GPU device with default settings
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError` if no adapter is found or the device request fails
    pub async fn new() -> Result<Self, GpuDeviceError> {
        Self::new_with_backend(wgpu::Backends::all()).await
    }

    /// Initialize GPU device with specific backend
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError` if device initialization fails
    pub async fn new_with_backend(backends: wgpu::Backends) -> Result<Self, GpuDeviceError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuDeviceError::NoAdapter)?;

        Self::from_adapter(adapter).await
    }

    /// Open a device and queue on a specific adapter
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError::DeviceRequest` if the adapter refuses
    pub async fn from_adapter(adapter: wgpu::Adapter) -> Result<Self, GpuDeviceError> {
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("degree-sssp GPU device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                },
                None,
            )
            .await
            .map_err(|e| GpuDeviceError::DeviceRequest(e.to_string()))?;

        Ok(Self {
            device,
            queue,
            adapter,
        })
    }

    /// Get adapter info (GPU name, backend, etc.)
    #[must_use]
    pub fn info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Limits the device was opened with
    #[must_use]
    pub fn limits(&self) -> wgpu::Limits {
        self.device.limits()
    }

    fn check_size(&self, label: &str, size: u64, usage: wgpu::BufferUsages) -> Result<(), GpuDeviceError> {
        let limits = self.device.limits();
        let limit = if usage.contains(wgpu::BufferUsages::STORAGE) {
            limits.max_buffer_size.min(u64::from(limits.max_storage_buffer_binding_size))
        } else {
            limits.max_buffer_size
        };
        if size > limit {
            return Err(GpuDeviceError::BufferTooLarge {
                label: label.to_string(),
                size,
                limit,
            });
        }
        Ok(())
    }

    /// Create GPU buffer with initial data
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError::BufferTooLarge` if `contents` exceeds the device limit
    pub fn create_buffer_init(
        &self,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, GpuDeviceError> {
        self.check_size(label, contents.len() as u64, usage)?;
        Ok(self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            }))
    }

    /// Create empty GPU buffer
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError::BufferTooLarge` if `size` exceeds the device limit
    pub fn create_buffer(
        &self,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<wgpu::Buffer, GpuDeviceError> {
        self.check_size(label, size, usage)?;
        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        }))
    }

    /// Get device reference
    #[must_use]
    pub const fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get queue reference
    #[must_use]
    pub const fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// Outcome of device discovery
///
/// "GPU" covers discrete, integrated, virtual and unclassified adapters;
/// "CPU" is a software or CPU-backed adapter.
#[derive(Debug)]
pub enum DeviceDiscovery {
    /// Both a GPU and a CPU device were opened
    Success {
        /// GPU device
        gpu: GpuDevice,
        /// CPU device
        cpu: GpuDevice,
    },
    /// Only a GPU device could be opened
    GpuOnly(GpuDevice),
    /// Only a CPU device could be opened
    CpuOnly(GpuDevice),
    /// Adapters exist but none could be opened
    NoDevices,
    /// No adapter is exposed by any enabled backend
    NoPlatform,
}

impl DeviceDiscovery {
    /// Enumerate adapters on `backends` and open the most capable GPU and CPU one
    pub async fn discover(backends: wgpu::Backends) -> Self {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapters = instance.enumerate_adapters(backends);
        if adapters.is_empty() {
            warn!("device discovery: no adapters on {backends:?}");
            return Self::NoPlatform;
        }
        info!("device discovery: {} adapter(s) on {backends:?}", adapters.len());

        let mut best_gpu: Option<wgpu::Adapter> = None;
        let mut best_cpu: Option<wgpu::Adapter> = None;
        for adapter in adapters {
            let device_type = adapter.get_info().device_type;
            let slot = if device_type == wgpu::DeviceType::Cpu {
                &mut best_cpu
            } else {
                &mut best_gpu
            };
            let better = slot
                .as_ref()
                .map_or(true, |held| capability_rank(device_type) > capability_rank(held.get_info().device_type));
            if better {
                *slot = Some(adapter);
            }
        }

        let gpu = open(best_gpu).await;
        let cpu = open(best_cpu).await;

        match (gpu, cpu) {
            (Some(gpu), Some(cpu)) => Self::Success { gpu, cpu },
            (Some(gpu), None) => Self::GpuOnly(gpu),
            (None, Some(cpu)) => Self::CpuOnly(cpu),
            (None, None) => {
                warn!("device discovery: adapters found but no device could be opened");
                Self::NoDevices
            }
        }
    }

    /// GPU device, if one was opened
    #[must_use]
    pub const fn gpu(&self) -> Option<&GpuDevice> {
        match self {
            Self::Success { gpu, .. } | Self::GpuOnly(gpu) => Some(gpu),
            _ => None,
        }
    }

    /// CPU device, if one was opened
    #[must_use]
    pub const fn cpu(&self) -> Option<&GpuDevice> {
        match self {
            Self::Success { cpu, .. } | Self::CpuOnly(cpu) => Some(cpu),
            _ => None,
        }
    }

    /// Every opened device, GPU first
    #[must_use]
    pub fn devices(&self) -> Vec<&GpuDevice> {
        self.gpu().into_iter().chain(self.cpu()).collect()
    }
}

/// Preference order when several adapters of one kind exist
const fn capability_rank(device_type: wgpu::DeviceType) -> u8 {
    match device_type {
        wgpu::DeviceType::DiscreteGpu => 4,
        wgpu::DeviceType::IntegratedGpu => 3,
        wgpu::DeviceType::VirtualGpu => 2,
        wgpu::DeviceType::Other => 1,
        wgpu::DeviceType::Cpu => 0,
    }
}

async fn open(adapter: Option<wgpu::Adapter>) -> Option<GpuDevice> {
    let adapter = adapter?;
    let name = adapter.get_info().name;
    match GpuDevice::from_adapter(adapter).await {
        Ok(device) => {
            info!("device discovery: opened {name}");
            Some(device)
        }
        Err(e) => {
            warn!("device discovery: {name} unavailable: {e}");
            None
        }
    }
}
