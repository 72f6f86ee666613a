//! One-time compilation of the SSSP compute kernels
//!
//! Kernels are built once per device and shared by every run, so there is
//! no runtime lock around compilation. Validation failures surface as
//! [`GpuDeviceError::KernelBuild`] carrying the compiler diagnostic.

use super::{GpuDevice, GpuDeviceError};
use log::{debug, error};
use std::path::Path;

/// Workgroup size declared by both entry points in `sssp.wgsl`
pub const WORKGROUP_SIZE: u32 = 256;

/// Bundled kernel program
pub const SSSP_SHADER: &str = include_str!("shaders/sssp.wgsl");

/// Compiled relax/commit pipelines and their shared bind group layout
#[derive(Debug)]
pub struct SsspKernels {
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pub(crate) relax: wgpu::ComputePipeline,
    pub(crate) commit: wgpu::ComputePipeline,
}

impl SsspKernels {
    /// Compile the bundled kernel program
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError::KernelBuild` if the device rejects the program
    pub async fn compile(device: &GpuDevice) -> Result<Self, GpuDeviceError> {
        Self::from_wgsl(device, SSSP_SHADER).await
    }

    /// Read a kernel program from disk and compile it
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError::KernelSource` if the file cannot be read and
    /// `GpuDeviceError::KernelBuild` if it does not compile
    pub async fn load(device: &GpuDevice, path: impl AsRef<Path>) -> Result<Self, GpuDeviceError> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| GpuDeviceError::KernelSource {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("loaded kernel program {} ({} bytes)", path.display(), source.len());
        Self::from_wgsl(device, &source).await
    }

    /// Compile a WGSL program exposing `relax` and `commit` entry points
    ///
    /// # Errors
    ///
    /// Returns `GpuDeviceError::KernelBuild` with the validation log on failure
    pub async fn from_wgsl(device: &GpuDevice, source: &str) -> Result<Self, GpuDeviceError> {
        let gpu = device.device();
        gpu.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader_module = gpu.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("SSSP Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("SSSP Bind Group Layout"),
            entries: &[
                // @binding(0): uniform params
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // @binding(1..=3): vertex_offsets, edge_array, weight_array (read)
                storage_entry(1, true),
                storage_entry(2, true),
                storage_entry(3, true),
                // @binding(4..=6): active_mask, distance, updating (read_write)
                storage_entry(4, false),
                storage_entry(5, false),
                storage_entry(6, false),
            ],
        });

        let pipeline_layout = gpu.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("SSSP Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |entry_point: &str| {
            gpu.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(entry_point),
                layout: Some(&pipeline_layout),
                module: &shader_module,
                entry_point,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        };
        let relax = pipeline("relax");
        let commit = pipeline("commit");

        if let Some(err) = gpu.pop_error_scope().await {
            let log = err.to_string();
            error!("SSSP kernel build failed:\n{log}");
            return Err(GpuDeviceError::KernelBuild(log));
        }

        debug!("SSSP kernels compiled for {}", device.info().name);
        Ok(Self {
            bind_group_layout,
            relax,
            commit,
        })
    }
}

const fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_bundled_program_declares_workgroup_size() {
        assert!(SSSP_SHADER.contains(&format!("@workgroup_size({WORKGROUP_SIZE})")));
        assert!(SSSP_SHADER.contains("fn relax"));
        assert!(SSSP_SHADER.contains("fn commit"));
    }

    #[test]
    fn test_bundled_program_validates_without_adapter() {
        let module = naga::front::wgsl::parse_str(SSSP_SHADER)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(SSSP_SHADER)));

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .unwrap_or_else(|e| panic!("{e:?}"));

        for name in ["relax", "commit"] {
            let entry = module
                .entry_points
                .iter()
                .find(|ep| ep.name == name)
                .unwrap_or_else(|| panic!("missing entry point {name}"));
            assert_eq!(entry.stage, naga::ShaderStage::Compute);
            assert_eq!(entry.workgroup_size, [WORKGROUP_SIZE, 1, 1]);
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_compile_bundled_kernels() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_compile_bundled_kernels: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        assert!(SsspKernels::compile(&device).await.is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_program_reports_build_log() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_invalid_program_reports_build_log: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let err = SsspKernels::from_wgsl(&device, "fn relax( { this is not wgsl")
            .await
            .unwrap_err();
        match err {
            GpuDeviceError::KernelBuild(log) => assert!(!log.is_empty()),
            other => panic!("expected KernelBuild, got {other:?}"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_load_program_from_file() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_load_program_from_file: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SSSP_SHADER.as_bytes()).unwrap();

        assert!(SsspKernels::load(&device, file.path()).await.is_ok());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_load_missing_file: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = SsspKernels::load(&device, dir.path().join("missing.wgsl"))
            .await
            .unwrap_err();
        assert!(matches!(err, GpuDeviceError::KernelSource { .. }));
    }
}
