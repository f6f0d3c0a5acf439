use anyhow::Result;
use wgpu::{Buffer, BufferUsages};

/// Shared GPU handles for one prepared session.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Viewer Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        // Validation failures must surface as dropped frames, never as
        // process aborts.
        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            log::error!("uncaptured wgpu error: {error}");
        }));

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Creates a buffer pre-filled with `data` using the map-at-creation,
    /// write, unmap upload discipline. The buffer size is padded to the
    /// 4-byte boundary the API requires.
    pub fn create_buffer_init(&self, label: &str, data: &[u8], usage: BufferUsages) -> Buffer {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: padded_size(data.len()),
            usage,
            mapped_at_creation: true,
        });
        buffer.slice(..).get_mapped_range_mut()[..data.len()].copy_from_slice(data);
        buffer.unmap();
        buffer
    }
}

/// Rounds a byte length up to the next 4-byte boundary.
pub fn padded_size(len: usize) -> u64 {
    ((len + 3) & !3) as u64
}
