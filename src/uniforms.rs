//! Per-frame and per-draw uniform blocks and the buffers backing them.
//!
//! The sample keeps two uniform blocks: one written once per frame (camera
//! matrices plus a running clock) and one written once per draw call (the
//! model-view-projection matrix). Per-draw data lives in a single buffer with
//! one aligned slot per draw, bound with a dynamic offset.

use std::marker::PhantomData;
use std::num::NonZeroU64;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Data pushed to the GPU once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerFrameUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub time: f32,
    // Uniform blocks round up to 16 byte multiples.
    pub _padding: [f32; 3],
}

impl PerFrameUniforms {
    pub fn new() -> Self {
        Self {
            projection: cgmath::Matrix4::from_scale(1.0).into(),
            view: cgmath::Matrix4::from_scale(1.0).into(),
            time: 0.0,
            _padding: [0.0; 3],
        }
    }
}

impl Default for PerFrameUniforms {
    fn default() -> Self {
        Self::new()
    }
}

/// Data pushed to the GPU once per draw call.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PerDrawUniforms {
    pub mvp: [[f32; 4]; 4],
}

/// A uniform buffer holding a single `T`, rewritten with `write`.
#[derive(Debug)]
pub struct UniformBuffer<T> {
    pub buffer: wgpu::Buffer,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &str, initial: &T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            _marker: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }
}

/// Round `size` up to the next multiple of `alignment`.
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// A pool of per-draw uniform slots in one buffer, addressed by dynamic offset.
///
/// The slot stride honours the device's uniform offset alignment, so each
/// draw call gets its own `T` at `offset(slot)` within a single bind group.
#[derive(Debug)]
pub struct DrawUniforms<T> {
    pub buffer: wgpu::Buffer,
    stride: u64,
    capacity: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> DrawUniforms<T> {
    pub fn new(device: &wgpu::Device, label: &str, capacity: u32) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<T>() as u64, alignment);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            stride,
            capacity,
            _marker: PhantomData,
        }
    }

    /// Dynamic offset for the given slot, for `RenderPass::set_bind_group`.
    pub fn offset(&self, slot: u32) -> u32 {
        debug_assert!(slot < self.capacity);
        (self.stride * slot as u64) as u32
    }

    pub fn write(&self, queue: &wgpu::Queue, slot: u32, value: &T) {
        queue.write_buffer(
            &self.buffer,
            self.stride * slot as u64,
            bytemuck::bytes_of(value),
        );
    }

    /// Buffer binding sized to a single slot, as required for dynamic offsets.
    pub fn binding(&self) -> wgpu::BufferBinding<'_> {
        wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
        }
    }
}

/// Bind group layout shared by every draw: per-frame data at binding 0,
/// per-draw data at binding 1 behind a dynamic offset.
pub fn frame_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("frame_bind_group_layout"),
    })
}

/// Bind group pairing the per-frame buffer with the per-draw slot pool.
pub fn frame_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    per_frame: &UniformBuffer<PerFrameUniforms>,
    per_draw: &DrawUniforms<PerDrawUniforms>,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: per_frame.buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Buffer(per_draw.binding()),
            },
        ],
        label: Some("frame_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_frame_block_is_16_byte_aligned() {
        // Two mat4s, the clock and its padding.
        assert_eq!(std::mem::size_of::<PerFrameUniforms>(), 144);
        assert_eq!(std::mem::size_of::<PerFrameUniforms>() % 16, 0);
    }

    #[test]
    fn per_draw_block_is_one_matrix() {
        assert_eq!(std::mem::size_of::<PerDrawUniforms>(), 64);
    }

    #[test]
    fn stride_rounds_up_to_the_alignment() {
        assert_eq!(aligned_stride(64, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(1, 16), 16);
    }
}
