//! Immediate-mode debug drawing: lines accumulated on the CPU each frame,
//! flushed into one vertex buffer and drawn as a line list, plus screen-space
//! text labels painted through the egui foreground layer.

use cgmath::{Matrix4, Point3, Transform as _};

use crate::camera::project_to_screen;
use crate::data_structures::mesh::Vertex;
use crate::pipelines::debug::mk_debug_pipeline;

/// RGBA color used by the overlay.
pub type Color = [f32; 4];

/// A small palette in the spirit of the usual debug-draw libraries.
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
    pub const DIM_GRAY: Color = [0.41, 0.41, 0.41, 1.0];
    pub const RED: Color = [0.9, 0.15, 0.15, 1.0];
    pub const GREEN: Color = [0.15, 0.9, 0.15, 1.0];
    pub const BLUE: Color = [0.2, 0.3, 0.9, 1.0];
    pub const YELLOW: Color = [0.9, 0.9, 0.1, 1.0];
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: Color,
}

impl Vertex for LineVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// CPU-side accumulator for line primitives. Kept separate from the GPU
/// resources so the generators stay testable without a device.
#[derive(Default)]
pub struct LineList {
    vertices: Vec<LineVertex>,
}

impl LineList {
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[LineVertex] {
        &self.vertices
    }

    pub fn line<P: Into<Point3<f32>>>(&mut self, from: P, to: P, color: Color) {
        let (from, to) = (from.into(), to.into());
        self.vertices.push(LineVertex {
            position: from.into(),
            color,
        });
        self.vertices.push(LineVertex {
            position: to.into(),
            color,
        });
    }

    /// Square grid in the XZ plane at height `y`, from `min` to `max` on both
    /// axes with the given line spacing.
    pub fn xz_square_grid(&mut self, min: f32, max: f32, y: f32, step: f32, color: Color) {
        if step <= 0.0 || max < min {
            return;
        }
        let lines = ((max - min) / step).round() as i32;
        for k in 0..=lines {
            let offset = min + k as f32 * step;
            self.line([min, y, offset], [max, y, offset], color);
            self.line([offset, y, min], [offset, y, max], color);
        }
    }

    /// Three colored axis lines (X red, Y green, Z blue) under `transform`.
    pub fn axis_triad(&mut self, transform: &Matrix4<f32>, length: f32) {
        let origin = transform.transform_point(Point3::new(0.0, 0.0, 0.0));
        let axes = [
            (Point3::new(length, 0.0, 0.0), colors::RED),
            (Point3::new(0.0, length, 0.0), colors::GREEN),
            (Point3::new(0.0, 0.0, length), colors::BLUE),
        ];
        for (tip, color) in axes {
            self.line(origin, transform.transform_point(tip), color);
        }
    }

    /// Wireframe box centered at `center` with full extents `(w, h, d)`.
    pub fn wire_box<P: Into<Point3<f32>>>(&mut self, center: P, extents: [f32; 3], color: Color) {
        let c = center.into();
        let [hw, hh, hd] = [extents[0] / 2.0, extents[1] / 2.0, extents[2] / 2.0];
        let corner =
            |sx: f32, sy: f32, sz: f32| Point3::new(c.x + sx * hw, c.y + sy * hh, c.z + sz * hd);
        let bottom = [
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, -1.0, 1.0),
            corner(-1.0, -1.0, 1.0),
        ];
        let top = [
            corner(-1.0, 1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ];
        for i in 0..4 {
            let j = (i + 1) % 4;
            self.line(bottom[i], bottom[j], color);
            self.line(top[i], top[j], color);
            self.line(bottom[i], top[i], color);
        }
    }
}

struct ProjectedText {
    text: String,
    position: Point3<f32>,
    color: Color,
}

/// Per-frame overlay renderer.
///
/// Queue primitives between `begin_frame` and `flush`, then `draw` inside the
/// main render pass. Labels are painted separately while the frame's egui pass
/// is still open.
pub struct DebugDraw {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    buffer_capacity: usize,
    vertex_count: u32,
    pub lines: LineList,
    texts: Vec<ProjectedText>,
}

impl DebugDraw {
    const INITIAL_CAPACITY: usize = 4096;

    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = mk_debug_pipeline(device, config, camera_bind_group_layout);
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Debug Line Buffer"),
            size: (Self::INITIAL_CAPACITY * std::mem::size_of::<LineVertex>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            pipeline,
            vertex_buffer,
            buffer_capacity: Self::INITIAL_CAPACITY,
            vertex_count: 0,
            lines: LineList::default(),
            texts: Vec::new(),
        }
    }

    /// Drop everything queued for the previous frame.
    pub fn begin_frame(&mut self) {
        self.lines.clear();
        self.texts.clear();
    }

    /// Queue a text label anchored at a world-space position.
    pub fn projected_text<P: Into<Point3<f32>>>(&mut self, text: &str, position: P, color: Color) {
        self.texts.push(ProjectedText {
            text: text.to_string(),
            position: position.into(),
            color,
        });
    }

    /// Upload the queued lines, growing the vertex buffer when needed.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if self.lines.is_empty() {
            self.vertex_count = 0;
            return;
        }
        if self.lines.len() > self.buffer_capacity {
            self.buffer_capacity = self.lines.len().next_power_of_two();
            self.vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Debug Line Buffer"),
                size: (self.buffer_capacity * std::mem::size_of::<LineVertex>())
                    as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
        }
        queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(self.lines.vertices()),
        );
        self.vertex_count = self.lines.len() as u32;
    }

    /// Draw the flushed lines inside the main render pass.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }

    /// Paint the queued labels through egui's foreground layer.
    pub fn paint_texts(
        &self,
        egui_ctx: &egui::Context,
        view_proj: &Matrix4<f32>,
        width: f32,
        height: f32,
    ) {
        if self.texts.is_empty() {
            return;
        }
        let painter = egui_ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("debug_draw_text"),
        ));
        let pixels_per_point = egui_ctx.pixels_per_point();
        for label in &self.texts {
            let Some((sx, sy)) = project_to_screen(view_proj, label.position, width, height) else {
                continue;
            };
            let [r, g, b, a] = label.color.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
            painter.text(
                egui::pos2(sx / pixels_per_point, sy / pixels_per_point),
                egui::Align2::CENTER_BOTTOM,
                &label.text,
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgba_unmultiplied(r, g, b, a),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn grid_emits_two_vertices_per_line() {
        let mut lines = LineList::default();
        lines.xz_square_grid(-50.0, 50.0, 0.0, 1.0, colors::DIM_GRAY);
        // 101 lines in each of the two directions, two vertices per line.
        assert_eq!(lines.len(), 101 * 2 * 2);
        assert_eq!(lines.vertices()[0].position, [-50.0, 0.0, -50.0]);
    }

    #[test]
    fn grid_rejects_a_degenerate_step() {
        let mut lines = LineList::default();
        lines.xz_square_grid(-50.0, 50.0, 0.0, 0.0, colors::DIM_GRAY);
        lines.xz_square_grid(-50.0, 50.0, 0.0, -1.0, colors::DIM_GRAY);
        lines.xz_square_grid(50.0, -50.0, 0.0, 1.0, colors::DIM_GRAY);
        assert!(lines.is_empty());
    }

    #[test]
    fn wire_box_has_twelve_edges() {
        let mut lines = LineList::default();
        lines.wire_box([1.0, 2.0, 3.0], [2.0, 4.0, 6.0], colors::BLUE);
        assert_eq!(lines.len(), 24);
        for v in lines.vertices() {
            assert!((v.position[0] - 1.0).abs() <= 1.0 + 1e-6);
            assert!((v.position[1] - 2.0).abs() <= 2.0 + 1e-6);
            assert!((v.position[2] - 3.0).abs() <= 3.0 + 1e-6);
        }
    }

    #[test]
    fn axis_triad_has_three_colored_lines() {
        let mut lines = LineList::default();
        lines.axis_triad(&Matrix4::identity(), 15.0);
        assert_eq!(lines.len(), 6);
        let v = lines.vertices();
        assert_eq!(v[1].position, [15.0, 0.0, 0.0]);
        assert_eq!(v[1].color, colors::RED);
        assert_eq!(v[3].color, colors::GREEN);
        assert_eq!(v[5].color, colors::BLUE);
    }

    #[test]
    fn clear_resets_the_list() {
        let mut lines = LineList::default();
        lines.line([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], colors::WHITE);
        assert_eq!(lines.len(), 2);
        lines.clear();
        assert!(lines.is_empty());
    }
}
