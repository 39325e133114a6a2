//! A small showcase scene: a textured cube and an OBJ model, instanced into a
//! grid, with a debug overlay and a couple of UI controls.

use std::time::Duration;

use cgmath::{EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3};

use minimal_scene::app::{self, SampleApp};
use minimal_scene::camera::{point_in_frustum, view_projection};
use minimal_scene::context::Context;
use minimal_scene::data_structures::mesh::{DrawMesh, Mesh};
use minimal_scene::data_structures::texture;
use minimal_scene::debug_draw::{DebugDraw, colors};
use minimal_scene::gui::editor_hud;
use minimal_scene::pipelines::mesh::mk_mesh_pipeline;
use minimal_scene::resources;
use minimal_scene::uniforms::{
    DrawUniforms, PerDrawUniforms, PerFrameUniforms, UniformBuffer, frame_bind_group,
    frame_bind_group_layout,
};

const GRID_ROWS: u32 = 2;
const GRID_COLS: u32 = 5;
const GRID_SPACING: f32 = 1.5;

/// World-space offset of one grid cell. Columns run along x, rows along y.
fn grid_translation(row: u32, col: u32, spacing: f32) -> Vector3<f32> {
    Vector3::new(col as f32 * spacing, row as f32 * spacing, 0.0)
}

/// Model matrix for one grid instance. Pure translation; the UI sliders only
/// move the debug box, never the meshes.
fn instance_model(row: u32, col: u32) -> Matrix4<f32> {
    Matrix4::from_translation(grid_translation(row, col, GRID_SPACING))
}

struct MinimalApp {
    pipeline: wgpu::RenderPipeline,
    cube: Mesh,
    apple: Mesh,
    brick_bind_group: wgpu::BindGroup,
    apple_bind_group: wgpu::BindGroup,
    per_frame: UniformBuffer<PerFrameUniforms>,
    per_draw: DrawUniforms<PerDrawUniforms>,
    frame_bind_group: wgpu::BindGroup,
    time: f32,
    position: Vector3<f32>,
    size: f32,
}

impl SampleApp for MinimalApp {
    fn init(ctx: &mut Context) -> anyhow::Result<Self> {
        let device = &ctx.device;

        let frame_layout = frame_bind_group_layout(device);
        let texture_layout = texture::diffuse_layout(device);
        let pipeline = mk_mesh_pipeline(device, &ctx.config, &frame_layout, &texture_layout);

        let sampler = texture::create_wrap_sampler(device);
        let brick = resources::load_texture(device, &ctx.queue, "textures/brick.png")?;
        let apple_diffuse =
            resources::load_texture(device, &ctx.queue, "textures/apple_diffuse.png")?;
        let brick_bind_group = brick.bind_group(device, &texture_layout, &sampler);
        let apple_bind_group = apple_diffuse.bind_group(device, &texture_layout, &sampler);

        let cube = Mesh::cube(device, 0.5);
        // The apple is authored at a much larger scale than the scene.
        let apple = resources::load_mesh_obj(device, "models/apple.obj", 0.01)?;

        let per_frame = UniformBuffer::new(device, "Per Frame Buffer", &PerFrameUniforms::new());
        let per_draw =
            DrawUniforms::new(device, "Per Draw Buffer", GRID_ROWS * GRID_COLS);
        let frame_bind_group = frame_bind_group(device, &frame_layout, &per_frame, &per_draw);

        Ok(Self {
            pipeline,
            cube,
            apple,
            brick_bind_group,
            apple_bind_group,
            per_frame,
            per_draw,
            frame_bind_group,
            time: 0.0,
            position: Vector3::new(0.5, 0.5, 0.5),
            size: 1.0,
        })
    }

    fn update(
        &mut self,
        ctx: &mut Context,
        ui: &egui::Context,
        debug: &mut DebugDraw,
        dt: Duration,
    ) {
        self.time += dt.as_secs_f32();
        self.per_frame.write(
            &ctx.queue,
            &PerFrameUniforms {
                projection: ctx.projection.matrix().into(),
                view: ctx.camera.camera.view_matrix().into(),
                time: self.time,
                _padding: [0.0; 3],
            },
        );

        editor_hud(ui, dt, &ctx.camera.camera);
        egui::Window::new("Scene").show(ui, |ui| {
            ui.add(egui::Slider::new(&mut self.position.x, -1.0..=1.0).text("Position X"));
            ui.add(egui::Slider::new(&mut self.position.y, -1.0..=1.0).text("Position Y"));
            ui.add(egui::Slider::new(&mut self.position.z, -1.0..=1.0).text("Position Z"));
            ui.add(egui::Slider::new(&mut self.size, 0.1..=10.0).text("Size"));
        });

        debug.lines.xz_square_grid(-50.0, 50.0, 0.0, 1.0, colors::DIM_GRAY);
        debug.lines.axis_triad(&Matrix4::identity(), 15.0);

        // The slider-driven box, labelled while it is on screen.
        let center = Point3::from_vec(self.position);
        debug.lines.wire_box(center, [self.size; 3], colors::BLUE);
        let vp = view_projection(&ctx.camera.camera, &ctx.projection);
        if point_in_frustum(&vp, center) {
            debug.projected_text("A Box", center, colors::WHITE);
        }
    }

    fn render(&mut self, ctx: &Context, render_pass: &mut wgpu::RenderPass<'_>) {
        let vp = view_projection(&ctx.camera.camera, &ctx.projection);

        render_pass.set_pipeline(&self.pipeline);

        let mut slot = 0;
        for row in 0..GRID_ROWS {
            let (mesh, bind_group) = if row % 2 == 0 {
                (&self.cube, &self.brick_bind_group)
            } else {
                (&self.apple, &self.apple_bind_group)
            };
            render_pass.set_bind_group(1, bind_group, &[]);
            for col in 0..GRID_COLS {
                let model = instance_model(row, col);
                self.per_draw.write(
                    &ctx.queue,
                    slot,
                    &PerDrawUniforms {
                        mvp: (vp * model).into(),
                    },
                );
                render_pass.set_bind_group(
                    0,
                    &self.frame_bind_group,
                    &[self.per_draw.offset(slot)],
                );
                render_pass.draw_mesh(mesh);
                slot += 1;
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    app::run::<MinimalApp>("Minimal Scene")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_runs_along_x_per_column_and_y_per_row() {
        assert_eq!(grid_translation(0, 0, 1.5), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(grid_translation(0, 4, 1.5), Vector3::new(6.0, 0.0, 0.0));
        assert_eq!(grid_translation(1, 0, 1.5), Vector3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn grid_has_one_slot_per_draw() {
        assert_eq!(GRID_ROWS * GRID_COLS, 10);
    }

    #[test]
    fn instance_models_are_pure_translations() {
        // No rotation or scale ever enters the grid instances.
        let m = instance_model(1, 2);
        assert_eq!(m.x, cgmath::Vector4::unit_x());
        assert_eq!(m.y, cgmath::Vector4::unit_y());
        assert_eq!(m.z, cgmath::Vector4::unit_z());
        assert_eq!(m.w, cgmath::Vector4::new(3.0, 1.5, 0.0, 1.0));
    }
}
