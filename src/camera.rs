//! Camera types, controller and uniforms for view/projection.

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use std::time::Duration;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// cgmath's perspective matrix targets OpenGL clip space (z in -1..1).
/// wgpu expects z in 0..1, so projections are corrected with this matrix.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A free camera described by an eye position and yaw/pitch angles.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        eye: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            eye: eye.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera is looking along.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw, pitch) = (self.yaw.0, self.pitch.0);
        Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    /// Re-derive yaw and pitch so the camera faces `target`.
    pub fn look_at<V: Into<Point3<f32>>>(&mut self, target: V) {
        let dir = target.into() - self.eye;
        let flat = (dir.x * dir.x + dir.z * dir.z).sqrt();
        self.yaw = Rad(dir.z.atan2(dir.x));
        self.pitch = Rad(dir.y.atan2(flat));
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.eye, self.forward(), Vector3::unit_y())
    }
}

/// Perspective projection parameters, resized alongside the window.
#[derive(Debug, Clone)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Combined view-projection matrix for the current camera state.
pub fn view_projection(camera: &Camera, projection: &Projection) -> Matrix4<f32> {
    projection.matrix() * camera.view_matrix()
}

/// Whether a world-space point lies inside the view frustum of `view_proj`.
pub fn point_in_frustum(view_proj: &Matrix4<f32>, point: Point3<f32>) -> bool {
    let clip = view_proj * point.to_homogeneous();
    let w = clip.w;
    w > 0.0
        && clip.x.abs() <= w
        && clip.y.abs() <= w
        && clip.z >= 0.0
        && clip.z <= w
}

/// Project a world-space point to window coordinates (origin top-left).
///
/// Returns `None` when the point falls outside the frustum.
pub fn project_to_screen(
    view_proj: &Matrix4<f32>,
    point: Point3<f32>,
    width: f32,
    height: f32,
) -> Option<(f32, f32)> {
    if !point_in_frustum(view_proj, point) {
        return None;
    }
    let clip = view_proj * point.to_homogeneous();
    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    Some((
        (ndc_x * 0.5 + 0.5) * width,
        (1.0 - (ndc_y * 0.5 + 0.5)) * height,
    ))
}

/// The camera's view/projection data as it is laid out on the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::from_scale(1.0).into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = view_projection(camera, projection).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// WASD + mouse-look camera controller.
///
/// Keyboard state is fed in via [`handle_window_events`](Self::handle_window_events),
/// mouse deltas via [`handle_mouse`](Self::handle_mouse); `update` applies the
/// accumulated input to a [`Camera`] once per frame.
#[derive(Debug)]
pub struct CameraController {
    speed: f32,
    sensitivity: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_left: f32,
    amount_right: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            speed,
            sensitivity,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_left: 0.0,
            amount_right: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state,
                    ..
                },
            ..
        } = event
        {
            let amount = if *state == ElementState::Pressed {
                1.0
            } else {
                0.0
            };
            match key {
                KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
                KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
                KeyCode::KeyA | KeyCode::ArrowLeft => self.amount_left = amount,
                KeyCode::KeyD | KeyCode::ArrowRight => self.amount_right = amount,
                KeyCode::Space => self.amount_up = amount,
                KeyCode::ShiftLeft => self.amount_down = amount,
                _ => {}
            }
        }
    }

    pub fn handle_mouse(&mut self, mouse_dx: f64, mouse_dy: f64) {
        self.rotate_horizontal = mouse_dx as f32;
        self.rotate_vertical = mouse_dy as f32;
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        camera.eye += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.eye += right * (self.amount_right - self.amount_left) * self.speed * dt;
        camera.eye.y += (self.amount_up - self.amount_down) * self.speed * dt;

        camera.yaw += Rad(self.rotate_horizontal) * self.sensitivity * dt;
        camera.pitch += Rad(-self.rotate_vertical) * self.sensitivity * dt;
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;

        // Keep the pitch away from straight up/down to avoid flipping.
        let limit = Rad::from(Deg(89.0));
        camera.pitch = Rad(camera.pitch.0.clamp(-limit.0, limit.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn look_at_faces_the_target() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        camera.look_at((10.0, 0.0, 0.0));
        let fwd = camera.forward();
        assert!(close(fwd.x, 1.0, 1e-5));
        assert!(close(fwd.y, 0.0, 1e-5));
        assert!(close(fwd.z, 0.0, 1e-5));

        camera.look_at((0.0, 10.0, 0.001));
        assert!(camera.forward().y > 0.99);
    }

    #[test]
    fn frustum_contains_point_ahead_but_not_behind() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(0.0), Deg(0.0));
        camera.look_at((0.0, 0.0, 0.0));
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let vp = view_projection(&camera, &projection);

        assert!(point_in_frustum(&vp, Point3::new(0.0, 0.0, 0.0)));
        assert!(!point_in_frustum(&vp, Point3::new(0.0, 0.0, 20.0)));
        assert!(!point_in_frustum(&vp, Point3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn screen_projection_centers_the_view_axis() {
        let mut camera = Camera::new((0.0, 0.0, 10.0), Deg(0.0), Deg(0.0));
        camera.look_at((0.0, 0.0, 0.0));
        let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
        let vp = view_projection(&camera, &projection);

        let (sx, sy) = project_to_screen(&vp, Point3::new(0.0, 0.0, 0.0), 800.0, 600.0).unwrap();
        assert!(close(sx, 400.0, 1e-2));
        assert!(close(sy, 300.0, 1e-2));

        assert!(project_to_screen(&vp, Point3::new(0.0, 0.0, 20.0), 800.0, 600.0).is_none());
    }

    #[test]
    fn controller_moves_along_the_view_direction() {
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        let mut controller = CameraController::new(10.0, 0.4);
        controller.amount_forward = 1.0;
        controller.update(&mut camera, Duration::from_secs(1));
        assert!(close(camera.eye.x, 10.0, 1e-4));
    }
}
