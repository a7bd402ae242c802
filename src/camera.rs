//! Camera, projection and the pointer-follow controller.
//!
//! The camera always looks at the scene origin. The [`FollowController`] turns
//! pointer and single-finger touch positions into an offset from the viewport
//! centre and eases the camera towards it every frame.

use std::collections::HashSet;

use cgmath::{Matrix4, Point3, Rad, Vector2, Vector3, perspective};
use winit::event::{TouchPhase, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
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

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The camera data as the shaders see it. View and projection stay separate so
/// the point shader can expand sprites in view space.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view: Matrix4::identity().into(),
            proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view = camera.calc_matrix().into();
        self.proj = projection.calc_matrix().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: FollowController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Eases the camera towards the last pointer offset from the viewport centre.
///
/// The easing is a plain per-frame lerp: faster displays move the camera faster.
#[derive(Debug, Clone)]
pub struct FollowController {
    target: Vector2<f32>,
    half_viewport: Vector2<f32>,
    smoothing: f32,
    touches: HashSet<u64>,
}

impl FollowController {
    pub fn new(smoothing: f32, target: [f32; 2]) -> Self {
        Self {
            target: target.into(),
            half_viewport: Vector2::new(0.0, 0.0),
            smoothing,
            touches: HashSet::new(),
        }
    }

    pub fn target(&self) -> Vector2<f32> {
        self.target
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.half_viewport = Vector2::new(width as f32 / 2.0, height as f32 / 2.0);
    }

    /// Pointer position in window pixels.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.target = Vector2::new(x, y) - self.half_viewport;
    }

    /// Touch input only steers the camera while exactly one finger is down.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id);
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
                return;
            }
            TouchPhase::Moved => (),
        }
        if self.touches.len() == 1 {
            self.pointer_moved(x, y);
        }
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x as f32, position.y as f32)
            }
            WindowEvent::Touch(touch) => touch_event(self, touch),
            _ => (),
        }
    }

    /// Move the camera a fraction of the remaining way and keep it aimed at the origin.
    pub fn update(&self, camera: &mut Camera) {
        camera.position.x += (self.target.x - camera.position.x) * self.smoothing;
        camera.position.y += (-self.target.y - camera.position.y) * self.smoothing;
        camera.target = Point3::new(0.0, 0.0, 0.0);
    }
}

fn touch_event(controller: &mut FollowController, touch: &winit::event::Touch) {
    controller.touch(
        touch.id,
        touch.phase,
        touch.location.x as f32,
        touch.location.y as f32,
    );
}
