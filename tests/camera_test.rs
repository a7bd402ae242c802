use cgmath::{Deg, Point3};
use particle_ocean::{
    camera::{Camera, FollowController, Projection},
    context::resize_viewport,
};
use winit::event::TouchPhase;

fn surface_config(width: u32, height: u32) -> wgpu::SurfaceConfiguration {
    wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: wgpu::TextureFormat::Bgra8UnormSrgb,
        width,
        height,
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode: wgpu::CompositeAlphaMode::Auto,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    }
}

#[test]
fn should_ease_towards_initial_target() {
    let controller = FollowController::new(0.05, [220.0, -487.0]);
    let mut camera = Camera::new((0.0, 0.0, 1000.0));

    controller.update(&mut camera);
    assert!((camera.position.x - 11.0).abs() < 1e-4);
    // screen y grows downwards, world y upwards
    assert!((camera.position.y - 24.35).abs() < 1e-4);
    assert_eq!(camera.position.z, 1000.0);
    assert_eq!(camera.target, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_converge_on_target() {
    let controller = FollowController::new(0.05, [100.0, 100.0]);
    let mut camera = Camera::new((0.0, 0.0, 1000.0));
    for _ in 0..500 {
        controller.update(&mut camera);
    }
    assert!((camera.position.x - 100.0).abs() < 1e-2);
    assert!((camera.position.y + 100.0).abs() < 1e-2);
}

#[test]
fn should_map_pointer_relative_to_viewport_centre() {
    let mut controller = FollowController::new(0.05, [0.0, 0.0]);
    controller.set_viewport(800, 600);
    controller.pointer_moved(400.0, 300.0);
    assert_eq!(controller.target(), cgmath::Vector2::new(0.0, 0.0));
    controller.pointer_moved(0.0, 600.0);
    assert_eq!(controller.target(), cgmath::Vector2::new(-400.0, 300.0));
}

#[test]
fn should_only_steer_with_a_single_finger() {
    let mut controller = FollowController::new(0.05, [0.0, 0.0]);
    controller.set_viewport(100, 100);

    controller.touch(1, TouchPhase::Started, 60.0, 50.0);
    assert_eq!(controller.target(), cgmath::Vector2::new(10.0, 0.0));

    controller.touch(2, TouchPhase::Started, 0.0, 0.0);
    controller.touch(1, TouchPhase::Moved, 90.0, 90.0);
    assert_eq!(controller.target(), cgmath::Vector2::new(10.0, 0.0));

    controller.touch(2, TouchPhase::Ended, 0.0, 0.0);
    controller.touch(1, TouchPhase::Moved, 50.0, 70.0);
    assert_eq!(controller.target(), cgmath::Vector2::new(0.0, 20.0));
}

#[test]
fn should_resize_viewport() {
    let mut config = surface_config(800, 600);
    let mut projection = Projection::new(800, 600, Deg(75.0), 1.0, 10000.0);
    let mut controller = FollowController::new(0.05, [0.0, 0.0]);

    assert!(resize_viewport(&mut config, &mut projection, &mut controller, 1920, 1080));
    assert_eq!((config.width, config.height), (1920, 1080));
    assert!((projection.aspect() - 1920.0 / 1080.0).abs() < 1e-6);

    controller.pointer_moved(960.0, 540.0);
    assert_eq!(controller.target(), cgmath::Vector2::new(0.0, 0.0));
}

#[test]
fn should_ignore_zero_sized_viewport() {
    let mut config = surface_config(800, 600);
    let mut projection = Projection::new(800, 600, Deg(75.0), 1.0, 10000.0);
    let mut controller = FollowController::new(0.05, [0.0, 0.0]);

    assert!(!resize_viewport(&mut config, &mut projection, &mut controller, 0, 600));
    assert_eq!((config.width, config.height), (800, 600));
    assert!((projection.aspect() - 800.0 / 600.0).abs() < 1e-6);
}
