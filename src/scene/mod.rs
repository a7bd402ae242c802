//! The ocean scene.
//!
//! [`OceanScene`] owns every visible object. Content that loads asynchronously
//! (fish, labels) arrives through the queues in [`SceneState`] and is uploaded
//! to the GPU on the next update.

pub mod fish;
pub mod input;
pub mod labels;
pub mod pyramids;
pub mod wave;

use std::sync::Arc;

use cgmath::Vector3;
use instant::Duration;
use winit::event::{DeviceEvent, WindowEvent};

use crate::{
    camera::{FollowController, Projection},
    config::{SceneConfig, color_or_default},
    context::{BufferWriter, Context, InitContext},
    data_structures::{
        batch::InstanceBatch,
        instance::Instance,
        model::{Material, Mesh, Model},
        point_cloud::PointCloud,
    },
    flow::{GraphicsFlow, Out, StateMutation},
    geometry::shapes::{cone, uv_sphere},
    render::{Instanced, Render, Sprites},
    resources::font::FontCache,
    scene::{
        fish::{FishCloud, FishPlacement},
        input::{InputAction, LabelInput},
        labels::{LabelManager, PendingLabel, PlacedLabel},
        wave::{GridParticle, WaveField},
    },
    storage::{self, KeyValueStore, LabelStore},
};

/// A deferred change to the scene state, produced by an async load.
pub type SceneMutation = StateMutation<SceneState>;

/// Content that finished loading and waits for its GPU upload.
#[derive(Debug, Default)]
pub struct SceneState {
    pub pending_fish: Vec<FishCloud>,
    pub pending_labels: Vec<PlacedLabel>,
}

pub struct OceanScene {
    config: SceneConfig,
    wave: WaveField,
    ocean: InstanceBatch,
    highlights: InstanceBatch,
    pyramids: Vec<InstanceBatch>,
    fish: Vec<PointCloud>,
    texts: Vec<InstanceBatch>,
    text_material: Material,
    labels: LabelManager,
    input: LabelInput,
    startup_fish: Vec<FishPlacement>,
    startup_labels: Vec<PendingLabel>,
}

impl OceanScene {
    /// Build the scene with `assets/scene.json` and the platform's label store.
    pub async fn new(ctx: InitContext) -> Self {
        let config = SceneConfig::load().await;
        Self::with_config(ctx, config, storage::default_backend())
    }

    pub fn with_config(
        ctx: InitContext,
        config: SceneConfig,
        backend: Arc<dyn KeyValueStore>,
    ) -> Self {
        let mut rng = rand::thread_rng();
        let device = &ctx.device;
        let layout = &ctx.material_layout;

        let wave = WaveField::generate(&config.wave, &mut rng);
        let [w, h] = config.wave.sphere_segments;
        let sphere: Vec<Mesh> = Mesh::from_geometry(device, "sphere", &uv_sphere(1.0, w, h))
            .into_iter()
            .collect();
        let ocean = InstanceBatch::new(
            device,
            Model {
                meshes: sphere.clone(),
                materials: vec![Material::new(
                    device,
                    "ocean",
                    color_or_default(&config.wave.color),
                    0.0,
                    layout,
                )],
            },
            particle_instances(wave.particles(), false),
        );
        let highlights = InstanceBatch::new(
            device,
            Model {
                meshes: sphere,
                materials: vec![Material::new(
                    device,
                    "highlight",
                    color_or_default(&config.wave.highlight_color),
                    0.0,
                    layout,
                )],
            },
            particle_instances(wave.particles(), true),
        );

        let scattered = pyramids::scatter(&config.pyramids, &config.wave, &mut rng);
        let pyramid_geometry = cone(
            config.pyramids.radius,
            config.pyramids.height,
            config.pyramids.sides,
        );
        let pyramid_batches = pyramids::group_by_color(&config.pyramids.palette, &scattered)
            .into_iter()
            .map(|(color, instances)| {
                InstanceBatch::new(
                    device,
                    Model {
                        meshes: Mesh::from_geometry(device, "pyramid", &pyramid_geometry)
                            .into_iter()
                            .collect(),
                        materials: vec![Material::new(
                            device,
                            &format!("pyramid {}", color),
                            color_or_default(color),
                            0.0,
                            layout,
                        )],
                    },
                    instances,
                )
            })
            .collect();

        let store = Arc::new(LabelStore::new(backend, &config.labels.storage_key));
        let labels = LabelManager::new(
            store,
            FontCache::new(),
            config.labels.clone(),
            config.wave.clone(),
        );
        let startup_labels = labels.load_at_startup(&mut rng);
        let startup_fish = fish::placements(&config.fish, &config.wave, &mut rng);
        let text_material = Material::new(
            device,
            "label",
            color_or_default(&config.labels.color),
            0.0,
            layout,
        );

        Self {
            config,
            wave,
            ocean,
            highlights,
            pyramids: pyramid_batches,
            fish: Vec::new(),
            texts: Vec::new(),
            text_material,
            labels,
            input: LabelInput::new(),
            startup_fish,
            startup_labels,
        }
    }

    pub fn wave(&self) -> &WaveField {
        &self.wave
    }

    fn apply_camera_config(&self, ctx: &mut Context) {
        let camera = &self.config.camera;
        ctx.camera.camera.position = camera.position.into();
        ctx.projection = Projection::new(
            ctx.config.width,
            ctx.config.height,
            cgmath::Deg(camera.fovy),
            camera.znear,
            camera.zfar,
        );
        let mut controller = FollowController::new(camera.smoothing, camera.initial_target);
        controller.set_viewport(ctx.config.width, ctx.config.height);
        ctx.camera.controller = controller;
        ctx.clear_colour = self.config.background_colour();
    }

    /// Move every sphere instance to its particle's current place and size.
    fn sync_particles(&mut self) {
        let (ordinary, highlighted): (Vec<&GridParticle>, Vec<&GridParticle>) =
            self.wave.particles().iter().partition(|p| !p.highlighted);
        for (instance, particle) in self.ocean.instances.iter_mut().zip(ordinary) {
            update_instance(instance, particle);
        }
        for (instance, particle) in self.highlights.instances.iter_mut().zip(highlighted) {
            update_instance(instance, particle);
        }
    }

    fn upload_pending(&mut self, ctx: &Context, state: &mut SceneState) {
        for cloud in state.pending_fish.drain(..) {
            let color = self
                .config
                .fish
                .palette
                .get(cloud.palette_index)
                .map(|hex| color_or_default(hex))
                .unwrap_or([1.0; 4]);
            let material = Material::new(
                &ctx.device,
                &cloud.name,
                color,
                self.config.fish.point_size,
                &ctx.material_layout,
            );
            if let Some(points) =
                PointCloud::new(&ctx.device, &cloud.name, &cloud.world_positions(), material)
            {
                self.fish.push(points);
            }
        }

        for placed in state.pending_labels.drain(..) {
            let Some(mesh) = Mesh::from_geometry(&ctx.device, &placed.label.message, &placed.geometry)
            else {
                continue;
            };
            let model = Model {
                meshes: vec![mesh],
                materials: vec![self.text_material.clone()],
            };
            let instance = Instance::from(Vector3::from(placed.position));
            self.texts
                .push(InstanceBatch::new(&ctx.device, model, vec![instance]));
            log::debug!("Placed label {:?}", placed.label.message);
        }
    }

    fn commit_label(&mut self, text: &str) -> Out<SceneState> {
        let mut rng = rand::thread_rng();
        let input = &mut self.input;
        match self.labels.add_new(text, &mut rng, || input.clear()) {
            Ok(Some(pending)) => Out::FutFn(vec![self.labels.build(pending)]),
            Ok(None) => Out::Empty,
            Err(e) => {
                log::error!("Label {:?} could not be stored: {}", text, e);
                Out::Empty
            }
        }
    }
}

fn particle_instances(particles: &[GridParticle], highlighted: bool) -> Vec<Instance> {
    particles
        .iter()
        .filter(|p| p.highlighted == highlighted)
        .map(|p| {
            let mut instance = Instance::new();
            update_instance(&mut instance, p);
            instance
        })
        .collect()
}

fn update_instance(instance: &mut Instance, particle: &GridParticle) {
    let s = particle.render_scale();
    instance.position = particle.position.into();
    instance.scale = Vector3::new(s, s, s);
}

impl GraphicsFlow<SceneState> for OceanScene {
    fn on_init(&mut self, ctx: &mut Context, _: &mut SceneState) -> Out<SceneState> {
        self.apply_camera_config(ctx);

        let mut loads: Vec<Box<dyn Future<Output = SceneMutation>>> = self
            .startup_fish
            .drain(..)
            .map(fish::load)
            .collect();
        for pending in std::mem::take(&mut self.startup_labels) {
            loads.push(self.labels.build(pending));
        }
        if loads.is_empty() {
            Out::Empty
        } else {
            Out::FutFn(loads)
        }
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut SceneState,
        _: Duration,
    ) -> Out<SceneState> {
        self.wave.step();
        self.sync_particles();
        self.ocean.write_to_buffer(ctx);
        self.highlights.write_to_buffer(ctx);
        self.upload_pending(ctx, state);
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut SceneState,
        _: &DeviceEvent,
    ) -> Out<SceneState> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut SceneState,
        event: &WindowEvent,
    ) -> Out<SceneState> {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return Out::Empty;
        };
        match self.input.handle_key_event(event) {
            InputAction::Commit(text) => self.commit_label(&text),
            InputAction::None => Out::Empty,
        }
    }

    fn on_render(&self) -> Render<'_> {
        let mut basics: Vec<Instanced> = vec![(&self.ocean).into(), (&self.highlights).into()];
        basics.extend(self.pyramids.iter().map(Instanced::from));
        basics.extend(self.texts.iter().map(Instanced::from));
        let sprites: Vec<Sprites> = self.fish.iter().map(Sprites::from).collect();
        Render::Composed(vec![Render::Defaults(basics), Render::Points(sprites)])
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _: &Context,
        _: &mut SceneState,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<crate::flow::ImageTestResult, anyhow::Error> {
        Ok(crate::flow::ImageTestResult::Waiting)
    }
}
