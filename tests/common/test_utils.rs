use particle_ocean::{
    context::Context,
    data_structures::batch::InstanceBatch,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
};

pub(crate) struct FrameCounter(pub(crate) u32);
impl Default for FrameCounter {
    fn default() -> Self {
        Self(0)
    }
}
impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

pub(crate) type Setup = dyn Fn(&mut Context);
pub(crate) type Validate = dyn Fn(
    &Context,
    &mut FrameCounter,
    &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
) -> Result<ImageTestResult, anyhow::Error>;

/// Renders a fixed set of batches and hands every frame to `validate`.
pub(crate) struct TestRender {
    pub(crate) batches: Vec<InstanceBatch>,
    pub(crate) setup: Box<Setup>,
    pub(crate) validate: Box<Validate>,
}

impl TestRender {
    pub(crate) fn new(
        batches: Vec<InstanceBatch>,
        setup: impl Fn(&mut Context) + 'static,
        validate: impl Fn(
            &Context,
            &mut FrameCounter,
            &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error>
        + 'static,
    ) -> Self {
        Self {
            batches,
            setup: Box::new(setup),
            validate: Box::new(validate),
        }
    }
}

impl GraphicsFlow<FrameCounter> for TestRender {
    fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<FrameCounter> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(
        &mut self,
        _: &Context,
        state: &mut FrameCounter,
        _: std::time::Duration,
    ) -> Out<FrameCounter> {
        state.progress();
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &particle_ocean::DeviceEvent,
    ) -> Out<FrameCounter> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &particle_ocean::WindowEvent,
    ) -> Out<FrameCounter> {
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::Defaults(self.batches.iter().map(Into::into).collect())
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut FrameCounter,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, state, texture)
    }
}

pub(crate) fn to_pixel(colour: wgpu::Color) -> image::Rgba<u8> {
    let f_to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        f_to_u8(colour.r),
        f_to_u8(colour.g),
        f_to_u8(colour.b),
        f_to_u8(colour.a),
    ])
}

#[macro_export]
macro_rules! golden_image_test {
    ($constructor:expr) => {{
        use crate::common::test_utils::FrameCounter;
        use particle_ocean::flow::{FlowConstructor, GraphicsFlow};
        let model_constructor: FlowConstructor<FrameCounter> = Box::new(|ctx| {
            Box::pin(async move {
                let g_flow: Box<dyn GraphicsFlow<FrameCounter>> = Box::new(($constructor)(ctx));
                g_flow
            })
        });

        particle_ocean::flow::run(vec![model_constructor])
            .expect("Failed to run flow for integration test.");
    }};
}
