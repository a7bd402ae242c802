use wgpu::util::DeviceExt;

use crate::{
    context::BufferWriter,
    data_structures::{
        instance::{Instance, InstanceRaw},
        model,
    },
    render::{Instanced, Render},
};

/**
 * An `InstanceBatch` draws one model many times with a single draw call.
 *
 * The ocean spheres, the pyramids of one colour and every text label are batches.
 * Mutate `instances` freely and call `write_to_buffer` once per frame; the GPU
 * buffer is recreated only when the instance count changed.
 */
pub struct InstanceBatch {
    pub model: model::Model,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
    uploaded_len: usize,
}

impl InstanceBatch {
    pub fn new(device: &wgpu::Device, model: model::Model, instances: Vec<Instance>) -> Self {
        let instance_buffer = mk_instance_buffer(device, &instances);
        let uploaded_len = instances.len();
        Self {
            model,
            instances,
            instance_buffer,
            uploaded_len,
        }
    }

    pub fn write_instances(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        if self.instances.len() != self.uploaded_len {
            self.instance_buffer = mk_instance_buffer(device, &self.instances);
            self.uploaded_len = self.instances.len();
        } else if !self.instances.is_empty() {
            let raw: Vec<InstanceRaw> = self.instances.iter().map(Instance::to_raw).collect();
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
        }
    }
}

fn mk_instance_buffer(device: &wgpu::Device, instances: &[Instance]) -> wgpu::Buffer {
    let mut raw: Vec<InstanceRaw> = instances.iter().map(Instance::to_raw).collect();
    // wgpu rejects empty vertex buffers, keep one identity slot that is never drawn
    if raw.is_empty() {
        raw.push(Instance::default().to_raw());
    }
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Instance Buffer"),
        contents: bytemuck::cast_slice(&raw),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

impl BufferWriter for InstanceBatch {
    fn write_to_buffer(&mut self, ctx: &crate::context::Context) {
        self.write_instances(&ctx.queue, &ctx.device);
    }
}

impl<'a> From<&'a InstanceBatch> for Instanced<'a> {
    fn from(batch: &'a InstanceBatch) -> Self {
        Instanced {
            instance: &batch.instance_buffer,
            model: &batch.model,
            amount: batch.instances.len(),
        }
    }
}

impl<'a> From<&'a InstanceBatch> for Render<'a> {
    fn from(batch: &'a InstanceBatch) -> Self {
        Render::Default(batch.into())
    }
}
