// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Swapchain Renderer
//!
//! Drives one `Scene` against a window.  The context, frame sync and scene resources live as long
//! as the window.  Everything sized by the swapchain is rebuilt together whenever the surface
//! changes: the swapchain itself, the render pass, framebuffers, pipeline and command buffers.
//!
//! While the window is minimized there is no swapchain and frames are skipped.

use ash::vk;

use hellovk_assets::AssetDirs;
use hellovk_vulkan::{
    commands,
    pipeline::{GraphicsPipeline, PipelineDesc},
    prelude::*,
    render_pass,
    swapchain::{PresentPreference, Swapchain},
    sync::FrameSync,
};
use hellovk_window::{AppWindow, Renderer, Size};

use crate::scene::Scene;

/// Everything rebuilt with the swapchain.
struct SwapchainObjects {
    swapchain: Swapchain,
    render_pass: vk::RenderPass,
    framebuffers: Vec<vk::Framebuffer>,
    pipeline: GraphicsPipeline,
    command_buffers: Vec<vk::CommandBuffer>,
}

impl SwapchainObjects {
    fn extent(size: Size) -> vk::Extent2D {
        vk::Extent2D {
            width: size.width,
            height: size.height,
        }
    }

    fn new<S: Scene>(
        context: &VkContext,
        scene: &mut S,
        assets: &AssetDirs,
        size: Size,
        present: PresentPreference,
    ) -> Result<Self, VulkanError> {
        let device = context.device();
        let swapchain = Swapchain::new(context, Self::extent(size), present)?;
        if let Err(e) = scene.attach(context, &swapchain) {
            scene.detach(device);
            swapchain.destroy(device);
            return Err(e);
        }

        let mut objects = Self {
            swapchain,
            render_pass: vk::RenderPass::null(),
            framebuffers: Vec::new(),
            pipeline: GraphicsPipeline {
                layout: vk::PipelineLayout::null(),
                pipeline: vk::Pipeline::null(),
            },
            command_buffers: Vec::new(),
        };
        // Destroying null handles is a no-op, so a partial build tears down like a full one.
        if let Err(e) = objects.build(context, scene, assets) {
            objects.destroy(context, scene);
            return Err(e);
        }
        Ok(objects)
    }

    fn build<S: Scene>(
        &mut self,
        context: &VkContext,
        scene: &S,
        assets: &AssetDirs,
    ) -> Result<(), VulkanError> {
        let device = context.device();
        let extent = self.swapchain.extent;

        self.render_pass = render_pass::create_render_pass(device, self.swapchain.format.format)?;
        self.framebuffers = render_pass::create_framebuffers(
            device,
            self.render_pass,
            self.swapchain.views(),
            extent,
        )?;

        let vertex_bindings = scene.vertex_bindings();
        let vertex_attributes = scene.vertex_attributes();
        let set_layouts = scene.set_layouts();
        let desc = PipelineDesc {
            vertex_shader: scene.vertex_shader(),
            fragment_shader: scene.fragment_shader(),
            vertex_bindings: &vertex_bindings,
            vertex_attributes: &vertex_attributes,
            set_layouts: &set_layouts,
            front_face: scene.front_face(),
            extent,
            render_pass: self.render_pass,
        };
        self.pipeline = GraphicsPipeline::new(device, assets, &desc)?;

        self.command_buffers = commands::allocate(
            device,
            context.queues.graphics_pool(),
            self.framebuffers.len() as u32,
        )?;
        for (i, (cb, framebuffer)) in self
            .command_buffers
            .iter()
            .zip(&self.framebuffers)
            .enumerate()
        {
            let pipeline = &self.pipeline;
            commands::record_pass(
                device,
                *cb,
                self.render_pass,
                *framebuffer,
                extent,
                |device, cb| {
                    unsafe {
                        device.cmd_bind_pipeline(
                            cb,
                            vk::PipelineBindPoint::GRAPHICS,
                            pipeline.pipeline,
                        );
                    }
                    scene.record(device, cb, pipeline, i);
                },
            )?;
        }
        Ok(())
    }

    fn destroy<S: Scene>(&self, context: &VkContext, scene: &mut S) {
        let device = context.device();
        commands::free(device, context.queues.graphics_pool(), &self.command_buffers);
        self.pipeline.destroy(device);
        render_pass::destroy_framebuffers(device, &self.framebuffers);
        unsafe { device.destroy_render_pass(self.render_pass, None) };
        scene.detach(device);
        self.swapchain.destroy(device);
    }
}

pub struct SwapchainRenderer<S: Scene> {
    scene: S,
    options: ContextOptions,
    present: PresentPreference,
    assets: AssetDirs,

    context: Option<VkContext>,
    sync: Option<FrameSync>,
    objects: Option<SwapchainObjects>,
    scene_ready: bool,
}

impl<S: Scene> SwapchainRenderer<S> {
    pub fn new(
        scene: S,
        options: ContextOptions,
        present: PresentPreference,
        assets: AssetDirs,
    ) -> Self {
        Self {
            scene,
            options,
            present,
            assets,
            context: None,
            sync: None,
            objects: None,
            scene_ready: false,
        }
    }

    fn setup(&mut self, window: &AppWindow) -> Result<(), VulkanError> {
        let context = self.context.insert(VkContext::new(window, &self.options)?);
        self.sync = Some(FrameSync::new(context.device())?);
        // Scenes release whatever part of `init` succeeded.
        self.scene_ready = true;
        self.scene.init(context)?;
        self.rebuild(window.size())
    }

    /// Tear down swapchain objects and build new ones for `size`.  An empty size leaves none.
    fn rebuild(&mut self, size: Size) -> Result<(), VulkanError> {
        let Some(context) = &self.context else {
            return Ok(());
        };
        context.wait_idle()?;
        if let Some(objects) = self.objects.take() {
            objects.destroy(context, &mut self.scene);
        }
        if size.is_empty() {
            log::debug!("window minimized, swapchain released");
            return Ok(());
        }
        log::debug!("building swapchain for {}x{}", size.width, size.height);
        self.objects = Some(SwapchainObjects::new(
            context,
            &mut self.scene,
            &self.assets,
            size,
            self.present,
        )?);
        Ok(())
    }

    fn draw_frame(&mut self, window: &AppWindow) -> Result<(), VulkanError> {
        let (Some(context), Some(sync), Some(objects)) =
            (&self.context, &mut self.sync, &self.objects)
        else {
            return Ok(());
        };
        let device = context.device();
        let frame = sync.current();

        unsafe { device.wait_for_fences(&[frame.in_flight], true, u64::MAX)? };

        let Some((image_index, _suboptimal)) = objects.swapchain.acquire(frame.image_available)?
        else {
            log::info!("swapchain out of date on acquire");
            return self.rebuild(window.size());
        };

        // Only reset once a submit that signals the fence is certain.
        unsafe { device.reset_fences(&[frame.in_flight])? };

        self.scene
            .update(image_index as usize, objects.swapchain.extent);

        let wait_semaphores = [frame.image_available];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [objects.command_buffers[image_index as usize]];
        let signal_semaphores = [frame.render_finished];
        let submit = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);
        unsafe {
            device.queue_submit(context.queues.graphics_queue(), &[submit], frame.in_flight)?
        };

        let present_queue = context.queues.present_queue();
        let stale = objects
            .swapchain
            .present(present_queue, image_index, frame.render_finished)?;
        unsafe { device.queue_wait_idle(present_queue)? };
        sync.advance();

        if stale {
            log::info!("swapchain out of date on present");
            self.rebuild(window.size())?;
        }
        Ok(())
    }

    fn release(&mut self) {
        let Some(context) = self.context.take() else {
            return;
        };
        if let Err(e) = context.wait_idle() {
            log::error!("wait idle before teardown: {e}");
        }
        if let Some(objects) = self.objects.take() {
            objects.destroy(&context, &mut self.scene);
        }
        if self.scene_ready {
            self.scene.destroy(context.device());
            self.scene_ready = false;
        }
        if let Some(sync) = self.sync.take() {
            sync.destroy(context.device());
        }
        context.destroy();
    }
}

impl<S: Scene> Renderer for SwapchainRenderer<S> {
    type Error = VulkanError;

    fn create(&mut self, window: &AppWindow) -> Result<(), VulkanError> {
        let created = self.setup(window);
        if created.is_err() {
            self.release();
        }
        created
    }

    fn resize(&mut self, _window: &AppWindow, size: Size) -> Result<(), VulkanError> {
        self.rebuild(size)
    }

    fn render(&mut self, window: &AppWindow) -> Result<(), VulkanError> {
        self.draw_frame(window)
    }

    fn destroy(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_extent_from_size() {
        let extent = SwapchainObjects::extent(Size::new(800, 600));
        assert_eq!((extent.width, extent.height), (800, 600));
    }
}
