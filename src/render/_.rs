// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod texture;

use anyhow::Context;
use log::info;
use pollster::FutureExt;

use self::texture::Texture;
use crate::raster::Raster;

// This struct stores the current state of the WGPU renderer.
pub struct Renderer<'window> {
	surface: wgpu::Surface<'window>,
	device: wgpu::Device,
	queue: wgpu::Queue,
	pub config: wgpu::SurfaceConfiguration,
	pub clear_color: wgpu::Color,
	render_pipeline: wgpu::RenderPipeline,
	frame_bind_group_layout: wgpu::BindGroupLayout,
	frame_sampler: wgpu::Sampler,
	frame_texture: Texture,
}

impl<'window> Renderer<'window> {
	// Create an instance of the renderer.
	pub fn new(window: &'window winit::window::Window, width: u32, height: u32, clear_color: wgpu::Color) -> anyhow::Result<Self> {
		// We create a WGPU instance and a surface on our window to draw to.
		let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
			backends: wgpu::Backends::all(),
			..Default::default()
		});
		let surface = instance.create_surface(window)?;

		// We request an adapter (a graphics card) that can draw to this surface.
		let adapter = instance
			.request_adapter(&wgpu::RequestAdapterOptions {
				power_preference: wgpu::PowerPreference::LowPower,
				compatible_surface: Some(&surface),
				force_fallback_adapter: false,
			})
			.block_on()
			.context("failed to find a graphics adapter compatible with the window")?;
		info!("Rendering with {:?}.", adapter.get_info().backend);

		// We use our adapter to create a device and queue.
		let (device, queue) = adapter
			.request_device(
				&wgpu::DeviceDescriptor {
					label: None,
					required_features: wgpu::Features::empty(),
					required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
				},
				None,
			)
			.block_on()?;

		// We define a configuration for our surface.
		let surface_capabilities = surface.get_capabilities(&adapter);
		let texture_format = surface_capabilities
			.formats
			.iter()
			.find(|f| f.is_srgb())
			.or_else(|| surface_capabilities.formats.first())
			.copied()
			.context("the window surface supports no texture formats")?;

		let config = wgpu::SurfaceConfiguration {
			usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
			format: texture_format,
			width: width.max(1),
			height: height.max(1),
			present_mode: surface_capabilities.present_modes.first().copied().unwrap_or(wgpu::PresentMode::Fifo),
			alpha_mode: surface_capabilities.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
			view_formats: vec![],
			desired_maximum_frame_latency: 2,
		};
		surface.configure(&device, &config);

		let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
			label: None,
			source: wgpu::ShaderSource::Wgsl(include_str!("shaders/frame.wgsl").into()),
		});

		let frame_bind_group_layout = Texture::bind_group_layout(&device);
		let frame_sampler = Texture::sampler(&device);
		let frame_texture = Texture::new(&device, &frame_bind_group_layout, &frame_sampler, [config.width, config.height]);

		let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
			label: None,
			bind_group_layouts: &[&frame_bind_group_layout],
			push_constant_ranges: &[],
		});

		let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
			label: None,
			layout: Some(&pipeline_layout),
			vertex: wgpu::VertexState {
				module: &shader_module,
				entry_point: "vs_main",
				compilation_options: Default::default(),
				buffers: &[],
			},
			fragment: Some(wgpu::FragmentState {
				module: &shader_module,
				entry_point: "fs_main",
				compilation_options: Default::default(),
				targets: &[Some(wgpu::ColorTargetState {
					format: texture_format,
					blend: Some(wgpu::BlendState::REPLACE),
					write_mask: wgpu::ColorWrites::ALL,
				})],
			}),
			primitive: wgpu::PrimitiveState {
				topology: wgpu::PrimitiveTopology::TriangleList,
				strip_index_format: None,
				front_face: wgpu::FrontFace::Ccw,
				cull_mode: None,
				polygon_mode: wgpu::PolygonMode::Fill,
				unclipped_depth: false,
				conservative: false,
			},
			depth_stencil: None,
			multisample: wgpu::MultisampleState {
				count: 1,
				mask: !0,
				alpha_to_coverage_enabled: false,
			},
			multiview: None,
		});

		// We return a new instance of our renderer state.
		Ok(Self {
			surface,
			device,
			queue,
			config,
			clear_color,
			render_pipeline,
			frame_bind_group_layout,
			frame_sampler,
			frame_texture,
		})
	}

	// Resize the renderer to a requested size.
	pub fn resize(&mut self, width: u32, height: u32) {
		// We ensure the requested size has nonzero dimensions before applying it.
		if width > 0 && height > 0 {
			self.config.width = width;
			self.config.height = height;
			self.surface.configure(&self.device, &self.config);
		}
	}

	pub fn reconfigure(&mut self) {
		self.surface.configure(&self.device, &self.config);
	}

	// Presents a CPU-composited frame, stretched over the whole surface.
	pub fn render(&mut self, frame: &Raster) -> Result<(), wgpu::SurfaceError> {
		if frame.width() == 0 || frame.height() == 0 {
			return Ok(());
		}

		if self.frame_texture.dimensions() != [frame.width(), frame.height()] {
			self.frame_texture = Texture::new(&self.device, &self.frame_bind_group_layout, &self.frame_sampler, [frame.width(), frame.height()]);
		}
		self.frame_texture.write(&self.queue, frame.as_bytes());

		// Set up the surface texture we will later render to.
		let output = self.surface.get_current_texture()?;
		let output_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

		// Set up the command buffer we will later send to the GPU.
		let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Render Encoder") });

		let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
			label: Some("render_pass"),
			color_attachments: &[Some(wgpu::RenderPassColorAttachment {
				view: &output_view,
				resolve_target: None,
				ops: wgpu::Operations {
					load: wgpu::LoadOp::Clear(self.clear_color),
					store: wgpu::StoreOp::Store,
				},
			})],
			depth_stencil_attachment: None,
			timestamp_writes: None,
			occlusion_query_set: None,
		});

		render_pass.set_pipeline(&self.render_pipeline);
		self.frame_texture.activate(&mut render_pass, 0);
		render_pass.draw(0..3, 0..1);

		drop(render_pass);

		// Submit our commands and schedule the resultant texture for presentation.
		self.queue.submit(std::iter::once(encoder.finish()));
		output.present();

		// Return successfully.
		Ok(())
	}
}
