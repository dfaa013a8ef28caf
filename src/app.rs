// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::time::Instant;

use embedded_graphics::prelude::*;
use log::{debug, error};
use winit::{
	event::*,
	event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
};

use crate::{
	canvas::{brush_radius, Canvas},
	config::Config,
	input::{InputMonitor, Key},
	raster::{infallible, Raster},
	render::Renderer,
	tablet::Tablet,
	ui,
	utility::{frame_interval, FrameCounter},
	APP_NAME_CAPITALIZED,
};

// Current state of our app.
pub struct App<'window> {
	pub config: Config,
	pub renderer: Renderer<'window>,
	pub pending_resize: Option<winit::dpi::PhysicalSize<u32>>,
	pub tablet: Tablet,
	pub canvas: Canvas,
	pub frame: Raster,
	pub input_monitor: InputMonitor,
	pub last_pointer_position: Option<[f32; 2]>,
	pub was_pointer_down: bool,
	pub is_cursor_visible: bool,
	pub frame_counter: FrameCounter,
	pub next_frame_instant: Instant,
	pub window: &'window winit::window::Window,
}

impl<'window> App<'window> {
	// Sets up the renderer and attempts to connect to a tablet.
	pub fn new(window: &'window winit::window::Window, config: Config) -> anyhow::Result<Self> {
		// Attempt to establish a tablet context.
		let tablet = Tablet::connect(window, config.tablet_device);

		// Set up the renderer.
		let size = window.inner_size();
		let renderer = Renderer::new(window, size.width, size.height, config.background_color.to_lrgba().to_wgpu())?;

		let canvas = Canvas::new(config.canvas_size, config.canvas_color.to_rgb888(), config.stroke_color.to_rgb888());
		let frame = Raster::new(size.width, size.height, config.background_color.to_rgb888());

		window.set_visible(true);

		let now = Instant::now();

		// Return a new instance of the app state.
		Ok(Self {
			config,
			renderer,
			pending_resize: None,
			tablet,
			canvas,
			frame,
			input_monitor: InputMonitor::new(),
			last_pointer_position: None,
			was_pointer_down: false,
			is_cursor_visible: true,
			frame_counter: FrameCounter::new(now),
			next_frame_instant: now,
			window,
		})
	}

	// Runs the event loop with the event handler.
	pub fn run(mut self, event_loop: EventLoop<()>) -> anyhow::Result<()> {
		self.update_window_title();

		event_loop.run(move |event, window_target| self.handle_event(event, window_target))?;
		Ok(())
	}

	// Handles a single event.
	fn handle_event(&mut self, event: Event<()>, window_target: &EventLoopWindowTarget<()>) {
		match event {
			Event::WindowEvent { ref event, window_id } if window_id == self.window.id() => 'window_event: {
				match event {
					// If the titlebar close button is clicked, exit the loop.
					WindowEvent::CloseRequested => self.exit(window_target),
					WindowEvent::KeyboardInput { event, .. } => {
						self.input_monitor.process_key_event(event);
					},
					WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
						self.input_monitor.process_mouse_input(*state);
					},
					WindowEvent::CursorMoved { position, .. } => {
						self.input_monitor.process_cursor_moved([position.x, position.y]);
					},
					WindowEvent::Touch(touch) => {
						self.input_monitor.process_touch(touch.phase, [touch.location.x, touch.location.y]);
					},
					// Packets are only reported while the cursor hovers the window.
					WindowEvent::CursorEntered { .. } => {
						if self.tablet.is_available() && !self.tablet.set_enabled(true) {
							debug!("The tablet context could not be enabled.");
						}
					},
					WindowEvent::CursorLeft { .. } => {
						self.input_monitor.process_cursor_left();
						if self.tablet.is_available() && !self.tablet.set_enabled(false) {
							debug!("The tablet context could not be disabled.");
						}
					},

					// Resize the window if requested to.
					WindowEvent::Resized(physical_size) => {
						self.pending_resize = Some(*physical_size);
					},

					// If a window redraw is requested, paint and present a frame.
					WindowEvent::RedrawRequested => {
						self.update_renderer();
						self.paint();
						self.compose();
						match self.renderer.render(&self.frame) {
							Ok(_) => {},
							Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.renderer.reconfigure(),
							Err(wgpu::SurfaceError::OutOfMemory) => self.exit(window_target),
							Err(e) => error!("{:?}", e),
						}
						if self.frame_counter.tick(Instant::now()) {
							self.update_window_title();
						}
						break 'window_event;
					},

					// Ignore all other window events.
					_ => break 'window_event,
				}

				self.process_input(window_target);
			},

			// Pace frames to the configured rate.
			Event::AboutToWait => {
				let now = Instant::now();
				if now >= self.next_frame_instant {
					self.window.request_redraw();
					self.next_frame_instant = now + frame_interval(self.config.max_fps);
				}
				if !window_target.exiting() {
					window_target.set_control_flow(ControlFlow::WaitUntil(self.next_frame_instant));
				}
			},

			Event::LoopExiting => self.tablet.release(),

			// Ignore all other events.
			_ => (),
		}
	}

	fn exit(&mut self, window_target: &EventLoopWindowTarget<()>) {
		self.tablet.release();
		window_target.exit();
	}

	fn process_input(&mut self, window_target: &EventLoopWindowTarget<()>) {
		if self.input_monitor.is_fresh {
			if self.input_monitor.was_pressed(Key::Escape) {
				self.exit(window_target);
			}
			if self.input_monitor.was_pressed(Key::R) {
				self.canvas.clear();
			}
		}

		// Reset inputs.
		self.input_monitor.defresh();
	}

	// Stamps the stroke travelled by the pointer since the last frame.
	fn paint(&mut self) {
		let position = self.input_monitor.pointer_position;
		let is_pointer_down = self.input_monitor.is_pointer_down;

		if let (true, Some(end)) = (is_pointer_down, position) {
			// A fresh press starts where it lands rather than where the pointer last hovered.
			let start = self.last_pointer_position.filter(|_| self.was_pointer_down).unwrap_or(end);
			let radius = brush_radius(self.tablet.pen().pressure, self.input_monitor.is_pen_down, self.config.brush_size);
			self.canvas.stroke(start, end, radius, self.config.stroke_steps);
		}

		self.last_pointer_position = position;
		self.was_pointer_down = is_pointer_down;
	}

	// Draws the canvas, the brush preview, and the pen readout into the frame.
	fn compose(&mut self) {
		let pen = self.tablet.pen();

		infallible(self.frame.clear(self.config.background_color.to_rgb888()));
		self.frame.blit(self.canvas.raster(), Point::zero());

		let hovered_position = self.input_monitor.pointer_position.filter(|&position| self.canvas.contains(position));
		self.set_cursor_visible(hovered_position.is_none());
		if let Some(position) = hovered_position {
			ui::draw_cursor(&mut self.frame, position, ui::preview_radius(pen.pressure, self.config.brush_size));
		}

		let readout_origin = Point::new(self.canvas.raster().width() as i32 + 15, 10);
		ui::draw_readout(&mut self.frame, &pen, readout_origin);
	}

	fn set_cursor_visible(&mut self, is_visible: bool) {
		if self.is_cursor_visible != is_visible {
			self.window.set_cursor_visible(is_visible);
			self.is_cursor_visible = is_visible;
		}
	}

	pub fn update_window_title(&mut self) {
		self.window.set_title(&format!("{}  @{}FPS", APP_NAME_CAPITALIZED, self.frame_counter.fps()));
	}

	fn update_renderer(&mut self) {
		// Apply a resize if necessary; resizes are time-intensive.
		if let Some(size) = self.pending_resize.take() {
			self.renderer.resize(size.width, size.height);
			self.frame.resize(size.width, size.height);
		}
	}
}
