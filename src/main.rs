// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// We disable windows_subsystem = "windows" in debug mode to show wgpu validation errors.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod canvas;
mod config;
#[path = "input/_.rs"]
mod input;
mod raster;
#[path = "render/_.rs"]
mod render;
#[path = "tablet/_.rs"]
mod tablet;
mod ui;
mod utility;
#[cfg(target_os = "windows")]
mod windows;

use app::App;
use config::Config;
use winit::{dpi::PhysicalSize, event_loop::EventLoop, window::WindowBuilder};

pub const APP_NAME_CAPITALIZED: &str = "Gouache";
pub const APP_NAME_LOWERCASE: &str = "gouache";

// Program entry point.
fn main() -> anyhow::Result<()> {
	// Set up the event logger.
	env_logger::init();

	let config = Config::load().unwrap_or_default();

	// Initialize the event loop.
	let event_loop = EventLoop::new()?;

	// The window stays hidden until the renderer is ready to draw to it.
	let [width, height] = config.window_size;
	let window = WindowBuilder::new()
		.with_title(APP_NAME_CAPITALIZED)
		.with_inner_size(PhysicalSize::new(width, height))
		.with_visible(false)
		.build(&event_loop)?;

	// Initialize the app at the window and run it with its event loop.
	let app = App::new(&window, config)?;
	app.run(event_loop)
}
