// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;

use kdl::{KdlDocument, KdlValue};
use log::{debug, warn};

use crate::{utility::SRGB8, APP_NAME_LOWERCASE};

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
	pub window_size: [u32; 2],
	pub canvas_size: u32,
	pub brush_size: f32,
	pub stroke_steps: u32,
	pub max_fps: u32,
	pub tablet_device: u32,
	pub canvas_color: SRGB8,
	pub background_color: SRGB8,
	pub stroke_color: SRGB8,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			window_size: [1280, 720],
			canvas_size: 700,
			brush_size: 20.,
			stroke_steps: 50,
			max_fps: 165,
			tablet_device: 0,
			canvas_color: SRGB8::WHITE,
			background_color: SRGB8([200, 200, 200]),
			stroke_color: SRGB8::BLACK,
		}
	}
}

impl Config {
	pub fn load() -> Option<Self> {
		let mut config_file_path = dirs::config_dir()?;
		config_file_path.push(APP_NAME_LOWERCASE);
		if !config_file_path.exists() {
			std::fs::create_dir(config_file_path.clone()).ok()?;
		}
		config_file_path.push(format!("{APP_NAME_LOWERCASE}.kdl"));
		if !config_file_path.exists() {
			File::create(&config_file_path).ok()?;
			debug!("Created empty configuration at {}.", config_file_path.display());
			return None;
		}

		let config_file_data = std::fs::read_to_string(&config_file_path).ok()?;
		let config = Self::parse(&config_file_data);
		if config.is_none() {
			warn!("Ignoring malformed configuration at {}.", config_file_path.display());
		}
		config
	}

	// Reads a configuration document. Missing or invalid entries keep their defaults.
	pub fn parse(source: &str) -> Option<Self> {
		let document = source.parse::<KdlDocument>().ok()?;

		let default = Self::default();

		let window_size = parse_kdl_integer_array(document.get_args("window-size")).filter(|size: &[u32; 2]| size.iter().all(|&n| n > 0)).unwrap_or(default.window_size);
		let [canvas_size] = parse_kdl_integer_array(document.get_args("canvas-size")).filter(|&[n]: &[u32; 1]| n > 0).unwrap_or([default.canvas_size]);
		let brush_size = parse_kdl_f64(document.get_args("brush-size")).filter(|&n| n.is_finite() && n >= 0. && n <= f64::from(canvas_size)).map_or(default.brush_size, |n| n as f32);
		let [stroke_steps] = parse_kdl_integer_array(document.get_args("stroke-steps")).filter(|&[n]: &[u32; 1]| n > 0).unwrap_or([default.stroke_steps]);
		let [max_fps] = parse_kdl_integer_array(document.get_args("max-fps")).filter(|&[n]: &[u32; 1]| n > 0).unwrap_or([default.max_fps]);
		let [tablet_device] = parse_kdl_integer_array(document.get_args("tablet-device")).unwrap_or([default.tablet_device]);
		let canvas_color = parse_kdl_integer_array(document.get_args("canvas-color")).map(SRGB8).unwrap_or(default.canvas_color);
		let background_color = parse_kdl_integer_array(document.get_args("background-color")).map(SRGB8).unwrap_or(default.background_color);
		let stroke_color = parse_kdl_integer_array(document.get_args("stroke-color")).map(SRGB8).unwrap_or(default.stroke_color);

		Some(Config {
			window_size,
			canvas_size,
			brush_size,
			stroke_steps,
			max_fps,
			tablet_device,
			canvas_color,
			background_color,
			stroke_color,
		})
	}
}

fn parse_kdl_f64<'a>(values: impl AsRef<[&'a KdlValue]>) -> Option<f64> {
	let [n] = values.as_ref() else {
		return None;
	};
	n.as_f64().or_else(|| n.as_i64().map(|n| n as f64))
}

fn parse_kdl_integer_array<'a, T: TryFrom<i64>, const N: usize>(values: impl AsRef<[&'a KdlValue]>) -> Option<[T; N]> {
	let values = values.as_ref().iter().map(|value| value.as_i64().and_then(|n| T::try_from(n).ok())).collect::<Option<Vec<T>>>()?;
	<[T; N]>::try_from(values).ok()
}
