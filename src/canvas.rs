// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use embedded_graphics::{
	pixelcolor::Rgb888,
	prelude::*,
	primitives::{Circle, PrimitiveStyle},
};

use crate::raster::{infallible, Raster};

// Evenly spaced stamp centers along the segment from start towards end.
// A zero-length segment yields a single stamp at start.
pub fn stamp_positions(start: [f32; 2], end: [f32; 2], steps: u32) -> impl Iterator<Item = [f32; 2]> {
	let delta = [end[0] - start[0], end[1] - start[1]];
	let length = delta[0].hypot(delta[1]);
	let (direction, steps) = if length == 0. { ([0., 0.], 1) } else { ([delta[0] / length, delta[1] / length], steps.max(1)) };
	let step_length = length / steps as f32;
	(0..steps).map(move |i| {
		let distance = i as f32 * step_length;
		[start[0] + direction[0] * distance, start[1] + direction[1] * distance]
	})
}

// The stamp radius for the current input: pressure-weighted while a digitizer is pressed.
pub fn brush_radius(pressure: f32, is_pen_down: bool, brush_size: f32) -> f32 {
	if is_pen_down {
		pressure * brush_size
	} else {
		brush_size
	}
}

pub struct Canvas {
	raster: Raster,
	paper_color: Rgb888,
	ink_color: Rgb888,
}

impl Canvas {
	pub fn new(size: u32, paper_color: Rgb888, ink_color: Rgb888) -> Self {
		Self {
			raster: Raster::new(size, size, paper_color),
			paper_color,
			ink_color,
		}
	}

	pub fn raster(&self) -> &Raster {
		&self.raster
	}

	pub fn contains(&self, position: [f32; 2]) -> bool {
		position[0] >= 0. && position[1] >= 0. && self.raster.contains(Point::new(position[0] as i32, position[1] as i32))
	}

	pub fn clear(&mut self) {
		infallible(self.raster.clear(self.paper_color));
	}

	// Approximates a stroke by stamping filled circles along the segment.
	pub fn stroke(&mut self, start: [f32; 2], end: [f32; 2], radius: f32, steps: u32) {
		let radius = radius.round();
		if !(radius >= 1.) {
			return;
		}
		let style = PrimitiveStyle::with_fill(self.ink_color);
		// A stamp wider than the canvas covers all of it.
		let radius = (radius as u32).min(self.raster.width() + self.raster.height());
		let diameter = radius.saturating_mul(2).saturating_add(1);
		for [x, y] in stamp_positions(start, end, steps) {
			infallible(Circle::with_center(Point::new(x.round() as i32, y.round() as i32), diameter).into_styled(style).draw(&mut self.raster));
		}
	}
}

#[cfg(test)]
mod tests {
	use embedded_graphics::pixelcolor::RgbColor;

	use super::*;

	#[test]
	fn zero_length_path_stamps_once() {
		let stamps = stamp_positions([0., 0.], [0., 0.], 50).collect::<Vec<_>>();
		assert_eq!(stamps, vec![[0., 0.]]);

		let stamps = stamp_positions([12.5, 7.], [12.5, 7.], 50).collect::<Vec<_>>();
		assert_eq!(stamps, vec![[12.5, 7.]]);
	}

	#[test]
	fn stamps_are_evenly_spaced() {
		let steps = 8;
		let stamps = stamp_positions([0., 0.], [100., 0.], steps).collect::<Vec<_>>();
		assert_eq!(stamps.len(), steps as usize);
		for (i, [x, y]) in stamps.into_iter().enumerate() {
			assert!((x - 100. * i as f32 / steps as f32).abs() < 1e-4, "stamp {i} at {x}");
			assert_eq!(y, 0.);
		}
	}

	#[test]
	fn stamps_exclude_the_end_point() {
		let stamps = stamp_positions([0., 0.], [0., -30.], 3).collect::<Vec<_>>();
		assert_eq!(stamps.len(), 3);
		assert!((stamps[2][1] + 20.).abs() < 1e-4);
	}

	#[test]
	fn radius_follows_pressure_only_while_pen_is_down() {
		assert_eq!(brush_radius(0.5, true, 20.), 10.);
		assert_eq!(brush_radius(0., true, 20.), 0.);
		assert_eq!(brush_radius(0.5, false, 20.), 20.);
		assert_eq!(brush_radius(0., false, 20.), 20.);
	}

	#[test]
	fn stroke_inks_the_path() {
		let mut canvas = Canvas::new(100, Rgb888::WHITE, Rgb888::BLACK);
		canvas.stroke([10., 50.], [90., 50.], 3., 50);
		assert_eq!(canvas.raster().get(Point::new(10, 50)), Some(Rgb888::BLACK));
		assert_eq!(canvas.raster().get(Point::new(50, 50)), Some(Rgb888::BLACK));
		assert_eq!(canvas.raster().get(Point::new(50, 10)), Some(Rgb888::WHITE));

		canvas.clear();
		assert_eq!(canvas.raster().get(Point::new(50, 50)), Some(Rgb888::WHITE));
	}

	#[test]
	fn weightless_stroke_draws_nothing() {
		let mut canvas = Canvas::new(20, Rgb888::WHITE, Rgb888::BLACK);
		canvas.stroke([10., 10.], [10., 10.], 0.2, 50);
		assert!(canvas.raster().as_bytes().iter().all(|&b| b == 0xff));
	}

	#[test]
	fn oversized_stamp_floods_the_canvas() {
		let mut canvas = Canvas::new(20, Rgb888::WHITE, Rgb888::BLACK);
		canvas.stroke([10., 10.], [10., 10.], 3e9, 50);
		assert_eq!(canvas.raster().get(Point::new(0, 0)), Some(Rgb888::BLACK));
		assert_eq!(canvas.raster().get(Point::new(19, 19)), Some(Rgb888::BLACK));
	}

	#[test]
	fn containment_matches_canvas_bounds() {
		let canvas = Canvas::new(700, Rgb888::WHITE, Rgb888::BLACK);
		assert!(canvas.contains([0., 0.]));
		assert!(canvas.contains([699.5, 10.]));
		assert!(!canvas.contains([700., 10.]));
		assert!(!canvas.contains([-0.5, 10.]));
	}
}
