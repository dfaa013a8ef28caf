// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use embedded_graphics::{
	mono_font::{iso_8859_1::FONT_10X20, MonoTextStyle},
	pixelcolor::{Rgb888, RgbColor},
	prelude::*,
	primitives::{Circle, CornerRadii, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle},
	text::{Baseline, Text},
};

use crate::{
	raster::{infallible, Raster},
	tablet::PenState,
};

const PREVIEW_COLOR: Rgb888 = Rgb888::new(0x00, 0xff, 0x1e);
const TEXT_COLOR: Rgb888 = Rgb888::BLACK;
const POINTER_RADIUS: u32 = 3;
const BAR_SIZE: Size = Size::new(140, 10);
const BAR_CORNER: Size = Size::new(5, 5);

// The brush outline drawn under the pointer. A weightless pen previews the full size.
pub fn preview_radius(pressure: f32, brush_size: f32) -> f32 {
	if pressure == 0. {
		brush_size
	} else {
		pressure * brush_size
	}
}

pub fn pressure_label(pen: &PenState) -> String {
	format!("Pen pressure: {}%", (pen.pressure * 100.).round() as i32)
}

pub fn azimuth_label(pen: &PenState) -> String {
	format!("Azimuth: {:.1}°", pen.azimuth)
}

pub fn tilt_label(pen: &PenState) -> String {
	format!("Tilt:    {:.1}°", pen.tilt)
}

// Draws the brush preview and a small dot marking the pointer.
pub fn draw_cursor(frame: &mut Raster, position: [f32; 2], radius: f32) {
	let center = Point::new(position[0].round() as i32, position[1].round() as i32);

	// Anything wider than the frame only outlines offscreen.
	let radius = (radius.round().max(0.) as u32).min(frame.width() + frame.height());
	infallible(Circle::with_center(center, radius.saturating_mul(2).saturating_add(1)).into_styled(PrimitiveStyle::with_stroke(PREVIEW_COLOR, 1)).draw(frame));

	let dot_style = PrimitiveStyleBuilder::new().fill_color(Rgb888::WHITE).stroke_color(Rgb888::BLACK).stroke_width(1).build();
	infallible(Circle::with_center(center, 2 * POINTER_RADIUS + 1).into_styled(dot_style).draw(frame));
}

// Draws the pen readings as a column of text with a pressure gauge, starting at the origin.
pub fn draw_readout(frame: &mut Raster, pen: &PenState, origin: Point) {
	let text_style = MonoTextStyle::new(&FONT_10X20, TEXT_COLOR);

	infallible(Text::with_baseline(&pressure_label(pen), origin, text_style, Baseline::Top).draw(frame));

	let bar = Rectangle::new(origin + Point::new(0, 30), BAR_SIZE);
	infallible(RoundedRectangle::with_equal_corners(bar, BAR_CORNER).into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE)).draw(frame));

	let filled_width = (BAR_SIZE.width as f32 * pen.pressure.clamp(0., 1.)).round() as u32;
	if filled_width > 0 {
		let filled = Rectangle::new(bar.top_left, Size::new(filled_width, BAR_SIZE.height));
		let corners = CornerRadii {
			top_left: BAR_CORNER,
			top_right: Size::zero(),
			bottom_right: Size::zero(),
			bottom_left: BAR_CORNER,
		};
		infallible(RoundedRectangle::new(filled, corners).into_styled(PrimitiveStyle::with_fill(TEXT_COLOR)).draw(frame));
	}

	infallible(Text::with_baseline(&azimuth_label(pen), origin + Point::new(0, 50), text_style, Baseline::Top).draw(frame));
	infallible(Text::with_baseline(&tilt_label(pen), origin + Point::new(0, 80), text_style, Baseline::Top).draw(frame));
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn preview_uses_full_size_without_pressure() {
		assert_eq!(preview_radius(0., 20.), 20.);
		assert_eq!(preview_radius(0.25, 20.), 5.);
		assert_eq!(preview_radius(1., 20.), 20.);
	}

	#[test]
	fn labels_round_readings() {
		let pen = PenState { pressure: 0.456, azimuth: 123.46, tilt: 60., ..Default::default() };
		assert_eq!(pressure_label(&pen), "Pen pressure: 46%");
		assert_eq!(azimuth_label(&pen), "Azimuth: 123.5°");
		assert_eq!(tilt_label(&pen), "Tilt:    60.0°");
	}

	#[test]
	fn gauge_fills_with_pressure() {
		let background = Rgb888::new(200, 200, 200);
		let origin = Point::new(10, 10);
		let gauge_row = origin.y + 35;

		let mut frame = Raster::new(200, 120, background);
		draw_readout(&mut frame, &PenState { pressure: 0.5, ..Default::default() }, origin);
		assert_eq!(frame.get(Point::new(origin.x + 40, gauge_row)), Some(TEXT_COLOR));
		assert_eq!(frame.get(Point::new(origin.x + 100, gauge_row)), Some(Rgb888::WHITE));

		let mut frame = Raster::new(200, 120, background);
		draw_readout(&mut frame, &PenState::default(), origin);
		assert_eq!(frame.get(Point::new(origin.x + 40, gauge_row)), Some(Rgb888::WHITE));
	}

	#[test]
	fn oversized_preview_is_drawn_offscreen() {
		let background = Rgb888::new(200, 200, 200);
		let mut frame = Raster::new(40, 40, background);
		draw_cursor(&mut frame, [20., 20.], 3e9);
		assert_eq!(frame.get(Point::new(20, 20)), Some(Rgb888::WHITE));
		assert_eq!(frame.get(Point::new(0, 0)), Some(background));
	}

	#[test]
	fn cursor_marks_the_pointer() {
		let mut frame = Raster::new(100, 100, Rgb888::new(200, 200, 200));
		draw_cursor(&mut frame, [50., 50.], 20.);
		assert_eq!(frame.get(Point::new(50, 50)), Some(Rgb888::WHITE));
		assert_eq!(frame.get(Point::new(50, 30)), Some(PREVIEW_COLOR));
	}
}
