// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::convert::Infallible;

use embedded_graphics::{
	pixelcolor::{Rgb888, RgbColor},
	prelude::*,
	primitives::Rectangle,
};

// An RGBA8 image that can be drawn on with embedded-graphics primitives.
pub struct Raster {
	size: Size,
	pixels: Vec<[u8; 4]>,
}

fn rgba(color: Rgb888) -> [u8; 4] {
	[color.r(), color.g(), color.b(), 0xff]
}

impl Raster {
	pub fn new(width: u32, height: u32, color: Rgb888) -> Self {
		Self {
			size: Size::new(width, height),
			pixels: vec![rgba(color); width as usize * height as usize],
		}
	}

	pub fn width(&self) -> u32 {
		self.size.width
	}

	pub fn height(&self) -> u32 {
		self.size.height
	}

	// Resizes the raster. The contents are unspecified afterwards.
	pub fn resize(&mut self, width: u32, height: u32) {
		if self.size != Size::new(width, height) {
			self.size = Size::new(width, height);
			self.pixels.resize(width as usize * height as usize, [0, 0, 0, 0xff]);
		}
	}

	fn index(&self, point: Point) -> Option<usize> {
		let x = u32::try_from(point.x).ok().filter(|&x| x < self.size.width)?;
		let y = u32::try_from(point.y).ok().filter(|&y| y < self.size.height)?;
		Some(y as usize * self.size.width as usize + x as usize)
	}

	pub fn get(&self, point: Point) -> Option<Rgb888> {
		self.index(point).map(|i| {
			let [r, g, b, _] = self.pixels[i];
			Rgb888::new(r, g, b)
		})
	}

	pub fn contains(&self, point: Point) -> bool {
		self.index(point).is_some()
	}

	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.pixels)
	}

	// Copies another raster onto this one with its top-left corner at the origin, clipping to bounds.
	pub fn blit(&mut self, source: &Raster, origin: Point) {
		let target = Rectangle::new(origin, source.size).intersection(&self.bounding_box());
		let Some(bottom_right) = target.bottom_right() else {
			return;
		};
		let width = target.size.width as usize;
		for y in target.top_left.y..=bottom_right.y {
			let (Some(from), Some(to)) = (source.index(Point::new(target.top_left.x - origin.x, y - origin.y)), self.index(Point::new(target.top_left.x, y))) else {
				continue;
			};
			self.pixels[to..to + width].copy_from_slice(&source.pixels[from..from + width]);
		}
	}
}

impl OriginDimensions for Raster {
	fn size(&self) -> Size {
		self.size
	}
}

impl DrawTarget for Raster {
	type Color = Rgb888;
	type Error = Infallible;

	fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
	where
		I: IntoIterator<Item = Pixel<Self::Color>>,
	{
		for Pixel(point, color) in pixels {
			if let Some(i) = self.index(point) {
				self.pixels[i] = rgba(color);
			}
		}
		Ok(())
	}

	fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
		self.pixels.fill(rgba(color));
		Ok(())
	}
}

// Unwraps the result of drawing onto a raster, which cannot fail.
pub fn infallible<T>(result: Result<T, Infallible>) -> T {
	match result {
		Ok(value) => value,
		Err(never) => match never {},
	}
}

#[cfg(test)]
mod tests {
	use embedded_graphics::primitives::{Circle, PrimitiveStyle};

	use super::*;

	#[test]
	fn out_of_bounds_pixels_are_clipped() {
		let mut raster = Raster::new(4, 4, Rgb888::WHITE);
		infallible(raster.draw_iter([Pixel(Point::new(-1, 0), Rgb888::BLACK), Pixel(Point::new(4, 1), Rgb888::BLACK), Pixel(Point::new(2, 3), Rgb888::BLACK)]));
		assert_eq!(raster.get(Point::new(2, 3)), Some(Rgb888::BLACK));
		assert_eq!(raster.get(Point::new(3, 1)), Some(Rgb888::WHITE));
		assert_eq!(raster.get(Point::new(4, 1)), None);
	}

	#[test]
	fn bytes_are_rgba() {
		let raster = Raster::new(2, 1, Rgb888::new(1, 2, 3));
		assert_eq!(raster.as_bytes(), &[1, 2, 3, 0xff, 1, 2, 3, 0xff]);
	}

	#[test]
	fn blit_clips_to_destination() {
		let mut target = Raster::new(10, 10, Rgb888::WHITE);
		let source = Raster::new(4, 4, Rgb888::BLACK);
		target.blit(&source, Point::new(8, -2));

		assert_eq!(target.get(Point::new(8, 0)), Some(Rgb888::BLACK));
		assert_eq!(target.get(Point::new(9, 1)), Some(Rgb888::BLACK));
		assert_eq!(target.get(Point::new(9, 2)), Some(Rgb888::WHITE));
		assert_eq!(target.get(Point::new(7, 0)), Some(Rgb888::WHITE));
	}

	#[test]
	fn blit_outside_is_a_no_op() {
		let mut target = Raster::new(10, 10, Rgb888::WHITE);
		let source = Raster::new(4, 4, Rgb888::BLACK);
		target.blit(&source, Point::new(20, 20));
		assert!(target.as_bytes().iter().all(|&b| b == 0xff));
	}

	#[test]
	fn primitives_draw_onto_raster() {
		let mut raster = Raster::new(21, 21, Rgb888::WHITE);
		infallible(Circle::with_center(Point::new(10, 10), 9).into_styled(PrimitiveStyle::with_fill(Rgb888::BLACK)).draw(&mut raster));
		assert_eq!(raster.get(Point::new(10, 10)), Some(Rgb888::BLACK));
		assert_eq!(raster.get(Point::new(0, 0)), Some(Rgb888::WHITE));
	}
}
