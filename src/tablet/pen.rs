// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Last-known readings of the pen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PenState {
	// Position in tablet output coordinates.
	pub x: i32,
	pub y: i32,
	// Clockwise angle of the pen around the Z axis, in degrees.
	pub azimuth: f32,
	// Angle of the pen with the XY plane, in degrees.
	pub tilt: f32,
	// Normal pressure of the pen in [0, 1].
	pub pressure: f32,
}

// The raw range of the pressure axis, as reported by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressureRange {
	min: i32,
	max: i32,
}

impl PressureRange {
	// Returns None for an empty or inverted range, which cannot be normalized.
	pub fn new(min: i32, max: i32) -> Option<Self> {
		(max > min).then_some(Self { min, max })
	}

	pub fn min(self) -> i32 {
		self.min
	}

	pub fn max(self) -> i32 {
		self.max
	}

	pub fn contains(self, raw: u32) -> bool {
		(i64::from(self.min)..=i64::from(self.max)).contains(&i64::from(raw))
	}

	// Maps a raw sample affinely into [0, 1], clamping samples outside the advertised range.
	pub fn normalize(self, raw: u32) -> f32 {
		let offset = i64::from(raw) - i64::from(self.min);
		let span = i64::from(self.max) - i64::from(self.min);
		(offset as f64 / span as f64).clamp(0., 1.) as f32
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_pen_is_neutral() {
		let pen = PenState::default();
		assert_eq!(pen.pressure, 0.);
		assert_eq!(pen.azimuth, 0.);
		assert_eq!(pen.tilt, 0.);
		assert_eq!((pen.x, pen.y), (0, 0));
	}

	#[test]
	fn degenerate_ranges_are_rejected() {
		assert!(PressureRange::new(0, 0).is_none());
		assert!(PressureRange::new(1023, 0).is_none());
		assert!(PressureRange::new(0, 1).is_some());
	}

	#[test]
	fn endpoints_map_to_unit_bounds() {
		let range = PressureRange::new(0, 1023).unwrap();
		assert_eq!(range.normalize(0), 0.);
		assert_eq!(range.normalize(1023), 1.);

		let range = PressureRange::new(-512, 511).unwrap();
		assert!((range.normalize(0) - 512. / 1023.).abs() < 1e-6);
		assert_eq!(range.normalize(511), 1.);
	}

	#[test]
	fn in_range_samples_stay_in_unit_interval() {
		let range = PressureRange::new(100, 8191).unwrap();
		for raw in (100..=8191).step_by(7) {
			let pressure = range.normalize(raw);
			assert!((0. ..=1.).contains(&pressure), "{raw} mapped to {pressure}");
		}
		assert!(range.normalize(4000) < range.normalize(4001));
	}

	#[test]
	fn out_of_range_samples_are_clamped() {
		let range = PressureRange::new(100, 8191).unwrap();
		assert!(!range.contains(50));
		assert_eq!(range.normalize(50), 0.);
		assert!(!range.contains(9000));
		assert_eq!(range.normalize(9000), 1.);
		assert!(range.contains(100));
		assert!(range.contains(8191));
	}
}
