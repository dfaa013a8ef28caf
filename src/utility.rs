// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod color;

use std::time::{Duration, Instant};

pub use self::color::*;

// Counts presented frames over one-second windows.
pub struct FrameCounter {
	window_start: Instant,
	frames: u32,
	fps: u32,
}

impl FrameCounter {
	const WINDOW: Duration = Duration::from_secs(1);

	pub fn new(now: Instant) -> Self {
		Self { window_start: now, frames: 0, fps: 0 }
	}

	// Records a frame. Returns true when the rate has been updated.
	pub fn tick(&mut self, now: Instant) -> bool {
		self.frames += 1;
		let elapsed = now.saturating_duration_since(self.window_start);
		if elapsed >= Self::WINDOW {
			self.fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round() as u32;
			self.frames = 0;
			self.window_start = now;
			true
		} else {
			false
		}
	}

	pub fn fps(&self) -> u32 {
		self.fps
	}
}

// The interval between frames at a given rate.
pub fn frame_interval(max_fps: u32) -> Duration {
	Duration::from_secs(1) / max_fps.max(1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_frames_per_second() {
		let start = Instant::now();
		let mut counter = FrameCounter::new(start);
		for i in 1..60 {
			assert!(!counter.tick(start + Duration::from_millis(i * 16)));
		}
		assert!(counter.tick(start + Duration::from_secs(1)));
		assert_eq!(counter.fps(), 60);
	}

	#[test]
	fn frame_interval_never_divides_by_zero() {
		assert_eq!(frame_interval(0), Duration::from_secs(1));
		assert_eq!(frame_interval(100), Duration::from_millis(10));
	}
}
