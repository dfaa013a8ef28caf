// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use enumset::{EnumSet, EnumSetType};
use winit::{
	event::{ElementState, KeyEvent, TouchPhase},
	keyboard::{KeyCode, PhysicalKey},
};

#[derive(EnumSetType, Debug)]
pub enum Key {
	Escape,
	R,
}

// Tracks the keyboard and the pointer between frames.
pub struct InputMonitor {
	pub active_keys: EnumSet<Key>,
	pub different_keys: EnumSet<Key>,
	pub pointer_position: Option<[f32; 2]>,
	// Whether the primary button or a touch contact is held.
	pub is_pointer_down: bool,
	// Whether the held pointer comes from a digitizer rather than a mouse.
	pub is_pen_down: bool,
	pub is_fresh: bool,
}

impl InputMonitor {
	pub fn new() -> Self {
		Self {
			active_keys: EnumSet::EMPTY,
			different_keys: EnumSet::EMPTY,
			pointer_position: None,
			is_pointer_down: false,
			is_pen_down: false,
			is_fresh: false,
		}
	}

	pub fn process_key_event(&mut self, key_event: &KeyEvent) {
		let key = match key_event.physical_key {
			PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
			PhysicalKey::Code(KeyCode::KeyR) => Key::R,
			_ => return,
		};
		self.process_key(key, key_event.state);
	}

	pub fn process_key(&mut self, key: Key, state: ElementState) {
		let is_active = state == ElementState::Pressed;
		if self.active_keys.contains(key) != is_active {
			self.different_keys.insert(key);
		}
		if is_active {
			self.active_keys.insert(key);
		} else {
			self.active_keys.remove(key);
		}
		self.is_fresh = true;
	}

	pub fn process_mouse_input(&mut self, state: ElementState) {
		self.is_pointer_down = state == ElementState::Pressed;
		self.is_pen_down = false;
		self.is_fresh = true;
	}

	pub fn process_cursor_moved(&mut self, position: [f64; 2]) {
		self.pointer_position = Some(position.map(|n| n as f32));
	}

	pub fn process_cursor_left(&mut self) {
		self.pointer_position = None;
	}

	// Pens and touchscreens report contacts as touches rather than mouse buttons.
	// A pen hovering in range also reports moves, so only the phase edges change the contact.
	pub fn process_touch(&mut self, phase: TouchPhase, location: [f64; 2]) {
		self.pointer_position = Some(location.map(|n| n as f32));
		match phase {
			TouchPhase::Started => {
				self.is_pointer_down = true;
				self.is_pen_down = true;
			},
			TouchPhase::Ended | TouchPhase::Cancelled => {
				self.is_pointer_down = false;
				self.is_pen_down = false;
			},
			TouchPhase::Moved => return,
		}
		self.is_fresh = true;
	}

	pub fn was_pressed(&self, key: Key) -> bool {
		self.active_keys.contains(key) && self.different_keys.contains(key)
	}

	pub fn defresh(&mut self) {
		self.different_keys = EnumSet::EMPTY;
		self.is_fresh = false;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_presses_register_once() {
		let mut monitor = InputMonitor::new();
		monitor.process_key(Key::R, ElementState::Pressed);
		assert!(monitor.was_pressed(Key::R));
		monitor.defresh();

		// Key repeat does not count as a new press.
		monitor.process_key(Key::R, ElementState::Pressed);
		assert!(!monitor.was_pressed(Key::R));

		monitor.process_key(Key::R, ElementState::Released);
		assert!(!monitor.was_pressed(Key::R));
		assert!(!monitor.active_keys.contains(Key::R));
	}

	#[test]
	fn mouse_presses_are_not_pen_presses() {
		let mut monitor = InputMonitor::new();
		monitor.process_mouse_input(ElementState::Pressed);
		assert!(monitor.is_pointer_down);
		assert!(!monitor.is_pen_down);

		monitor.process_mouse_input(ElementState::Released);
		assert!(!monitor.is_pointer_down);
	}

	#[test]
	fn touches_press_the_pen() {
		let mut monitor = InputMonitor::new();
		monitor.process_touch(TouchPhase::Started, [10., 20.]);
		assert!(monitor.is_pointer_down && monitor.is_pen_down);
		assert_eq!(monitor.pointer_position, Some([10., 20.]));

		monitor.process_touch(TouchPhase::Moved, [11., 21.]);
		assert_eq!(monitor.pointer_position, Some([11., 21.]));
		assert!(monitor.is_pointer_down && monitor.is_pen_down);

		monitor.process_touch(TouchPhase::Ended, [12., 22.]);
		assert!(!monitor.is_pointer_down && !monitor.is_pen_down);
		assert_eq!(monitor.pointer_position, Some([12., 22.]));
	}

	#[test]
	fn hovering_pen_does_not_press() {
		let mut monitor = InputMonitor::new();
		monitor.process_touch(TouchPhase::Moved, [10., 20.]);
		assert!(!monitor.is_pointer_down && !monitor.is_pen_down);
		assert_eq!(monitor.pointer_position, Some([10., 20.]));

		// Lifting the pen ends the press even if it keeps hovering.
		monitor.process_touch(TouchPhase::Started, [10., 20.]);
		monitor.process_touch(TouchPhase::Cancelled, [10., 20.]);
		monitor.process_touch(TouchPhase::Moved, [15., 25.]);
		assert!(!monitor.is_pointer_down && !monitor.is_pen_down);
	}

	#[test]
	fn leaving_the_window_forgets_the_pointer() {
		let mut monitor = InputMonitor::new();
		monitor.process_cursor_moved([5., 5.]);
		monitor.process_cursor_left();
		assert_eq!(monitor.pointer_position, None);
	}
}
