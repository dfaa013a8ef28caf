// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Decoding runs on every platform; only the driver binding is Windows-specific.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub mod hooked;
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub mod packet;
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
pub mod pen;
#[cfg(target_os = "windows")]
pub mod wintab;

use log::warn;

pub use self::pen::PenState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Display)]
pub enum TabletError {
	#[display(fmt = "no compatible tablet device is available")]
	DeviceUnavailable,
	#[display(fmt = "the tablet driver refused to open a context")]
	ContextOpenFailed,
	#[display(fmt = "the tablet driver returned no usable device information")]
	QueryFailed,
}

impl std::error::Error for TabletError {}

// Pressure-sensitive input, where the platform provides it.
pub enum Tablet {
	// No tablet; the pen always reads as neutral.
	Absent,
	#[cfg(target_os = "windows")]
	Wintab(wintab::WintabTablet),
}

impl Tablet {
	// Opens the tablet, or falls back to an absent one.
	pub fn connect(window: &winit::window::Window, device_index: u32) -> Self {
		match Self::open(window, device_index) {
			Ok(tablet) => tablet,
			Err(error) => {
				warn!("Tablet features are unavailable: {error}.");
				Self::Absent
			},
		}
	}

	#[cfg(target_os = "windows")]
	pub fn open(window: &winit::window::Window, device_index: u32) -> Result<Self, TabletError> {
		wintab::WintabTablet::open(window, device_index).map(Self::Wintab)
	}

	#[cfg(not(target_os = "windows"))]
	pub fn open(_window: &winit::window::Window, _device_index: u32) -> Result<Self, TabletError> {
		log::info!("No tablet interface exists for this platform.");
		Err(TabletError::DeviceUnavailable)
	}

	// The most recent pen readings.
	pub fn pen(&self) -> PenState {
		match self {
			Self::Absent => PenState::default(),
			#[cfg(target_os = "windows")]
			Self::Wintab(tablet) => tablet.pen(),
		}
	}

	pub fn is_available(&self) -> bool {
		match self {
			Self::Absent => false,
			#[cfg(target_os = "windows")]
			Self::Wintab(tablet) => tablet.is_open(),
		}
	}

	// Enables or disables packet reporting. Returns whether the request was satisfied.
	pub fn set_enabled(&mut self, enable: bool) -> bool {
		match self {
			Self::Absent => false,
			#[cfg(target_os = "windows")]
			Self::Wintab(tablet) => tablet.enable(enable),
		}
	}

	// Releases the device. Later calls do nothing.
	pub fn release(&mut self) {
		match self {
			Self::Absent => {},
			#[cfg(target_os = "windows")]
			Self::Wintab(tablet) => tablet.release(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn absent_tablet_reads_neutral() {
		let tablet = Tablet::Absent;
		assert!(!tablet.is_available());
		assert_eq!(tablet.pen(), PenState::default());
	}

	#[test]
	fn release_twice_is_harmless() {
		let mut tablet = Tablet::Absent;
		tablet.release();
		tablet.release();
		assert_eq!(tablet.pen(), PenState::default());
	}

	#[test]
	fn enabling_absent_tablet_is_refused() {
		let mut tablet = Tablet::Absent;
		assert!(!tablet.set_enabled(true));
	}

	#[test]
	fn errors_describe_the_failure() {
		assert_eq!(TabletError::DeviceUnavailable.to_string(), "no compatible tablet device is available");
		assert_eq!(TabletError::ContextOpenFailed.to_string(), "the tablet driver refused to open a context");
		assert_eq!(TabletError::QueryFailed.to_string(), "the tablet driver returned no usable device information");
	}
}
