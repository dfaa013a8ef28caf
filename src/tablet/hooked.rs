// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// A device together with the hook observing it. The hook is always dropped
// before the device, and both are dropped at most once.
pub struct Hooked<H, D> {
	hook: Option<H>,
	device: Option<D>,
}

impl<H, D> Hooked<H, D> {
	pub fn new(hook: H, device: D) -> Self {
		Self { hook: Some(hook), device: Some(device) }
	}

	pub fn device(&self) -> Option<&D> {
		self.device.as_ref()
	}

	pub fn is_open(&self) -> bool {
		self.device.is_some()
	}

	// Returns whether the device was open before this call.
	pub fn release(&mut self) -> bool {
		drop(self.hook.take());
		self.device.take().is_some()
	}
}

impl<H, D> Drop for Hooked<H, D> {
	fn drop(&mut self) {
		self.release();
	}
}
