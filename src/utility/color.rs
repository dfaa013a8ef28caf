// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use embedded_graphics::pixelcolor::Rgb888;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Index, derive_more::IndexMut)]
pub struct SRGB8(pub [u8; 3]);

impl SRGB8 {
	pub const BLACK: Self = Self([0x00, 0x00, 0x00]);
	pub const WHITE: Self = Self([0xff, 0xff, 0xff]);

	pub fn to_rgb888(self) -> Rgb888 {
		let Self([r, g, b]) = self;
		Rgb888::new(r, g, b)
	}

	pub fn to_lrgba(self) -> LRGBA {
		let Self([r, g, b]) = self;
		LRGBA([r, g, b, 0xff].map(fast_srgb8::srgb8_to_f32))
	}
}

#[repr(transparent)]
#[derive(Clone, Copy, Debug, derive_more::Index, derive_more::IndexMut)]
pub struct LRGBA(pub [f32; 4]);

impl LRGBA {
	pub fn to_wgpu(self) -> wgpu::Color {
		let [r, g, b, a] = self.0.map(f64::from);
		wgpu::Color { r, g, b, a }
	}
}
