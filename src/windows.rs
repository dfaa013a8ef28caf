// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::marker::PhantomData;

use windows_sys::Win32::{
	Foundation::{HWND, LPARAM, LRESULT, WPARAM},
	UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass},
};

// Observes the messages delivered to a window.
pub trait MessageObserver {
	fn observe(&self, message: u32, wparam: WPARAM, lparam: LPARAM);
}

// An observer chained in front of a window's procedure. Removed on drop.
pub struct Subclass<O: MessageObserver> {
	hwnd: HWND,
	id: usize,
	_observer: PhantomData<*const O>,
}

impl<O: MessageObserver> Subclass<O> {
	// SAFETY: The observer must stay at the same address until the subclass is dropped.
	pub unsafe fn install(hwnd: HWND, observer: *const O) -> Option<Self> {
		// The observer's address doubles as the subclass ID, so several observers may coexist.
		let id = observer as usize;
		match unsafe { SetWindowSubclass(hwnd, Some(subclass_procedure::<O>), id, observer as usize) } {
			0 => None,
			_ => Some(Self { hwnd, id, _observer: PhantomData }),
		}
	}
}

impl<O: MessageObserver> Drop for Subclass<O> {
	fn drop(&mut self) {
		unsafe {
			RemoveWindowSubclass(self.hwnd, Some(subclass_procedure::<O>), self.id);
		}
	}
}

unsafe extern "system" fn subclass_procedure<O: MessageObserver>(hwnd: HWND, message: u32, wparam: WPARAM, lparam: LPARAM, _id: usize, observer: usize) -> LRESULT {
	unsafe {
		(*(observer as *const O)).observe(message, wparam, lparam);
		// Every message continues on to the previous procedure.
		DefSubclassProc(hwnd, message, wparam, lparam)
	}
}
