// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Bindings to the subset of the WinTab interface exported by wintab32.dll.
// See https://developer-docs.wacom.com/docs/icbt/windows/wintab/wintab-reference for details.

use std::{
	cell::RefCell,
	ffi::{c_int, c_uint, c_void},
	mem::{size_of, MaybeUninit},
	ptr::null_mut,
};

use bitflags::bitflags;
use log::{debug, info, trace};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use windows_sys::Win32::Foundation::{HWND, LPARAM, WPARAM};

use super::{
	hooked::Hooked,
	packet::{Packet, PacketFields, PacketQueue, PacketReceiver, WT_DEFBASE, WT_PACKET},
	pen::{PenState, PressureRange},
	TabletError,
};
use crate::windows::{MessageObserver, Subclass};

/*
WCHAR : u16
UINT : c_uint
WTPKT, DWORD, FIX32 : u32
LONG, int, BOOL : c_int
HCTX : *mut c_void
*/

// Information categories.
const WTI_INTERFACE: c_uint = 1;
const WTI_DEFSYSCTX: c_uint = 4; // Sets CXO_SYSTEM; see https://developer-docs.wacom.com/intuos-cintiq-business-tablets/docs/wintab-faqs for details
const WTI_DEVICES: c_uint = 100;

// Indices of WTI_INTERFACE.
const IFC_NDEVICES: c_uint = 4;

// Indices of WTI_DEVICES.
const DVC_NAME: c_uint = 1;
const DVC_PKTRATE: c_uint = 5;
const DVC_NPRESSURE: c_uint = 15;

bitflags! {
	#[repr(transparent)]
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	pub struct ContextOptions: c_uint {
		const SYSTEM      = 0x0001;
		const PEN         = 0x0002;
		const MESSAGES    = 0x0004;
		const MARGIN      = 0x8000;
		const MGINSIDE    = 0x4000;
		const CSRMESSAGES = 0x0008;
	}
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct Axis {
	pub min: c_int,
	pub max: c_int,
	pub units: c_uint,
	pub resolution: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct LogicalContext {
	pub name: [u16; 40],
	pub options: ContextOptions,
	pub status: c_uint,
	pub locks: c_uint,
	pub msg_base: c_uint,
	pub device: c_uint,
	pub pkt_rate: c_uint,
	pub pkt_data: PacketFields,
	pub pkt_mode: PacketFields,
	pub move_mask: PacketFields,
	pub btn_dn_mask: u32,
	pub btn_up_mask: u32,
	pub in_org_x: c_int,
	pub in_org_y: c_int,
	pub in_org_z: c_int,
	pub in_ext_x: c_int,
	pub in_ext_y: c_int,
	pub in_ext_z: c_int,
	pub out_org_x: c_int,
	pub out_org_y: c_int,
	pub out_org_z: c_int,
	pub out_ext_x: c_int,
	pub out_ext_y: c_int,
	pub out_ext_z: c_int,
	pub sens_x: u32,
	pub sens_y: u32,
	pub sens_z: u32,
	pub sys_mode: c_int,
	pub sys_org_x: c_int,
	pub sys_org_y: c_int,
	pub sys_ext_x: c_int,
	pub sys_ext_y: c_int,
	pub sys_sens_x: u32,
	pub sys_sens_y: u32,
}

macro_rules! impl_interface {
	{$Name:ident: $($function:ident: fn($($parameter:ident: $factor:ty),*) -> $codomain:ty),* $(,)?} => {
		#[allow(non_snake_case)]
		struct $Name {
			$($function: unsafe extern "system" fn($($parameter: $factor),*) -> $codomain),*
		}

		impl $Name {
			fn new(library: &libloading::Library) -> Option<Self> {
				Some(Self {
					$($function: *(unsafe { library.get(concat!(stringify!($function), "\0").as_bytes()) }.ok())?),*
				})
			}
		}
	}
}

impl_interface! {
	WintabInterface:
	WTInfoW: fn(wCategory: c_uint, nIndex: c_uint, lpOutput: *mut c_void) -> c_uint,
	WTOpenW: fn(hWnd: HWND, lpLogCtx: *const LogicalContext, fEnable: c_int) -> *mut c_void,
	WTClose: fn(hCtx: *mut c_void) -> c_int,
	WTPacket: fn(hCtx: *mut c_void, wSerial: c_uint, lpPkt: *mut c_void) -> c_int,
	WTEnable: fn(hCtx: *mut c_void, fEnable: c_int) -> c_int,
}

// The loaded library, with its entry points resolved.
struct Wintab {
	interface: WintabInterface,
	// Declared last so the entry points never outlive it.
	_library: libloading::Library,
}

impl Wintab {
	fn load() -> Result<Self, TabletError> {
		let library = unsafe { libloading::Library::new("wintab32.dll") }.map_err(|e| {
			debug!("Could not load wintab32.dll: {e}");
			TabletError::DeviceUnavailable
		})?;
		let interface = WintabInterface::new(&library).ok_or(TabletError::DeviceUnavailable)?;
		Ok(Self { interface, _library: library })
	}

	// Queries a fixed-size item. Only plain-old-data types may be requested.
	fn info<T: Copy>(&self, category: c_uint, index: c_uint) -> Result<T, TabletError> {
		unsafe {
			let size = (self.interface.WTInfoW)(category, index, null_mut()) as usize;
			if size == 0 || size > size_of::<T>() {
				debug!("WTInfoW({category}, {index}) reported {size} bytes for a {}-byte buffer.", size_of::<T>());
				return Err(TabletError::QueryFailed);
			}
			let mut output = MaybeUninit::<T>::zeroed();
			(self.interface.WTInfoW)(category, index, output.as_mut_ptr().cast());
			Ok(output.assume_init())
		}
	}

	// The number of tablet devices currently attached.
	fn device_count(&self) -> Result<u32, TabletError> {
		self.info::<c_uint>(WTI_INTERFACE, IFC_NDEVICES)
	}

	fn info_string(&self, category: c_uint, index: c_uint) -> Result<String, TabletError> {
		unsafe {
			let size = (self.interface.WTInfoW)(category, index, null_mut()) as usize;
			if size == 0 {
				return Err(TabletError::QueryFailed);
			}
			let mut buffer = vec![0u16; size.div_ceil(size_of::<u16>()) + 1];
			(self.interface.WTInfoW)(category, index, buffer.as_mut_ptr().cast());
			let length = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
			Ok(String::from_utf16_lossy(&buffer[..length]).trim().to_owned())
		}
	}
}

// An open reporting context. Closed at most once.
pub struct Context {
	wintab: Wintab,
	handle: *mut c_void,
}

impl Context {
	fn open(wintab: Wintab, hwnd: HWND, logical_context: &LogicalContext) -> Result<Self, TabletError> {
		let handle = unsafe { (wintab.interface.WTOpenW)(hwnd, logical_context, true as c_int) };
		if handle.is_null() {
			Err(TabletError::ContextOpenFailed)
		} else {
			Ok(Self { wintab, handle })
		}
	}

	pub fn enable(&self, enable: bool) -> bool {
		!self.handle.is_null() && unsafe { (self.wintab.interface.WTEnable)(self.handle, enable as c_int) } != 0
	}

	pub fn close(&mut self) {
		if !self.handle.is_null() {
			unsafe {
				(self.wintab.interface.WTClose)(self.handle);
			}
			self.handle = null_mut();
		}
	}
}

impl PacketQueue for Context {
	fn context(&self) -> isize {
		self.handle as isize
	}

	fn packet(&self, serial: usize) -> Option<Packet> {
		if self.handle.is_null() {
			return None;
		}
		unsafe {
			let mut packet = MaybeUninit::<Packet>::zeroed();
			match (self.wintab.interface.WTPacket)(self.handle, serial as c_uint, packet.as_mut_ptr().cast()) {
				0 => None,
				_ => Some(packet.assume_init()),
			}
		}
	}
}

impl Drop for Context {
	fn drop(&mut self) {
		self.close();
	}
}

#[derive(Clone, Debug)]
pub struct DeviceInfo {
	pub name: String,
	pub packet_rate: u32,
	pub pressure_range: PressureRange,
}

// State shared with the window procedure.
struct Subscription {
	context: Context,
	receiver: RefCell<PacketReceiver>,
}

impl MessageObserver for Subscription {
	fn observe(&self, message: u32, wparam: WPARAM, lparam: LPARAM) {
		if message != WT_PACKET {
			return;
		}
		match self.receiver.try_borrow_mut() {
			Ok(mut receiver) => {
				receiver.handle_native_event(&self.context, message, wparam, lparam);
			},
			Err(_) => trace!("Dropping packet {wparam} received while the pen state was borrowed."),
		}
	}
}

pub struct WintabTablet {
	subscription: Hooked<Subclass<Subscription>, Box<Subscription>>,
	pub info: DeviceInfo,
}

impl WintabTablet {
	pub fn open(window: &winit::window::Window, device_index: u32) -> Result<Self, TabletError> {
		let hwnd = match window.window_handle().map(|handle| handle.as_raw()) {
			Ok(RawWindowHandle::Win32(handle)) => handle.hwnd.get() as HWND,
			_ => return Err(TabletError::DeviceUnavailable),
		};

		let wintab = Wintab::load()?;

		let device_count = wintab.device_count()?;
		info!("Found {device_count} tablet device(s).");
		if device_index >= device_count {
			debug!("Requested tablet device {device_index}, but only {device_count} are attached.");
			return Err(TabletError::DeviceUnavailable);
		}

		let category = WTI_DEVICES + device_index;
		let name = wintab.info_string(category, DVC_NAME)?;
		let packet_rate = wintab.info::<c_uint>(category, DVC_PKTRATE)?;
		let pressure_axis = wintab.info::<Axis>(category, DVC_NPRESSURE)?;
		let pressure_range = PressureRange::new(pressure_axis.min, pressure_axis.max).ok_or(TabletError::QueryFailed)?;

		let mut logical_context = wintab.info::<LogicalContext>(WTI_DEFSYSCTX, 0)?;
		logical_context.device = device_index;
		logical_context.pkt_data = Packet::DATA;
		// Absolute mode for every field.
		logical_context.pkt_mode = PacketFields::empty();
		logical_context.options |= ContextOptions::MESSAGES;
		logical_context.msg_base = WT_DEFBASE;

		let context = Context::open(wintab, hwnd, &logical_context)?;
		let subscription = Box::new(Subscription {
			context,
			receiver: RefCell::new(PacketReceiver::new(pressure_range)),
		});

		// If the hook cannot be installed, the context closes as the subscription drops.
		let hook = unsafe { Subclass::install(hwnd, &*subscription) }.ok_or(TabletError::ContextOpenFailed)?;

		let info = DeviceInfo { name, packet_rate, pressure_range };
		info!("Opened tablet \"{}\" reporting at {} Hz with pressure in [{}, {}].", info.name, info.packet_rate, pressure_range.min(), pressure_range.max());

		Ok(Self { subscription: Hooked::new(hook, subscription), info })
	}

	pub fn pen(&self) -> PenState {
		self.subscription.device().and_then(|subscription| subscription.receiver.try_borrow().ok().map(|receiver| receiver.pen())).unwrap_or_default()
	}

	pub fn is_open(&self) -> bool {
		self.subscription.is_open()
	}

	pub fn enable(&mut self, enable: bool) -> bool {
		self.subscription.device().is_some_and(|subscription| subscription.context.enable(enable))
	}

	pub fn release(&mut self) {
		// Unhooks before closing, so the procedure never sees a dangling subscription.
		if self.subscription.release() {
			info!("Closed tablet \"{}\".", self.info.name);
		}
	}
}

impl Drop for WintabTablet {
	fn drop(&mut self) {
		self.release();
	}
}
