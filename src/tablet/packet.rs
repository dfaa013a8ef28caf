// Copyright (C) 2023 Aaron Yeoh Cruz <zeyonaut@gmail.com>
// SPDX-License-Identifier: MPL-2.0

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bitflags::bitflags;
use log::trace;

use super::pen::{PenState, PressureRange};

/*
WTPKT, DWORD : u32
LONG, int : i32
UINT : u32
*/

// Base of the message range a context posts to its window.
pub const WT_DEFBASE: u32 = 0x7ff0;
// Posted when a packet is ready. WPARAM is the packet serial; LPARAM is the context handle.
pub const WT_PACKET: u32 = WT_DEFBASE;

bitflags! {
	#[repr(transparent)]
	#[derive(Clone, Copy, Debug, PartialEq, Eq)]
	pub struct PacketFields: u32 {
		const CONTEXT          = 0x0001;
		const STATUS           = 0x0002;
		const TIME             = 0x0004;
		const CHANGED          = 0x0008;
		const SERIAL_NUMBER    = 0x0010;
		const CURSOR           = 0x0020;
		const BUTTONS          = 0x0040;
		const X                = 0x0080;
		const Y                = 0x0100;
		const Z                = 0x0200;
		const NORMAL_PRESSURE  = 0x0400;
		const TANGENT_PRESSURE = 0x0800;
		const ORIENTATION      = 0x1000;
		const ROTATION         = 0x2000;
	}
}

// Angles are in tenths of a degree.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Orientation {
	pub azimuth: i32,
	pub altitude: i32,
	pub twist: i32,
}

// NOTE: The field order must match the bit order of Packet::DATA.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packet {
	pub changed: PacketFields,
	pub x: i32,
	pub y: i32,
	pub z: i32,
	pub normal_pressure: u32,
	pub tangent_pressure: u32,
	pub orientation: Orientation,
}

impl Packet {
	pub const DATA: PacketFields = PacketFields::CHANGED
		.union(PacketFields::X)
		.union(PacketFields::Y)
		.union(PacketFields::Z)
		.union(PacketFields::NORMAL_PRESSURE)
		.union(PacketFields::TANGENT_PRESSURE)
		.union(PacketFields::ORIENTATION);
}

// A source of packets belonging to a single open context.
pub trait PacketQueue {
	// The handle that identifies this context in packet messages.
	fn context(&self) -> isize;

	// Removes the packet with the given serial from the queue, if it is still there.
	fn packet(&self, serial: usize) -> Option<Packet>;
}

// Decodes packet messages into the pen state.
pub struct PacketReceiver {
	pressure_range: PressureRange,
	pen: PenState,
}

impl PacketReceiver {
	pub fn new(pressure_range: PressureRange) -> Self {
		Self { pressure_range, pen: PenState::default() }
	}

	pub fn pen(&self) -> PenState {
		self.pen
	}

	// Returns whether the pen state was updated.
	pub fn handle_native_event(&mut self, queue: &impl PacketQueue, message: u32, wparam: usize, lparam: isize) -> bool {
		if message != WT_PACKET {
			return false;
		}

		// Packets of other contexts arrive on the same window when several contexts coexist.
		if lparam != queue.context() {
			trace!("Ignoring packet {wparam} of foreign context {lparam:#x}.");
			return false;
		}

		// The packet may already have been flushed from the queue.
		let Some(packet) = queue.packet(wparam) else {
			trace!("Packet {wparam} is no longer queued.");
			return false;
		};

		if packet.changed.is_empty() {
			return false;
		}

		self.apply(&packet);
		true
	}

	fn apply(&mut self, packet: &Packet) {
		if !self.pressure_range.contains(packet.normal_pressure) {
			trace!("Clamping pressure {} outside of [{}, {}].", packet.normal_pressure, self.pressure_range.min(), self.pressure_range.max());
		}

		self.pen = PenState {
			x: packet.x,
			y: packet.y,
			azimuth: packet.orientation.azimuth as f32 / 10.,
			tilt: packet.orientation.altitude as f32 / 10.,
			pressure: self.pressure_range.normalize(packet.normal_pressure),
		};
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	const CONTEXT: isize = 0x5a0;

	struct FakeQueue {
		packets: RefCell<Vec<(usize, Packet)>>,
	}

	impl FakeQueue {
		fn new(packets: impl IntoIterator<Item = (usize, Packet)>) -> Self {
			Self { packets: RefCell::new(packets.into_iter().collect()) }
		}
	}

	impl PacketQueue for FakeQueue {
		fn context(&self) -> isize {
			CONTEXT
		}

		fn packet(&self, serial: usize) -> Option<Packet> {
			let mut packets = self.packets.borrow_mut();
			let index = packets.iter().position(|(s, _)| *s == serial)?;
			Some(packets.remove(index).1)
		}
	}

	fn packet(normal_pressure: u32) -> Packet {
		Packet {
			changed: PacketFields::X | PacketFields::NORMAL_PRESSURE,
			x: 1200,
			y: -40,
			z: 0,
			normal_pressure,
			tangent_pressure: 0,
			orientation: Orientation { azimuth: 1355, altitude: 452, twist: 0 },
		}
	}

	fn receiver() -> PacketReceiver {
		PacketReceiver::new(PressureRange::new(0, 1023).unwrap())
	}

	#[test]
	fn packet_layout_matches_requested_fields() {
		// One 32-bit slot per requested field, with orientation taking three.
		assert_eq!(std::mem::size_of::<Packet>(), 4 * (Packet::DATA.bits().count_ones() as usize + 2));
	}

	#[test]
	fn decodes_pressure_and_orientation() {
		let queue = FakeQueue::new([(7, packet(1023))]);
		let mut receiver = receiver();

		assert!(receiver.handle_native_event(&queue, WT_PACKET, 7, CONTEXT));

		let pen = receiver.pen();
		assert_eq!(pen.pressure, 1.);
		assert_eq!((pen.x, pen.y), (1200, -40));
		assert!((pen.azimuth - 135.5).abs() < 1e-4);
		assert!((pen.tilt - 45.2).abs() < 1e-4);
	}

	#[test]
	fn each_packet_overwrites_the_previous_state() {
		let queue = FakeQueue::new([(1, packet(1023)), (2, packet(0))]);
		let mut receiver = receiver();

		receiver.handle_native_event(&queue, WT_PACKET, 1, CONTEXT);
		receiver.handle_native_event(&queue, WT_PACKET, 2, CONTEXT);
		assert_eq!(receiver.pen().pressure, 0.);
	}

	#[test]
	fn unchanged_packets_leave_state_alone() {
		let mut stale = packet(1023);
		stale.changed = PacketFields::empty();
		let queue = FakeQueue::new([(1, packet(512)), (2, stale)]);
		let mut receiver = receiver();

		receiver.handle_native_event(&queue, WT_PACKET, 1, CONTEXT);
		let before = receiver.pen();
		assert!(!receiver.handle_native_event(&queue, WT_PACKET, 2, CONTEXT));
		assert_eq!(receiver.pen(), before);
	}

	#[test]
	fn foreign_context_is_ignored() {
		let queue = FakeQueue::new([(3, packet(1023))]);
		let mut receiver = receiver();

		assert!(!receiver.handle_native_event(&queue, WT_PACKET, 3, CONTEXT + 1));
		assert_eq!(receiver.pen(), PenState::default());
		// The packet was not consumed on behalf of the other context.
		assert_eq!(queue.packets.borrow().len(), 1);
	}

	#[test]
	fn missing_packet_is_a_no_op() {
		let queue = FakeQueue::new([]);
		let mut receiver = receiver();

		assert!(!receiver.handle_native_event(&queue, WT_PACKET, 9, CONTEXT));
		assert_eq!(receiver.pen(), PenState::default());
	}

	#[test]
	fn other_messages_are_ignored() {
		let queue = FakeQueue::new([(4, packet(1023))]);
		let mut receiver = receiver();

		assert!(!receiver.handle_native_event(&queue, WT_PACKET + 1, 4, CONTEXT));
		assert_eq!(receiver.pen(), PenState::default());
	}

	#[test]
	fn out_of_range_pressure_is_clamped() {
		let queue = FakeQueue::new([(5, packet(4000))]);
		let mut receiver = receiver();

		receiver.handle_native_event(&queue, WT_PACKET, 5, CONTEXT);
		assert_eq!(receiver.pen().pressure, 1.);
	}
}
