//! In-memory stand-ins for the controller and the port bank.
//!
//! [`VirtualController`] replays a scripted list of events and reports a read
//! error once the script runs out, the same way a disconnected joystick does.
//! [`VirtualPorts`] is a three-register bank that can be told to refuse grants
//! and counts every acquire, release and read so callers can check ordering.

use crate::device::ControllerSource;
use crate::error::{Error, Result};
use crate::port::{PortAccess, PORT_SPAN};
use crate::{DeviceInfo, InputEvent};
use std::collections::VecDeque;
use std::io;

/// Scripted controller.
#[derive(Debug, Default)]
pub struct VirtualController {
    id: String,
    info: DeviceInfo,
    events: VecDeque<InputEvent>,
}

impl VirtualController {
    pub fn new(id: &str, info: DeviceInfo) -> Self {
        Self {
            id: id.to_string(),
            info,
            events: VecDeque::new(),
        }
    }

    /// Queue one event.
    pub fn feed(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn set_axis(&mut self, axis: u8, value: i32) {
        self.feed(InputEvent::axis(axis, value));
    }

    pub fn press_button(&mut self, button: u8) {
        self.feed(InputEvent::button(button, true));
    }

    pub fn release_button(&mut self, button: u8) {
        self.feed(InputEvent::button(button, false));
    }

    /// Events still waiting to be delivered.
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl ControllerSource for VirtualController {
    fn read_capabilities(&mut self) -> DeviceInfo {
        self.info.clone()
    }

    fn next_event(&mut self) -> Result<InputEvent> {
        self.events.pop_front().ok_or_else(|| Error::Read {
            path: self.id.clone().into(),
            reason: "end of event stream".to_string(),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// Three-register port bank.
#[derive(Debug)]
pub struct VirtualPorts {
    base: u16,
    registers: [u8; PORT_SPAN as usize],
    granted: Option<(u16, u16)>,
    deny_acquire: bool,
    deny_release: bool,
    acquires: usize,
    releases: usize,
    reads: usize,
}

impl VirtualPorts {
    pub fn new(base: u16) -> Self {
        Self {
            base,
            registers: [0; PORT_SPAN as usize],
            granted: None,
            deny_acquire: false,
            deny_release: false,
            acquires: 0,
            releases: 0,
            reads: 0,
        }
    }

    /// Register contents for data, status and control.
    pub fn with_registers(mut self, registers: [u8; PORT_SPAN as usize]) -> Self {
        self.registers = registers;
        self
    }

    /// Refuse every grant, as the kernel does for unprivileged callers.
    pub fn deny_acquire(mut self) -> Self {
        self.deny_acquire = true;
        self
    }

    /// Grant, but fail when the range is given back.
    pub fn deny_release(mut self) -> Self {
        self.deny_release = true;
        self
    }

    pub fn acquires(&self) -> usize {
        self.acquires
    }

    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn is_granted(&self) -> bool {
        self.granted.is_some()
    }

    fn denied(base: u16, len: u16, enable: bool) -> Error {
        Error::Permission {
            base,
            len,
            enable,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        }
    }
}

impl PortAccess for VirtualPorts {
    fn acquire(&mut self, base: u16, len: u16) -> Result<()> {
        if self.deny_acquire {
            return Err(Self::denied(base, len, true));
        }
        self.acquires += 1;
        self.granted = Some((base, len));
        Ok(())
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8> {
        let Some((base, len)) = self.granted else {
            return Err(Self::denied(addr, 1, true));
        };
        if addr < base || u32::from(addr) >= u32::from(base) + u32::from(len) {
            return Err(Self::denied(addr, 1, true));
        }
        self.reads += 1;
        Ok(addr
            .checked_sub(self.base)
            .and_then(|offset| self.registers.get(offset as usize))
            .copied()
            .unwrap_or(0xFF))
    }

    fn release(&mut self, base: u16, len: u16) -> Result<()> {
        self.granted = None;
        if self.deny_release {
            return Err(Self::denied(base, len, false));
        }
        self.releases += 1;
        Ok(())
    }
}
