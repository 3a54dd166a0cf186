use crate::error::Result;
use crate::{DeviceInfo, InputEvent};

/// A source of controller input.
///
/// Implemented by the Linux joystick backend and by the scripted
/// [`VirtualController`](crate::backends::virtual_input::VirtualController).
pub trait ControllerSource {
    /// Query the static capabilities once. Never fails; unknown fields fall
    /// back to the [`DeviceInfo`] placeholders.
    fn read_capabilities(&mut self) -> DeviceInfo;

    /// Block until one event is available.
    ///
    /// An incomplete record is [`Error::Read`](crate::Error::Read) and must be
    /// treated as fatal.
    fn next_event(&mut self) -> Result<InputEvent>;

    /// Path or label identifying the device in logs.
    fn id(&self) -> &str;
}
