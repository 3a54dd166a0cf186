//! Accumulated controller state.
//!
//! [`ControllerState`] is a fixed-size table sized from the device's declared
//! axis and button counts. It starts zeroed and is only ever changed by
//! [`ControllerState::apply`]. Indices are checked before every write; an event
//! pointing past the table is returned as an [`IndexError`] and leaves the
//! table untouched.

use crate::event::{InputEvent, InputKind};
use crate::metadata::DeviceInfo;
use thiserror::Error;

/// Which half of the table an out-of-range index was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Axis,
    Button,
}

/// Event index outside the declared capability bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{channel:?} index {index} out of range (device declares {count})")]
pub struct IndexError {
    pub channel: Channel,
    pub index: u8,
    pub count: usize,
}

/// Last known value of every axis and button.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControllerState {
    axes: Vec<i32>,
    buttons: Vec<bool>,
}

/// Borrowed, read-only view of a [`ControllerState`].
#[derive(Clone, Copy, Debug)]
pub struct StateView<'a> {
    pub axes: &'a [i32],
    pub buttons: &'a [bool],
}

impl ControllerState {
    pub fn new(axes: usize, buttons: usize) -> Self {
        Self {
            axes: vec![0; axes],
            buttons: vec![false; buttons],
        }
    }

    /// Table sized from the device's declared counts.
    pub fn for_device(info: &DeviceInfo) -> Self {
        Self::new(info.axes as usize, info.buttons as usize)
    }

    /// Fold one event into the table.
    ///
    /// `Other` events are a no-op. Out-of-range indices are rejected without
    /// touching the table.
    pub fn apply(&mut self, event: &InputEvent) -> Result<(), IndexError> {
        match event.kind {
            InputKind::Button { index, pressed } => {
                let count = self.buttons.len();
                let slot = self.buttons.get_mut(index as usize).ok_or(IndexError {
                    channel: Channel::Button,
                    index,
                    count,
                })?;
                *slot = pressed;
            }
            InputKind::Axis { index, value } => {
                let count = self.axes.len();
                let slot = self.axes.get_mut(index as usize).ok_or(IndexError {
                    channel: Channel::Axis,
                    index,
                    count,
                })?;
                *slot = value;
            }
            InputKind::Other => {}
        }
        Ok(())
    }

    pub fn snapshot(&self) -> StateView<'_> {
        StateView {
            axes: &self.axes,
            buttons: &self.buttons,
        }
    }

    #[inline]
    pub fn axes(&self) -> &[i32] {
        &self.axes
    }

    #[inline]
    pub fn buttons(&self) -> &[bool] {
        &self.buttons
    }
}
