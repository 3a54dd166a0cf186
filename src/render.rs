//! Frame rendering.
//!
//! A frame is plain text: the device header, the three port registers in
//! decimal and binary, then the axis and button tables. Rendering is pure and
//! builds a fresh `String` every call; clearing the terminal is a separate step
//! ([`CLEAR_SCREEN`]).

use crate::metadata::DeviceInfo;
use crate::snapshot::RegisterSnapshot;
use crate::state::StateView;
use std::fmt::Write;

/// ANSI "erase display" followed by "cursor home".
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// 8-character binary text of `value`, most significant bit first.
#[inline]
pub fn bits(value: u8) -> String {
    format!("{value:08b}")
}

/// `" 0:-32767  1: 12000 "`: one `%2d:%6d ` cell per axis.
pub fn axis_line(axes: &[i32]) -> String {
    let mut out = String::with_capacity(axes.len() * 10);
    for (i, value) in axes.iter().enumerate() {
        let _ = write!(out, "{i:2}:{value:6} ");
    }
    out
}

/// `" 0:off 1:on "`: one `%2d:` cell per button, state padded to 3 chars.
pub fn button_line(buttons: &[bool]) -> String {
    let mut out = String::with_capacity(buttons.len() * 6);
    for (i, pressed) in buttons.iter().enumerate() {
        let _ = write!(out, "{i:2}:{}", if *pressed { "on " } else { "off" });
    }
    out
}

/// Render one full frame.
pub fn render(info: &DeviceInfo, state: StateView<'_>, regs: &RegisterSnapshot) -> String {
    let [bd, bs, bc] = regs.binary();
    let mut out = String::with_capacity(512);

    let _ = writeln!(out, "Name: {}", info.name);
    let _ = writeln!(out, "Version {}", info.version);
    let _ = writeln!(out, "Buttons: {}", info.buttons);

    out.push_str("\n------------ RUNNING SCAN ------------\n");
    out.push_str("Data\t\tStatus\t\tControl\n");
    out.push_str("----\t\t------\t\t-------\n");
    let _ = writeln!(
        out,
        "{}  \t\t{}    \t\t{}     ",
        regs.data, regs.status, regs.control
    );
    let _ = writeln!(out, "{bd}\t{bs}\t{bc}\n");

    out.push_str("Test area:\n----------\n");

    if !state.axes.is_empty() {
        out.push_str("Axes: ");
        out.push_str(&axis_line(state.axes));
    }
    if !state.buttons.is_empty() {
        out.push_str("\n\nButtons: ");
        out.push_str(&button_line(state.buttons));
    }

    out.push_str("\n\nInterrupt (CTRL+C) to exit...\n");
    out
}
