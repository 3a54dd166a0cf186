//! Controller and port backends.
//!
//! - **`joystick`**: Linux joystick API (`/dev/input/jsN`), on arches with the
//!   generic ioctl layout.
//! - **`ioport`**: real I/O ports through `ioperm(2)`; grants are refused on
//!   targets other than Linux/x86.
//! - **`virtual_input`**: scripted controller and in-memory port bank.

pub mod ioport;
#[cfg(all(
    target_os = "linux",
    any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "riscv64"
    )
))]
pub mod joystick;
pub mod virtual_input;
