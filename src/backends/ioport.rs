//! Hardware port access through `ioperm(2)`.
//!
//! On Linux/x86 the kernel can open a window in the task's I/O permission
//! bitmap; after that the `in` instruction works from user space for those
//! addresses only. Touching an address outside the window raises SIGSEGV, so
//! [`IoPorts`] remembers the active window and refuses reads outside it.
//!
//! On every other target the grant is refused with
//! [`Error::Permission`](crate::Error::Permission).

use crate::error::{Error, Result};
use crate::port::PortAccess;
use std::io;

/// The machine's real I/O port space.
#[derive(Debug, Default)]
pub struct IoPorts {
    granted: Option<(u16, u16)>,
}

impl IoPorts {
    pub fn new() -> Self {
        Self::default()
    }

    fn covers(&self, addr: u16) -> bool {
        matches!(self.granted, Some((base, len)) if addr >= base && addr - base < len)
    }
}

#[cfg(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64")))]
mod sys {
    use std::io;

    pub fn ioperm(base: u16, len: u16, enable: bool) -> io::Result<()> {
        // SAFETY: ioperm only edits this task's I/O bitmap.
        let rc = unsafe {
            libc::ioperm(
                base as libc::c_ulong,
                len as libc::c_ulong,
                enable as libc::c_int,
            )
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// # Safety
    /// `port` must be covered by an active `ioperm` grant.
    pub unsafe fn inb(port: u16) -> u8 {
        let value: u8;
        unsafe {
            core::arch::asm!(
                "in al, dx",
                in("dx") port,
                out("al") value,
                options(nomem, nostack, preserves_flags)
            );
        }
        value
    }
}

#[cfg(not(all(target_os = "linux", any(target_arch = "x86", target_arch = "x86_64"))))]
mod sys {
    use std::io;

    pub fn ioperm(_base: u16, _len: u16, _enable: bool) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "port I/O needs Linux on x86",
        ))
    }

    pub unsafe fn inb(_port: u16) -> u8 {
        0xFF
    }
}

impl PortAccess for IoPorts {
    fn acquire(&mut self, base: u16, len: u16) -> Result<()> {
        sys::ioperm(base, len, true).map_err(|source| Error::Permission {
            base,
            len,
            enable: true,
            source,
        })?;
        self.granted = Some((base, len));
        Ok(())
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8> {
        if !self.covers(addr) {
            return Err(Error::Permission {
                base: addr,
                len: 1,
                enable: true,
                source: io::Error::new(io::ErrorKind::PermissionDenied, "address not granted"),
            });
        }
        // SAFETY: `covers` confirmed an active ioperm window over `addr`.
        Ok(unsafe { sys::inb(addr) })
    }

    fn release(&mut self, base: u16, len: u16) -> Result<()> {
        self.granted = None;
        sys::ioperm(base, len, false).map_err(|source| Error::Permission {
            base,
            len,
            enable: false,
            source,
        })
    }
}
