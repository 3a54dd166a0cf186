//! Parallel port register access.
//!
//! A parallel port exposes three byte-wide registers at consecutive I/O
//! addresses: data (`base`), status (`base + 1`) and control (`base + 2`).
//! User space may only touch them while the kernel has granted access to that
//! address range.
//!
//! [`PortAccess`] is the raw grant/read/release interface. Callers should not use
//! it directly; [`PortGrant`] scopes a grant so it is released on every path out
//! of the sampling step, including early returns:
//!
//! ```no_run
//! use joyport::port::{PortAccess, PortGrant, DEFAULT_BASE, PORT_SPAN};
//!
//! fn sample(ports: &mut impl PortAccess) -> joyport::Result<u8> {
//!     let mut grant = PortGrant::acquire(ports, DEFAULT_BASE, PORT_SPAN)?;
//!     let status = grant.read(1)?;
//!     grant.release()?;
//!     Ok(status)
//! }
//! ```

use crate::error::{Error, Result};
use std::io;

/// Conventional address of the first parallel port (LPT1).
pub const DEFAULT_BASE: u16 = 0x378;

/// Number of registers sampled per cycle.
pub const PORT_SPAN: u16 = 3;

/// Raw port permission and read interface.
pub trait PortAccess {
    /// Request access to `len` addresses starting at `base`.
    fn acquire(&mut self, base: u16, len: u16) -> Result<()>;

    /// Read the register at `addr`. Fails if `addr` is not covered by an
    /// active grant.
    fn read_byte(&mut self, addr: u16) -> Result<u8>;

    /// Give the range back.
    fn release(&mut self, base: u16, len: u16) -> Result<()>;
}

impl<P: PortAccess + ?Sized> PortAccess for &mut P {
    fn acquire(&mut self, base: u16, len: u16) -> Result<()> {
        (**self).acquire(base, len)
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8> {
        (**self).read_byte(addr)
    }

    fn release(&mut self, base: u16, len: u16) -> Result<()> {
        (**self).release(base, len)
    }
}

/// An active grant over `base..base + len`.
///
/// Call [`PortGrant::release`] to give the range back and observe failures.
/// If the guard is dropped instead (an early `?` return), the range is still
/// released and a failure is logged.
pub struct PortGrant<'a, P: PortAccess + ?Sized> {
    ports: &'a mut P,
    base: u16,
    len: u16,
    released: bool,
}

impl<'a, P: PortAccess + ?Sized> PortGrant<'a, P> {
    /// Fails without asking `ports` if the range runs past `0xFFFF`.
    pub fn acquire(ports: &'a mut P, base: u16, len: u16) -> Result<Self> {
        if base.checked_add(len.saturating_sub(1)).is_none() {
            return Err(Error::Permission {
                base,
                len,
                enable: true,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "range runs past the end of the I/O space",
                ),
            });
        }
        ports.acquire(base, len)?;
        tracing::trace!(len, "port range 0x{base:x} granted");
        Ok(Self {
            ports,
            base,
            len,
            released: false,
        })
    }

    /// Read the register `offset` bytes past the base.
    pub fn read(&mut self, offset: u16) -> Result<u8> {
        let addr = self
            .base
            .checked_add(offset)
            .filter(|_| offset < self.len)
            .ok_or_else(|| Error::Permission {
                base: self.base,
                len: self.len,
                enable: true,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("offset {offset} outside granted range"),
                ),
            })?;
        self.ports.read_byte(addr)
    }

    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.ports.release(self.base, self.len)?;
        tracing::trace!("port range 0x{:x} released", self.base);
        Ok(())
    }
}

impl<P: PortAccess + ?Sized> Drop for PortGrant<'_, P> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.ports.release(self.base, self.len) {
            tracing::error!(error = %e, "releasing port range on unwind failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::VirtualPorts;

    #[test]
    fn acquire_then_release_succeeds_without_restrictions() {
        let mut ports = VirtualPorts::new(DEFAULT_BASE);
        let grant = PortGrant::acquire(&mut ports, DEFAULT_BASE, PORT_SPAN).unwrap();
        grant.release().unwrap();
        assert_eq!(ports.acquires(), 1);
        assert_eq!(ports.releases(), 1);
        assert!(!ports.is_granted());
    }

    #[test]
    fn dropped_grant_is_released() {
        let mut ports = VirtualPorts::new(DEFAULT_BASE);
        {
            let _grant = PortGrant::acquire(&mut ports, DEFAULT_BASE, PORT_SPAN).unwrap();
        }
        assert_eq!(ports.releases(), 1);
        assert!(!ports.is_granted());
    }

    #[test]
    fn reads_past_the_grant_are_refused() {
        let mut ports = VirtualPorts::new(DEFAULT_BASE);
        let mut grant = PortGrant::acquire(&mut ports, DEFAULT_BASE, PORT_SPAN).unwrap();
        assert!(matches!(grant.read(3), Err(Error::Permission { .. })));
        grant.release().unwrap();
        assert_eq!(ports.reads(), 0);
    }

    #[test]
    fn denied_grant_reports_permission_error() {
        let mut ports = VirtualPorts::new(DEFAULT_BASE).deny_acquire();
        let err = PortGrant::acquire(&mut ports, DEFAULT_BASE, PORT_SPAN)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Permission { enable: true, .. }));
        assert_eq!(ports.releases(), 0);
    }

    #[test]
    fn range_past_the_top_of_io_space_is_refused_up_front() {
        let mut ports = VirtualPorts::new(0xFFFE);
        let err = PortGrant::acquire(&mut ports, 0xFFFE, PORT_SPAN)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Permission { .. }));
        assert_eq!(ports.acquires(), 0);

        // The last three addresses still fit.
        let mut grant = PortGrant::acquire(&mut ports, 0xFFFD, PORT_SPAN).unwrap();
        assert!(grant.read(2).is_ok());
        grant.release().unwrap();
    }
}
