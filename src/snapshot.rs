//! Per-cycle register snapshot.
//!
//! [`RegisterSnapshot`] holds the three parallel port registers as sampled in
//! one cycle. It is taken through a live [`PortGrant`], so a snapshot cannot be
//! produced without the range being granted, and it is thrown away once the
//! frame has been rendered.

use crate::error::Result;
use crate::port::{PortAccess, PortGrant};
use crate::render::bits;

/// Data, status and control registers at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterSnapshot {
    pub data: u8,
    pub status: u8,
    pub control: u8,
}

impl RegisterSnapshot {
    /// Read base+0, base+1, base+2 in that order.
    pub fn sample<P: PortAccess + ?Sized>(grant: &mut PortGrant<'_, P>) -> Result<Self> {
        Ok(Self {
            data: grant.read(0)?,
            status: grant.read(1)?,
            control: grant.read(2)?,
        })
    }

    /// Registers in display order.
    #[inline]
    pub fn values(&self) -> [u8; 3] {
        [self.data, self.status, self.control]
    }

    /// Binary renderings in display order.
    pub fn binary(&self) -> [String; 3] {
        self.values().map(bits)
    }
}
