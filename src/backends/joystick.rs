//! Linux joystick API backend (`/dev/input/jsN`).
//!
//! The device file yields one 8-byte [`RawEvent`] per `read(2)` and answers a
//! handful of `ioctl(2)` capability queries from `linux/joystick.h`. Reads block;
//! the caller's loop gets its pacing from the device.
//!
//! Capability queries are best-effort: each one that fails is logged and the
//! corresponding [`DeviceInfo`] placeholder is kept. A short event read, by
//! contrast, is always an error.
//!
//! Request numbers use the generic `_IOC` layout (2 direction bits at the top,
//! 14 size bits), which is what x86, arm, aarch64 and riscv64 use. The module is
//! not built for arches with their own layout (powerpc, mips, sparc).

use crate::device::ControllerSource;
use crate::error::{Error, Result};
use crate::event::{InputEvent, RawEvent, RAW_EVENT_LEN};
use crate::metadata::{DeviceInfo, NAME_LEN};
use std::fs::File;
use std::io::{self, Read};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const IOC_READ: u32 = 2;
const JS_IOC_MAGIC: u32 = b'j' as u32;

/// `_IOC(_IOC_READ, 'j', nr, size)`.
const fn ioc_read(nr: u32, size: usize) -> u32 {
    (IOC_READ << 30) | ((size as u32) << 16) | (JS_IOC_MAGIC << 8) | nr
}

/// `ABS_CNT` from `linux/input-event-codes.h`.
pub const AXMAP_LEN: usize = 0x40;
/// `KEY_MAX - BTN_MISC + 1`.
pub const BTNMAP_LEN: usize = 0x2ff - 0x100 + 1;

pub const JSIOCGVERSION: u32 = ioc_read(0x01, 4);
pub const JSIOCGAXES: u32 = ioc_read(0x11, 1);
pub const JSIOCGBUTTONS: u32 = ioc_read(0x12, 1);
pub const JSIOCGAXMAP: u32 = ioc_read(0x32, AXMAP_LEN);
pub const JSIOCGBTNMAP: u32 = ioc_read(0x34, BTNMAP_LEN * 2);

/// `JSIOCGNAME(len)`.
pub const fn jsiocgname(len: usize) -> u32 {
    ioc_read(0x13, len)
}

fn ioctl_read<T>(fd: RawFd, request: u32, out: &mut T) -> io::Result<()> {
    // SAFETY: the size encoded in every request used here equals
    // `size_of::<T>()`, so the kernel writes only inside `out`.
    let rc = unsafe { libc::ioctl(fd, request as _, out as *mut T) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// An opened joystick device file.
pub struct JoystickDevice {
    path: PathBuf,
    id: String,
    file: File,
}

impl JoystickDevice {
    /// Open `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| Error::NotFound {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "joystick opened");
        Ok(Self {
            id: path.display().to_string(),
            path,
            file,
        })
    }

    fn query<T>(&self, what: &str, request: u32, out: &mut T) -> bool {
        match ioctl_read(self.file.as_raw_fd(), request, out) {
            Ok(()) => true,
            Err(e) => {
                warn!(device = %self.id, error = %e, "{what} query failed, using placeholder");
                false
            }
        }
    }
}

impl ControllerSource for JoystickDevice {
    fn read_capabilities(&mut self) -> DeviceInfo {
        let mut info = DeviceInfo::default();

        let mut version: u32 = 0;
        if self.query("version", JSIOCGVERSION, &mut version) {
            info.version = version;
        }

        let mut axes: u8 = 0;
        if self.query("axis count", JSIOCGAXES, &mut axes) {
            info.axes = axes;
        }

        let mut buttons: u8 = 0;
        if self.query("button count", JSIOCGBUTTONS, &mut buttons) {
            info.buttons = buttons;
        }

        let mut name = [0u8; NAME_LEN];
        if self.query("name", jsiocgname(NAME_LEN), &mut name) {
            let end = name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
            info = info.with_name(&String::from_utf8_lossy(&name[..end]));
        }

        let mut axmap = [0u8; AXMAP_LEN];
        if self.query("axis map", JSIOCGAXMAP, &mut axmap) {
            let n = (info.axes as usize).min(AXMAP_LEN);
            info.axis_map = axmap[..n].to_vec();
        }

        let mut btnmap = [0u16; BTNMAP_LEN];
        if self.query("button map", JSIOCGBTNMAP, &mut btnmap) {
            let n = (info.buttons as usize).min(BTNMAP_LEN);
            info.button_map = btnmap[..n].to_vec();
        }

        info!(
            device = %self.id,
            name = %info.name,
            version = %format!("0x{:06x}", info.version),
            axes = info.axes,
            buttons = info.buttons,
            "capabilities"
        );
        info
    }

    fn next_event(&mut self) -> Result<InputEvent> {
        let mut buf = [0u8; RAW_EVENT_LEN];
        match self.file.read(&mut buf) {
            Ok(RAW_EVENT_LEN) => Ok(RawEvent::from_bytes(buf).into()),
            Ok(n) => Err(Error::Read {
                path: self.path.clone(),
                reason: format!("short read ({n} of {RAW_EVENT_LEN} bytes)"),
            }),
            Err(e) => Err(Error::Read {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}
