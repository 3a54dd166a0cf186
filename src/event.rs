//! Controller events.
//!
//! The Linux joystick driver delivers fixed 8-byte records
//! (`struct js_event { u32 time; i16 value; u8 type; u8 number; }`, native
//! endian). [`RawEvent`] is that record verbatim; [`InputKind`] is what the rest
//! of the crate works with after classification.
//!
//! ## Classification
//! The driver sets [`JS_EVENT_INIT`] on the synthetic events it emits right
//! after open to report the initial state. The flag is masked off before the
//! type is inspected, so an initial button report is an ordinary
//! [`InputKind::Button`]. Any type other than button or axis becomes
//! [`InputKind::Other`] and is ignored by the state table.

/// Button pressed/released.
pub const JS_EVENT_BUTTON: u8 = 0x01;
/// Axis moved.
pub const JS_EVENT_AXIS: u8 = 0x02;
/// Initial state of the device.
pub const JS_EVENT_INIT: u8 = 0x80;

/// Size of one record on the wire.
pub const RAW_EVENT_LEN: usize = 8;

/// One joystick record as read from the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawEvent {
    /// Driver timestamp in milliseconds.
    pub time: u32,
    pub value: i16,
    /// Event type, possibly or'ed with [`JS_EVENT_INIT`].
    pub kind: u8,
    /// Axis or button index.
    pub number: u8,
}

impl RawEvent {
    pub fn from_bytes(buf: [u8; RAW_EVENT_LEN]) -> Self {
        Self {
            time: u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: i16::from_ne_bytes([buf[4], buf[5]]),
            kind: buf[6],
            number: buf[7],
        }
    }

    pub fn to_bytes(self) -> [u8; RAW_EVENT_LEN] {
        let mut buf = [0u8; RAW_EVENT_LEN];
        buf[..4].copy_from_slice(&self.time.to_ne_bytes());
        buf[4..6].copy_from_slice(&self.value.to_ne_bytes());
        buf[6] = self.kind;
        buf[7] = self.number;
        buf
    }

    /// `true` if the driver marked this as part of the initial state burst.
    #[inline]
    pub fn is_init(&self) -> bool {
        self.kind & JS_EVENT_INIT != 0
    }

    pub fn classify(&self) -> InputKind {
        match self.kind & !JS_EVENT_INIT {
            JS_EVENT_BUTTON => InputKind::Button {
                index: self.number,
                pressed: self.value != 0,
            },
            JS_EVENT_AXIS => InputKind::Axis {
                index: self.number,
                value: self.value as i32,
            },
            _ => InputKind::Other,
        }
    }
}

/// Classified controller input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Button { index: u8, pressed: bool },
    Axis { index: u8, value: i32 },
    /// Anything that is neither a button nor an axis report.
    Other,
}

/// A classified event together with the driver timestamp it carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// Driver timestamp (ms, wraps).
    pub time: u32,
    /// Whether the driver flagged this as initial state.
    pub init: bool,
    pub kind: InputKind,
}

impl From<RawEvent> for InputEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            time: raw.time,
            init: raw.is_init(),
            kind: raw.classify(),
        }
    }
}

impl InputEvent {
    /// Event with no timestamp, as produced by scripted sources.
    pub fn new(kind: InputKind) -> Self {
        Self {
            time: 0,
            init: false,
            kind,
        }
    }

    pub fn axis(index: u8, value: i32) -> Self {
        Self::new(InputKind::Axis { index, value })
    }

    pub fn button(index: u8, pressed: bool) -> Self {
        Self::new(InputKind::Button { index, pressed })
    }
}
