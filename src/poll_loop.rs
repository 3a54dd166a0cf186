//! The sampling loop.
//!
//! [`PollLoop`] owns the controller, the port bank and the output and moves
//! through three phases:
//!
//! ```text
//! Starting ──► Running ──► Terminated(code)
//! ```
//!
//! `Starting` reads the first event record and the device capabilities. Each
//! `Running` cycle then
//!
//! 1. takes the event for this cycle,
//! 2. acquires the port range,
//! 3. folds the event into the state table,
//! 4. samples data/status/control,
//! 5. releases the port range,
//! 6. renders and flushes one frame,
//! 7. sleeps for the poll interval.
//!
//! With [`EventTiming::Deferred`] the next event is read after the sleep and
//! shown one frame later; with [`EventTiming::Immediate`] it is read at step 1.
//!
//! The port range is never held across the sleep. Every error is fatal and
//! ends the loop; an event with an out-of-range index is logged and dropped.
//! Nothing sets the cancellation flag by default, so the loop only ends on an
//! error or an external signal.

use crate::config::{Config, EventTiming};
use crate::device::ControllerSource;
use crate::error::Result;
use crate::event::InputEvent;
use crate::metadata::DeviceInfo;
use crate::port::{PortAccess, PortGrant, PORT_SPAN};
use crate::render::{render, CLEAR_SCREEN};
use crate::snapshot::RegisterSnapshot;
use crate::state::ControllerState;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Running,
    /// Carries the process exit code.
    Terminated(i32),
}

pub struct PollLoop<C, P, W> {
    source: C,
    ports: P,
    out: W,
    config: Config,
    info: DeviceInfo,
    state: ControllerState,
    pending: Option<InputEvent>,
    phase: Phase,
    cancel: Arc<AtomicBool>,
    frames: u64,
    discarded: u64,
}

impl<C, P, W> PollLoop<C, P, W>
where
    C: ControllerSource,
    P: PortAccess,
    W: Write,
{
    /// `source` must already be open.
    pub fn new(source: C, ports: P, out: W, config: Config) -> Self {
        Self {
            source,
            ports,
            out,
            config,
            info: DeviceInfo::default(),
            state: ControllerState::default(),
            pending: None,
            phase: Phase::Starting,
            cancel: Arc::new(AtomicBool::new(false)),
            frames: 0,
            discarded: 0,
        }
    }

    /// Flag checked at each cycle boundary; storing `true` ends [`run`](Self::run)
    /// with exit code 0.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Start (if needed) and cycle until cancelled or a fatal error.
    pub fn run(&mut self) -> Result<()> {
        let result = self.drive();
        let code = match &result {
            Ok(()) => 0,
            Err(e) => {
                error!(error = %e, frames = self.frames, "poll loop stopped");
                e.exit_code()
            }
        };
        self.phase = Phase::Terminated(code);
        result
    }

    fn drive(&mut self) -> Result<()> {
        if self.phase == Phase::Starting {
            self.start()?;
        }
        while !self.cancel.load(Ordering::Relaxed) {
            self.cycle()?;
        }
        info!(frames = self.frames, "poll loop cancelled");
        Ok(())
    }

    /// Read the initial event and the capabilities, then enter `Running`.
    pub fn start(&mut self) -> Result<()> {
        let first = self.source.next_event()?;
        self.pending = Some(first);

        self.info = self.source.read_capabilities();
        self.state = ControllerState::for_device(&self.info);
        self.phase = Phase::Running;
        info!(
            device = %self.source.id(),
            base = %format!("0x{:x}", self.config.base_address),
            timing = ?self.config.event_timing,
            "polling"
        );
        Ok(())
    }

    /// One full cycle.
    pub fn cycle(&mut self) -> Result<()> {
        let event = match self.pending.take() {
            Some(event) => event,
            None => self.source.next_event()?,
        };

        let mut grant = PortGrant::acquire(&mut self.ports, self.config.base_address, PORT_SPAN)?;
        if let Err(e) = self.state.apply(&event) {
            self.discarded += 1;
            warn!(error = %e, "discarding event");
        }
        let regs = RegisterSnapshot::sample(&mut grant)?;
        grant.release()?;

        let frame = render(&self.info, self.state.snapshot(), &regs);
        if self.config.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.frames += 1;
        debug!(
            frame = self.frames,
            event_time = event.time,
            init = event.init,
            ?regs,
            "frame rendered"
        );

        let interval = self.config.poll_interval();
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }

        if self.config.event_timing == EventTiming::Deferred {
            self.pending = Some(self.source.next_event()?);
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Events dropped for an out-of-range index.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    pub fn into_parts(self) -> (C, P, W) {
        (self.source, self.ports, self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::virtual_input::{VirtualController, VirtualPorts};
    use crate::error::Error;
    use crate::port::DEFAULT_BASE;

    fn quiet(timing: EventTiming) -> Config {
        Config {
            poll_interval_ms: 0,
            clear_screen: false,
            event_timing: timing,
            ..Config::default()
        }
    }

    fn pad(events: &[InputEvent]) -> VirtualController {
        let mut pad = VirtualController::new("virtual:0", DeviceInfo::default());
        for ev in events {
            pad.feed(*ev);
        }
        pad
    }

    #[test]
    fn failed_initial_read_terminates_with_one() {
        let mut lp = PollLoop::new(
            pad(&[]),
            VirtualPorts::new(DEFAULT_BASE),
            Vec::new(),
            quiet(EventTiming::Immediate),
        );
        assert!(matches!(lp.run(), Err(Error::Read { .. })));
        assert_eq!(lp.phase(), Phase::Terminated(1));
        let (_, ports, out) = lp.into_parts();
        assert_eq!(ports.acquires(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn immediate_timing_reads_at_the_top_of_the_cycle() {
        let mut lp = PollLoop::new(
            pad(&[InputEvent::axis(0, 5), InputEvent::axis(0, 6)]),
            VirtualPorts::new(DEFAULT_BASE),
            Vec::new(),
            quiet(EventTiming::Immediate),
        );
        lp.start().unwrap();
        lp.cycle().unwrap();
        assert_eq!(lp.state().axes()[0], 5);
        assert_eq!(lp.source().pending(), 1);

        lp.cycle().unwrap();
        assert_eq!(lp.state().axes()[0], 6);
        assert_eq!(lp.source().pending(), 0);
    }

    #[test]
    fn deferred_timing_reads_after_the_frame() {
        let mut lp = PollLoop::new(
            pad(&[InputEvent::axis(0, 5), InputEvent::axis(0, 6)]),
            VirtualPorts::new(DEFAULT_BASE),
            Vec::new(),
            quiet(EventTiming::Deferred),
        );
        lp.start().unwrap();
        lp.cycle().unwrap();
        // The second record is already consumed but not yet displayed.
        assert_eq!(lp.state().axes()[0], 5);
        assert_eq!(lp.source().pending(), 0);

        assert!(matches!(lp.cycle(), Err(Error::Read { .. })));
        assert_eq!(lp.state().axes()[0], 6);
        assert_eq!(lp.frames(), 2);
    }

    #[test]
    fn grant_is_released_every_cycle() {
        let mut ports = VirtualPorts::new(DEFAULT_BASE);
        let mut lp = PollLoop::new(
            pad(&[InputEvent::button(0, true), InputEvent::button(0, false)]),
            &mut ports,
            Vec::new(),
            quiet(EventTiming::Immediate),
        );
        assert!(lp.run().is_err());
        assert_eq!(lp.frames(), 2);
        drop(lp);
        assert_eq!(ports.acquires(), 2);
        assert_eq!(ports.releases(), 2);
        assert_eq!(ports.reads(), 6);
        assert!(!ports.is_granted());
    }

    #[test]
    fn failed_release_is_fatal() {
        let mut lp = PollLoop::new(
            pad(&[InputEvent::axis(0, 1), InputEvent::axis(0, 2)]),
            VirtualPorts::new(DEFAULT_BASE).deny_release(),
            Vec::new(),
            quiet(EventTiming::Immediate),
        );
        let err = lp.run().unwrap_err();
        assert!(matches!(err, Error::Permission { enable: false, .. }));
        assert_eq!(lp.phase(), Phase::Terminated(1));
        assert_eq!(lp.frames(), 0);
    }

    #[test]
    fn out_of_range_events_are_dropped_and_the_loop_continues() {
        let mut lp = PollLoop::new(
            pad(&[
                InputEvent::axis(9, 100),
                InputEvent::button(2, true),
                InputEvent::button(1, true),
            ]),
            VirtualPorts::new(DEFAULT_BASE),
            Vec::new(),
            quiet(EventTiming::Immediate),
        );
        assert!(matches!(lp.run(), Err(Error::Read { .. })));
        assert_eq!(lp.frames(), 3);
        assert_eq!(lp.discarded(), 2);
        assert_eq!(lp.state().axes(), &[0, 0]);
        assert_eq!(lp.state().buttons(), &[false, true]);
    }

    #[test]
    fn cancellation_ends_with_zero() {
        let mut lp = PollLoop::new(
            pad(&[InputEvent::axis(0, 1)]),
            VirtualPorts::new(DEFAULT_BASE),
            Vec::new(),
            quiet(EventTiming::Immediate),
        );
        lp.cancel_handle().store(true, Ordering::Relaxed);
        lp.run().unwrap();
        assert_eq!(lp.phase(), Phase::Terminated(0));
        assert_eq!(lp.frames(), 0);
    }

    #[test]
    fn frames_start_with_clear_when_enabled() {
        let mut lp = PollLoop::new(
            pad(&[InputEvent::axis(0, 1)]),
            VirtualPorts::new(DEFAULT_BASE),
            Vec::new(),
            Config {
                poll_interval_ms: 0,
                ..Config::default()
            },
        );
        lp.start().unwrap();
        lp.cycle().unwrap();
        let (_, _, out) = lp.into_parts();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.contains("Name: Unknown"));
    }
}
