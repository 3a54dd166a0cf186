use joyport::backends::virtual_input::{VirtualController, VirtualPorts};
use joyport::cli::{usage, Cli};
use joyport::{
    Config, DeviceInfo, Error, EventTiming, InputEvent, Phase, PollLoop, DEFAULT_BASE,
};

fn config() -> Config {
    Config {
        poll_interval_ms: 0,
        clear_screen: false,
        event_timing: EventTiming::Immediate,
        ..Config::default()
    }
}

fn two_by_two(events: &[InputEvent]) -> VirtualController {
    let info = DeviceInfo::default()
        .with_name("Test Pad")
        .with_counts(2, 2);
    let mut pad = VirtualController::new("virtual:0", info);
    for ev in events {
        pad.feed(*ev);
    }
    pad
}

fn last_frame(out: &[u8]) -> String {
    let text = String::from_utf8(out.to_vec()).unwrap();
    let start = text.rfind("Name: ").unwrap();
    text[start..].to_string()
}

#[test]
fn axis_and_button_events_end_up_in_the_last_frame() {
    let pad = two_by_two(&[
        InputEvent::axis(0, -32767),
        InputEvent::button(1, true),
        InputEvent::axis(1, 12000),
    ]);
    let mut poll = PollLoop::new(pad, VirtualPorts::new(DEFAULT_BASE), Vec::new(), config());

    // The script ends with a read error, which is how the loop stops.
    assert!(matches!(poll.run(), Err(Error::Read { .. })));
    assert_eq!(poll.phase(), Phase::Terminated(1));
    assert_eq!(poll.state().axes(), &[-32767, 12000]);
    assert_eq!(poll.state().buttons(), &[false, true]);
    assert_eq!(poll.frames(), 3);

    let (_, _, out) = poll.into_parts();
    let frame = last_frame(&out);
    assert!(frame.starts_with("Name: Test Pad\n"));
    assert!(frame.contains("Axes:  0:-32767  1: 12000"));
    assert!(frame.contains("Buttons:  0:off 1:on \n"));
}

#[test]
fn registers_render_in_decimal_and_binary() {
    let pad = two_by_two(&[InputEvent::button(0, true)]);
    let ports = VirtualPorts::new(DEFAULT_BASE).with_registers([0xFF, 0x00, 0xAA]);
    let mut poll = PollLoop::new(pad, ports, Vec::new(), config());
    assert!(poll.run().is_err());

    let (_, _, out) = poll.into_parts();
    let frame = last_frame(&out);
    assert!(frame.contains("255  \t\t0    \t\t170     \n"));
    assert!(frame.contains("11111111\t00000000\t10101010\n"));
}

#[test]
fn non_default_base_address_is_sampled() {
    let pad = two_by_two(&[InputEvent::button(0, true)]);
    let ports = VirtualPorts::new(0x278).with_registers([0x01, 0x02, 0x03]);
    let mut poll = PollLoop::new(
        pad,
        ports,
        Vec::new(),
        Config {
            base_address: 0x278,
            ..config()
        },
    );
    assert!(poll.run().is_err());
    let (_, ports, out) = poll.into_parts();
    assert_eq!(ports.reads(), 3);
    assert!(last_frame(&out).contains("00000001\t00000010\t00000011"));
}

#[test]
fn base_address_at_the_top_of_io_space_fails_cleanly() {
    let pad = two_by_two(&[InputEvent::axis(0, 1)]);
    let mut poll = PollLoop::new(
        pad,
        VirtualPorts::new(0xFFFE),
        Vec::new(),
        Config {
            base_address: 0xFFFE,
            ..config()
        },
    );
    let err = poll.run().unwrap_err();
    assert!(matches!(err, Error::Permission { .. }));
    assert_eq!(poll.phase(), Phase::Terminated(1));
    let (_, ports, out) = poll.into_parts();
    assert_eq!(ports.reads(), 0);
    assert!(out.is_empty());
}

#[test]
fn denied_grant_stops_before_any_register_read() {
    let mut ports = VirtualPorts::new(DEFAULT_BASE).deny_acquire();
    let pad = two_by_two(&[InputEvent::axis(0, 1), InputEvent::axis(0, 2)]);
    let mut poll = PollLoop::new(pad, &mut ports, Vec::new(), config());

    let err = poll.run().unwrap_err();
    assert!(matches!(err, Error::Permission { enable: true, .. }));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(poll.phase(), Phase::Terminated(1));
    assert_eq!(poll.frames(), 0);
    drop(poll);
    assert_eq!(ports.reads(), 0);
}

#[test]
fn no_arguments_prints_usage_and_exits_cleanly() {
    let err = Cli::parse(["joyport"]).unwrap_err();
    assert_eq!(err.exit_code(), 0);
    match err {
        Error::Usage { program } => {
            assert!(usage(&program).contains("Usage: joyport <device>"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
