use color_eyre::Result;
use joyport::backends::ioport::IoPorts;
use joyport::cli::{usage, Cli};
use joyport::{logger, Config, ControllerSource, Error, PollLoop};
use std::path::Path;
use tracing::Level;

fn main() -> Result<()> {
    setup()?;

    let cli = match Cli::parse(std::env::args()) {
        Ok(cli) => cli,
        Err(Error::Usage { program }) => {
            print!("{}", usage(&program));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let config = Config::from_env()?;
    logger::init(config.level().unwrap_or(Level::WARN));

    let source = open_device(&cli.device)?;
    let stdout = std::io::stdout().lock();
    let mut poll = PollLoop::new(source, IoPorts::new(), stdout, config);
    poll.run()?;
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    Ok(())
}

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
fn open_device(path: &Path) -> Result<impl ControllerSource> {
    Ok(joyport::backends::joystick::JoystickDevice::open(path)?)
}

#[cfg(not(all(
    target_os = "linux",
    any(
        target_arch = "x86",
        target_arch = "x86_64",
        target_arch = "arm",
        target_arch = "aarch64",
        target_arch = "riscv64"
    )
)))]
fn open_device(path: &Path) -> Result<joyport::backends::virtual_input::VirtualController> {
    Err(color_eyre::eyre::eyre!(
        "cannot open device {}: joystick devices are not supported on this target",
        path.display()
    ))
}
