use std::io::{self, IsTerminal, Write};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum HapticError {
    #[error("haptic engine failed: {0}")]
    Engine(#[from] io::Error),
}

/// Something that can play a short transient pulse.
pub trait HapticEngine {
    fn supports_haptics(&self) -> bool;

    fn play_transient(&mut self) -> Result<(), HapticError>;
}

/// The terminal's closest thing to a vibration motor: the bell.
pub struct TerminalBell<W: Write> {
    out: W,
    is_terminal: bool,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let is_terminal = out.is_terminal();
        Self::new(out, is_terminal)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, is_terminal: bool) -> Self {
        TerminalBell { out, is_terminal }
    }
}

impl<W: Write> HapticEngine for TerminalBell<W> {
    fn supports_haptics(&self) -> bool {
        self.is_terminal
    }

    fn play_transient(&mut self) -> Result<(), HapticError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseOutcome {
    Played,
    Unsupported,
    Failed,
}

type EngineFactory = Box<dyn FnOnce() -> Result<Box<dyn HapticEngine>, HapticError>>;

enum EngineSlot {
    Pending(EngineFactory),
    Ready(Box<dyn HapticEngine>),
    Unavailable,
}

/// Owned handle to the haptic engine, started on the first pulse.
pub struct Haptics {
    slot: EngineSlot,
}

impl Haptics {
    pub fn lazy<F>(factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn HapticEngine>, HapticError> + 'static,
    {
        Haptics {
            slot: EngineSlot::Pending(Box::new(factory)),
        }
    }

    pub fn terminal_bell() -> Self {
        Self::lazy(|| Ok(Box::new(TerminalBell::stdout()) as Box<dyn HapticEngine>))
    }

    pub fn disabled() -> Self {
        Haptics {
            slot: EngineSlot::Unavailable,
        }
    }

    fn engine(&mut self) -> Option<&mut Box<dyn HapticEngine>> {
        if matches!(self.slot, EngineSlot::Pending(_)) {
            let EngineSlot::Pending(factory) =
                std::mem::replace(&mut self.slot, EngineSlot::Unavailable)
            else {
                return None;
            };
            match factory() {
                Ok(engine) => {
                    debug!("haptic engine started");
                    self.slot = EngineSlot::Ready(engine);
                }
                Err(e) => warn!(error = %e, "failed to start haptic engine"),
            }
        }
        match &mut self.slot {
            EngineSlot::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    /// Fires one pulse. Never fails loudly: problems are logged and reported in the outcome.
    pub fn pulse(&mut self) -> PulseOutcome {
        let Some(engine) = self.engine() else {
            return PulseOutcome::Unsupported;
        };
        if !engine.supports_haptics() {
            return PulseOutcome::Unsupported;
        }
        match engine.play_transient() {
            Ok(()) => PulseOutcome::Played,
            Err(e) => {
                warn!(error = %e, "haptic pulse failed");
                PulseOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts pulses instead of buzzing.
    pub(crate) struct CountingEngine {
        pub(crate) pulses: Rc<Cell<usize>>,
        pub(crate) supported: bool,
    }

    impl HapticEngine for CountingEngine {
        fn supports_haptics(&self) -> bool {
            self.supported
        }

        fn play_transient(&mut self) -> Result<(), HapticError> {
            self.pulses.set(self.pulses.get() + 1);
            Ok(())
        }
    }

    pub(crate) fn counting(supported: bool) -> (Haptics, Rc<Cell<usize>>) {
        let pulses = Rc::new(Cell::new(0));
        let engine = CountingEngine {
            pulses: Rc::clone(&pulses),
            supported,
        };
        (
            Haptics::lazy(move || Ok(Box::new(engine) as Box<dyn HapticEngine>)),
            pulses,
        )
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn engine_starts_once_on_first_pulse() {
        let starts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&starts);
        let mut haptics = Haptics::lazy(move || {
            counter.set(counter.get() + 1);
            Ok(Box::new(TerminalBell::new(Vec::new(), true)) as Box<dyn HapticEngine>)
        });
        assert_eq!(starts.get(), 0);

        assert_eq!(haptics.pulse(), PulseOutcome::Played);
        assert_eq!(haptics.pulse(), PulseOutcome::Played);
        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn start_failure_is_remembered_and_skipped() {
        let starts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&starts);
        let mut haptics = Haptics::lazy(move || {
            counter.set(counter.get() + 1);
            Err(HapticError::Engine(io::Error::other("no device")))
        });

        assert_eq!(haptics.pulse(), PulseOutcome::Unsupported);
        assert_eq!(haptics.pulse(), PulseOutcome::Unsupported);
        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn unsupported_hardware_is_skipped_silently() {
        let (mut haptics, pulses) = counting(false);
        assert_eq!(haptics.pulse(), PulseOutcome::Unsupported);
        assert_eq!(pulses.get(), 0);
    }

    #[test]
    fn write_failure_is_reported_not_raised() {
        let mut haptics =
            Haptics::lazy(|| Ok(Box::new(TerminalBell::new(BrokenWriter, true)) as Box<dyn HapticEngine>));
        assert_eq!(haptics.pulse(), PulseOutcome::Failed);
    }

    #[test]
    fn bell_writes_bel_byte() {
        let mut bell = TerminalBell::new(Vec::new(), true);
        bell.play_transient().unwrap();
        bell.play_transient().unwrap();
        assert_eq!(bell.out, b"\x07\x07");
    }

    #[test]
    fn disabled_handle_never_pulses() {
        assert_eq!(Haptics::disabled().pulse(), PulseOutcome::Unsupported);
    }
}
