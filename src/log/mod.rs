use std::fmt::{self, Write as _};
use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::utils::hash::{self, StringHash};


// ----------------------------------------------
// Level
// ----------------------------------------------

#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Silent,
    Verbose,
    Info,
    Warn,
    Error,
}

impl Level {
    #[inline]
    pub fn is_enabled(self) -> bool {
        (self as u32) >= MIN_LEVEL.load(Ordering::Relaxed)
    }

    #[inline]
    fn ansi_color(self) -> Option<&'static str> {
        match self {
            Self::Silent  => None,
            Self::Verbose => Some("\x1b[90m"),
            Self::Info    => Some("\x1b[32m"),
            Self::Warn    => Some("\x1b[33m"),
            Self::Error   => Some("\x1b[31m"),
        }
    }
}

const ANSI_RESET: &str = "\x1b[0m";

// ----------------------------------------------
// Channel
// ----------------------------------------------

// Named message stream, e.g. "tilemap". Compared by name hash.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub name: &'static str,
    pub hash: StringHash,
}

impl Channel {
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self { name, hash: hash::fnv1a_from_str(name) }
    }
}

impl Hash for Channel {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

#[macro_export]
macro_rules! channel {
    ($name:literal) => { $crate::log::Channel::new(concat!(" [", $name, "]")) };
}

// ----------------------------------------------
// LogSettings
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: Level,
    pub source_location: bool, // Append file:line and module to each line.
    pub tty_colors: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: Level::Verbose, source_location: false, tty_colors: true }
    }
}

static MIN_LEVEL: AtomicU32 = AtomicU32::new(Level::Verbose as u32);
static SOURCE_LOCATION: AtomicBool = AtomicBool::new(false);
static TTY_COLORS: AtomicBool = AtomicBool::new(true);

// Settings are process wide.
pub fn apply_settings(settings: &LogSettings) {
    MIN_LEVEL.store(settings.level as u32, Ordering::Relaxed);
    SOURCE_LOCATION.store(settings.source_location, Ordering::Relaxed);
    TTY_COLORS.store(settings.tty_colors, Ordering::Relaxed);
}

fn current_flags() -> (bool, bool) {
    (SOURCE_LOCATION.load(Ordering::Relaxed), TTY_COLORS.load(Ordering::Relaxed))
}

// ----------------------------------------------
// Listener
// ----------------------------------------------

#[derive(Copy, Clone, Debug)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
}

// What a listener receives: the unformatted message plus its metadata.
pub struct Record {
    pub level: Level,
    pub channel: Option<Channel>,
    pub location: Location,
    pub message: String,
}

static LISTENER: OnceLock<Box<dyn Fn(Record) + Send + Sync>> = OnceLock::new();

// One listener per process. Returns false if one is already installed.
pub fn set_listener<F>(listener_fn: F) -> bool
    where F: Fn(Record) + Send + Sync + 'static
{
    LISTENER.set(Box::new(listener_fn)).is_ok()
}

// ----------------------------------------------
// Output
// ----------------------------------------------

// "[Level] [channel] message", optionally colored and with the call site.
pub fn format_line(level: Level,
                   channel: Option<Channel>,
                   location: &Location,
                   source_location: bool,
                   tty_colors: bool,
                   args: fmt::Arguments) -> String {
    let (color_on, color_off) = match level.ansi_color() {
        Some(color) if tty_colors => (color, ANSI_RESET),
        _ => ("", ""),
    };

    let channel_name = channel.map_or("", |channel| channel.name);

    // Writing into a String cannot fail.
    let mut line = String::with_capacity(128);
    let _ = write!(line, "{color_on}[{level:?}]{channel_name}{color_off}");
    if source_location {
        let _ = write!(line, " {}:{} {} -", location.file, location.line, location.module);
    }
    let _ = write!(line, " {args}");
    line
}

pub fn print_internal(level: Level, channel: Option<Channel>, location: &Location, args: fmt::Arguments) {
    if !level.is_enabled() {
        return;
    }

    let (source_location, tty_colors) = current_flags();
    let line = format_line(level, channel, location, source_location, tty_colors, args);

    // Nothing sensible to do if stdout is gone.
    let _ = writeln!(std::io::stdout().lock(), "{line}");

    if let Some(listener) = LISTENER.get() {
        listener(Record { level, channel, location: *location, message: args.to_string() });
    }
}

// ----------------------------------------------
// Macros
// ----------------------------------------------

// Shared by the level macros below.
#[macro_export]
macro_rules! log_message {
    ($level:expr, $chan:expr, $fmt:literal $(, $($arg:tt)+)?) => {
        if $level.is_enabled() {
            $crate::log::print_internal(
                $level,
                $chan,
                &$crate::log::Location { file: file!(), line: line!(), module: module_path!() },
                format_args!($fmt $(, $($arg)+)?)
            );
        }
    };
}

#[macro_export]
macro_rules! verbose {
    ($fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Verbose, None, $fmt $(, $($arg)+)?) };
    ($chan:expr, $fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Verbose, Some($chan), $fmt $(, $($arg)+)?) };
}

#[macro_export]
macro_rules! info {
    ($fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Info, None, $fmt $(, $($arg)+)?) };
    ($chan:expr, $fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Info, Some($chan), $fmt $(, $($arg)+)?) };
}

#[macro_export]
macro_rules! warn {
    ($fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Warn, None, $fmt $(, $($arg)+)?) };
    ($chan:expr, $fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Warn, Some($chan), $fmt $(, $($arg)+)?) };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Error, None, $fmt $(, $($arg)+)?) };
    ($chan:expr, $fmt:literal $(, $($arg:tt)+)?) => { $crate::log_message!($crate::log::Level::Error, Some($chan), $fmt $(, $($arg)+)?) };
}

// Scoped usage: log::info!(), log::warn!(), etc.
#[allow(unused_imports)]
pub use crate::{channel, verbose, info, warn, error};
