//! Console logging with coloured module prefixes.
//!
//! ```ignore
//! log!("images"; "{} files updated", count);
//! debug!("repair"; "{} -> {}", old, new);
//! ```

use std::io::{Write, stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::{OwoColorize, Stream, Style};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable `debug!` output for the whole process.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Whether `debug!` output is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Log a message with a coloured module prefix.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message only when verbose output is enabled.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Write a single `[module] message` line to stdout.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    let style = match module.to_ascii_lowercase().as_str() {
        "images" => Style::new().bright_blue().bold(),
        "contacts" => Style::new().bright_magenta().bold(),
        "dry-run" => Style::new().bright_yellow().bold(),
        "error" => Style::new().bright_red().bold(),
        "done" => Style::new().bright_green().bold(),
        _ => Style::new().bright_cyan().bold(),
    };
    prefix
        .if_supports_color(Stream::Stdout, |text| text.style(style))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_keeps_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("images"), "[images]");
        assert_eq!(colorize_prefix("whatever"), "[whatever]");
    }
}
