//! Status messages on stderr.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether messages are colored.
///
/// Colors are off with `--no-color` or when `NO_COLOR` is set.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && std::env::var_os("NO_COLOR").is_none();
    COLORS.store(enabled, Ordering::Relaxed);
}

fn colors() -> bool {
    COLORS.load(Ordering::Relaxed)
}

pub fn success(message: &str) {
    if colors() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn warning(message: &str) {
    if colors() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {message}");
    }
}
