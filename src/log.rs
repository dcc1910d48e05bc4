use std::env;

use once_cell::sync::Lazy;

pub static DEBUG_ENABLED: Lazy<bool> = Lazy::new(|| {
    env::var("TMAKER_DEBUG").map_or(false, |log_level| log_level.eq("true") || log_level.eq("1"))
});

pub fn is_debug_enabled() -> bool {
    *DEBUG_ENABLED
}

/// Builds a message, appending the details only when debugging is enabled.
///
/// # Arguments
///
/// * `message` - The main message.
/// * `details` - Additional details shown in debug mode.
///
/// # Returns
///
/// A formatted string containing the message and, in debug mode, the details.
pub fn debug_message<M, D>(message: M, details: D) -> String
where
    M: AsRef<str>,
    D: AsRef<str>,
{
    if is_debug_enabled() {
        format!("{}{}", message.as_ref(), details.as_ref())
    } else {
        message.as_ref().to_string()
    }
}

/// Logs a debug message to stderr with optional formatted arguments.
///
/// Output goes to stderr so that rendered text on stdout stays untouched.
///
/// # Examples
///
/// ```
/// use tmaker::debug;
///
/// debug!("Token decoded");
/// debug!("Template {} not found, rendering empty", "card");
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:expr) => {
        if $crate::log::is_debug_enabled() {
            eprintln!("{}", nu_ansi_term::Color::Yellow.paint(format!("{}", $fmt)));
        }
    };
    ($fmt:expr, $($arg:tt)*) => {
        if $crate::log::is_debug_enabled() {
            eprintln!("{}", nu_ansi_term::Color::Yellow.paint(format!($fmt, $($arg)*)));
        }
    };
}
