//! CLI command messaging system
//!
//! Coloured one-line messages for the `config` and `snapshot` commands and
//! for session startup warnings. Warnings and errors go to stderr so that
//! snapshot tables on stdout stay clean.

const YELLOW: &str = "\x1b[1;33m";
const BRIGHT_RED: &str = "\x1b[1;91m";
const RED: &str = "\x1b[1;31m";
const GREEN: &str = "\x1b[1;32m";
const RESET: &str = "\x1b[0m";

fn title_and_details(tag: &str, color: &str, title: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{}[{}]{} {}", color, tag, RESET, title)
    } else {
        format!("{}[{}]{} {}\t {}", color, tag, RESET, title, details)
    }
}

/// Print CLI command info message
pub fn print_info(title: &str, details: &str) {
    println!("{}", title_and_details("INFO", YELLOW, title, details));
}

/// Print CLI command warn message
pub fn print_warn(title: &str, details: &str) {
    eprintln!("{}", title_and_details("WARN", BRIGHT_RED, title, details));
}

/// Print CLI command error
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{}[ERROR]{} {}", RED, RESET, title);
    if let Some(details) = details {
        eprintln!("{}[ERROR]{} Details: {}", RED, RESET, details);
    }
}

/// Print CLI command success
pub fn print_success(title: &str, details: &str) {
    println!("{}", title_and_details("SUCCESS", GREEN, title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}
