//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
//! Lines carry the `[*]` info, `[+]` success and `[!]` problem markers.

use colored::Colorize;

/// Print error (red "[!] Error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{} {}", "[!] Error:".red().bold(), msg);
}

/// Print warning (yellow "[!] Warning:" prefix)
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "[!] Warning:".yellow(), msg);
}

/// Print problem without the error label (red "[!]")
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "[!]".red(), msg);
}

/// Print success status (green "[+]")
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "[+]".green(), msg);
}

/// Print progress note (cyan "[*]")
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "[*]".cyan(), msg);
}

/// Print plain output (no marker, for usage lines and tool stderr)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}
