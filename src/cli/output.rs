use colored::Colorize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a success message to stderr, for commands writing content to stdout.
pub fn success_stderr(msg: &str) {
    eprintln!("  {} {}", "✓".green(), msg);
}

/// Print a warning message to stderr, for commands writing content to stdout.
pub fn warning_stderr(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg);
}
