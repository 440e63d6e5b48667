use crossterm::style::Stylize;
use std::io::Write;

/// Echo one spoken line, e.g. `Remény mondja: Emlékezz.`
pub fn show_speech(name: &str, text: &str) {
    print!("\r\x1b[K{} {}\n", format!("{} mondja:", name).magenta(), text);
    std::io::stdout().flush().ok();
}

pub fn show_listening() {
    print!("\r\x1b[K{}\n", "● Listening...".yellow());
    std::io::stdout().flush().ok();
}

pub fn show_heard(text: &str) {
    print!("\r\x1b[K{}\n", format!("» {}", text).dark_grey());
    std::io::stdout().flush().ok();
}

pub fn show_notice(text: &str) {
    print!("\r\x1b[K{}\n", text.cyan());
    std::io::stdout().flush().ok();
}

pub fn show_warning(text: &str) {
    print!("\r\x1b[K{}\n", text.red());
    std::io::stdout().flush().ok();
}

pub fn prompt(user: &str) {
    print!("{} ", format!("{}>", user).bold());
    std::io::stdout().flush().ok();
}
