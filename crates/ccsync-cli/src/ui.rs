//! Leveled status lines

use colored::Colorize;

pub fn info(msg: impl AsRef<str>) {
    println!("{} {}", "[INFO]".cyan(), msg.as_ref());
}

pub fn success(msg: impl AsRef<str>) {
    println!("{} {}", "[OK]".green(), msg.as_ref());
}

pub fn warn(msg: impl AsRef<str>) {
    println!("{} {}", "[WARN]".yellow(), msg.as_ref());
}

pub fn error(msg: impl AsRef<str>) {
    eprintln!("{} {}", "[ERROR]".red(), msg.as_ref());
}
