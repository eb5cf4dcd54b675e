use crate::config::DEFAULT_BASE_URL;

/// Execute version command
pub fn execute() {
    println!("ygodb {}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Default wiki: {}", DEFAULT_BASE_URL);
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
}
