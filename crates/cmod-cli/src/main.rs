//! cmod - comment moderation CLI
//!
//! Moderate user comments attached to content items.
//!
//! ## Quick Start
//!
//! ```bash
//! # Create .cmod/config.toml and the data directory
//! cmod init
//!
//! # Register a post inside blog 1
//! cmod content add 42 --type BlogPost --title "Hello" --container 1
//!
//! # Submit and moderate a comment
//! cmod comment add --on 42 --author Ada --text "Nice post"
//! cmod comment list --status pending
//! cmod comment approve 1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
