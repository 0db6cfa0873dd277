//! Configuration management for portsweep.
//!
//! Provides XDG-compliant settings storage used as the defaults layer
//! beneath command-line flags.

mod settings;

pub use settings::{default_settings_file, AppSettings};
