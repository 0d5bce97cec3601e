//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the display defaults.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Quadmap";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "quadmap";

/// Directory name used under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "Quadmap";

/// Width of the 4.2" dual-colour panel in landscape orientation.
pub const DEFAULT_DISPLAY_WIDTH: u32 = 400;

/// Height of the 4.2" dual-colour panel in landscape orientation.
pub const DEFAULT_DISPLAY_HEIGHT: u32 = 300;

/// Default HTTP port of the control plane.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// The only file extension accepted for mapping sources.
pub const SOURCE_EXTENSION: &str = "csv";
