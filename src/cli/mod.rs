//! CLI command handlers for Quadmap.
//!
//! Headless access to the renderer: render a file to the configured sink,
//! inspect how a file is interpreted, list stored sources, and print the
//! button-state table.

pub mod codes;
pub mod inspect;
pub mod list;
pub mod render;

pub use codes::CodesArgs;
pub use inspect::InspectArgs;
pub use list::ListArgs;
pub use render::RenderArgs;
