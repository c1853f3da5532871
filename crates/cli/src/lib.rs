//! Host side of the asset browser: renderers, the interactive session and
//! the watch loop.
pub mod render;
pub mod session;
pub mod watch;
