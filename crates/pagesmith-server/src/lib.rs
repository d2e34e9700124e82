//! Development server with live reload for pagesmith sites.
//!
//! Serves the built page-set, watches its sources, re-runs the build task
//! that owns a changed file, and tells connected browsers to reload or swap
//! stylesheets.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use watcher::{watch_rules, ChangeKind, FileWatcher, WatchEvent, WatchRule};
pub use websocket::{ReloadHub, ReloadMessage};
