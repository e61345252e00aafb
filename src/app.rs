//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the library, the
//! playback session and the UI flags.

mod model;

pub use model::*;
