//! Application module: exposes the UI model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds cursor, focus, prompt and
//! notice state. Playback state itself lives in the session.

mod model;

pub use model::*;
