//! Area focus tracking
//!
//! Most-recently-used focus history for a tag-based window manager, and the
//! resolution of which client should be focused on a screen after the
//! focused client goes away or the screen's tag selection changes.

pub mod config;
pub mod wm;

pub use config::Config;
pub use wm::client::{Client, ClientId, ScreenId};
pub use wm::events::{EventResult, WmEvent};
pub use wm::focus::FocusHistory;
pub use wm::tag::{TagId, TagManager, TagService};
pub use wm::{WindowManager, WmError};
