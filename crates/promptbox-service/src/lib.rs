mod blocking;
mod clipboard;
mod controller;
mod error;
mod notify;
mod persistence;
mod state;
pub mod transfer;

pub use blocking::BlockingBackend;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use controller::{Command, Controller, Outcome, DELETE_PROMPT, IMPORT_DONE};
pub use error::{ImportError, ServiceError};
pub use notify::{NoticeLevel, Notification};
pub use persistence::Persistence;
pub use state::AppState;
