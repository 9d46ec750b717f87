pub mod error;
pub mod filter;
pub mod record;
pub mod settings;
pub mod validate;

pub use error::ValidationError;
pub use filter::filter_records;
pub use record::{IdClock, PromptDraft, PromptForm, PromptRecord};
pub use settings::{LayoutMode, Settings};
pub use validate::validate;
