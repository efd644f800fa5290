pub mod altering;
pub mod editing;

pub use altering::{DEFAULT_ALTERING_PROMPT, SAVE_CMD, default_altering_registry};
pub use editing::{DEFAULT_EDITING_PROMPT, default_editing_registry};
