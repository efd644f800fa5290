mod content;
mod raw;
mod state;
mod style;

pub use crate::content::*;
pub use crate::raw::*;
pub use crate::state::*;
pub use crate::style::*;
