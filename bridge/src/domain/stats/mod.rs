//! Stats snapshot cleaning

mod sanitize;
mod skip_list;

pub use sanitize::{SanitizeError, sanitize};
pub use skip_list::SkipList;
