//! Composite key codec for keyplan

mod composite;
mod format;

pub use composite::{all_parts_bound, key_name, key_value, KeySource, KEY_SEPARATOR};
pub use format::format_value;
