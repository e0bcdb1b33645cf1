mod clipboard;
mod registry;

pub use clipboard::{Clipboard, PASTE_OFFSET};
pub use registry::ZoneRegistry;
