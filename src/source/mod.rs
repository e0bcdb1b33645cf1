mod loader;

pub use loader::{SUPPORTED_EXTENSIONS, SourceImage, is_supported_image, load_source_image};
