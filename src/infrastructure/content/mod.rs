//! Built-in content providers.

pub mod image;

pub use image::ImageContentProvider;
