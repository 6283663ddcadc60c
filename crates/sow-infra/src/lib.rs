//! Infrastructure layer - persistence implementations, image encoding

pub mod image_data_uri;
pub mod persistence;
