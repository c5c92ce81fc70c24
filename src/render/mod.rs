//! Rendering module for writing documents out.

mod json;

pub use json::{from_json, to_json, JsonFormat};
