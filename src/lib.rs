//! Library crate for capture-search-rs exposing reusable modules.
pub mod decode;
pub mod lines;
pub mod matcher;
pub mod pipeline;
pub mod response;
pub mod types;
