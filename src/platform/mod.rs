//! Platform abstraction layer
//!
//! Browser-specific back-ends for the host traits:
//! - Storage (LocalStorage)
//! - Audio (`audio::WebAudio`) and the `WebGame` handle the page drives
//!
//! Native builds use `persistence::FileStore` and the headless host instead.

#[cfg(target_arch = "wasm32")]
pub mod web;
