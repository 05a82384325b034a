//! A small forward renderer for a lit, animated chicken.
//!
//! Everything here is headless: the [`engine::Engine`] turns scene state into draw calls
//! for any [`gfx::Rasterizer`]. The window and GPU backend live in the `henhouse` binary.

pub mod config;
pub mod engine;
pub mod game;
pub mod gfx;
pub mod math;
pub mod util;
