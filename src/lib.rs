//! Procedural SDF raymarching kernel: an animated KIFS fractal over a floor, shaded with
//! Cook-Torrance lighting, wrapped in volumetric electric arcs and tone mapped for display.
//!
//! The kernel is a pure function of (pixel UV, [`params::FrameParams`], [`channel::Channel`]).
//! [`cpu::render_frame`] is a reference host that evaluates it for every pixel of a frame.

pub mod arc;
pub mod channel;
pub mod compositor;
pub mod config;
pub mod cpu;
pub mod kernel;
pub mod lighting;
pub mod march;
pub mod material;
pub mod math;
pub mod noise;
pub mod params;
pub mod post;
pub mod scene;

pub use channel::Channel;
pub use kernel::{fullscreen_vertex, Kernel, QuadVertex};
pub use params::FrameParams;
