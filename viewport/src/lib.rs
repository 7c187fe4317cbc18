//! Pan/zoom viewport controller for the bounded world map.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It turns
//! raw mouse, wheel, and touch input into a camera transform over a fixed
//! world rectangle: drag with momentum, eased wheel zoom about the pointer,
//! and pinch zoom about the touch midpoint, all clamped so the map always
//! covers the viewport. The host page only mounts it on an element; the
//! [`web`] module wires DOM events and animation frames to the
//! [`controller::Controller`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable gesture state machine [`engine::EngineCore`] |
//! | [`controller`] | Binds the core to a host surface, event source, and frame scheduler |
//! | [`host`] | Host traits and [`host::HostError`] |
//! | [`web`] | DOM / `requestAnimationFrame` implementations and the JS entry point |
//! | [`camera`] | Camera, viewport limits, bounds clamp, focal-point zoom |
//! | [`animation`] | Loop state, frame-step timing, zoom settling and inertia |
//! | [`input`] | Input event types and the gesture state enum |
//! | [`config`] | Serde-loadable tuning with validation |
//! | [`world`] | Unlock flags, asset manifest, interactable points |
//! | [`hit`] | Hit-testing interactable points |
//! | [`consts`] | Default tuning constants and world dimensions |

pub mod animation;
pub mod camera;
pub mod config;
pub mod consts;
pub mod controller;
pub mod engine;
pub mod hit;
pub mod host;
pub mod input;
pub mod web;
pub mod world;
