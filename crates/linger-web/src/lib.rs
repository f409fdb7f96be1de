//! Browser bindings for Linger.
//!
//! [`WebElement`] adapts a DOM element to `TransitionTarget`, and [`WebTimers`]
//! backs `TimerHost` with `window.setTimeout`. Both are only available on
//! `wasm32`; on other targets this crate is empty and `linger_core::sim` is
//! the host to use.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::*;
