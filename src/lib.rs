//! One-time animated intro overlay for web applications.
//!
//! The overlay is a small state machine ([`IntroOverlay`]) that renders into any
//! [`Surface`], driven by deadlines instead of its own timers. [`IntroHost`]
//! bundles the surface with a [`SessionStore`] and a [`Clock`] and implements the
//! once-per-session automatic trigger. On `wasm32` the `web` module wires all of
//! this to the browser.

pub mod clock;
pub mod config;
pub mod constants;
pub mod host;
pub mod markup;
pub mod memory;
pub mod overlay;
pub mod particle;
pub mod session;
pub mod state;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::{Clock, ManualClock};
pub use config::{ConfigError, IntroConfig, LogoSource};
pub use host::IntroHost;
pub use memory::MemoryDocument;
pub use overlay::IntroOverlay;
pub use session::{MemorySessionStore, SessionStore, StoreError};
pub use state::OverlayState;
pub use surface::{Mounted, Surface};
