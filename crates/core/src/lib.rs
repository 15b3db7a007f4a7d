//! Scroll-driven page effects as a pure state machine.
//!
//! Hosts feed browser events into a [`Coordinator`] and apply the
//! [`DomCommand`]s it returns. Nothing in this crate touches the DOM.

pub mod config;
pub mod coordinator;
pub mod interaction;
pub mod layout;
pub mod menu;
pub mod nav;
pub mod observer;
pub mod parallax;
pub mod progress;
pub mod reveal;
pub mod schedule;
pub mod sections;
pub mod testing;

pub use config::{ConfigError, EffectsConfig, RootMargin};
pub use coordinator::Coordinator;
pub use layout::Layout;
pub use menu::{MenuEvent, MenuState};
pub use observer::{IntersectionEntry, ObserveOptions, ObserverBackend};
pub use scroll_fx_protocol::DomCommand;
