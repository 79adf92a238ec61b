//! Form state for the farmhand web app.
//!
//! Rendering frameworks come and go; the state machines behind the app's
//! form controls do not. This crate keeps those state machines pure and
//! framework-free: the rendering layer feeds in `focus`/`change`/`blur`
//! events and renders whatever [`BufferedInput::display`] says, while the
//! owning component stays the single source of truth for committed values.

pub mod color;
pub mod input;
pub mod peripherals;
pub mod util;

pub use color::{Color, random_color};
pub use input::BufferedInput;
pub use peripherals::{Peripheral, PeripheralForm, PeripheralList};
