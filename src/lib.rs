//! Animated kernel density plots of chess rating distributions, month by
//! month, for any selection of regions and federations.

pub mod app;
pub mod config;
pub mod controller;
pub mod frame;
pub mod hierarchy;
pub mod kde;
pub mod loader;
pub mod playback;
pub mod scene;
pub mod search;
pub mod stats;
pub mod themes;
pub mod widgets;

pub use app::{run, ViewerApp};
pub use config::ViewerConfig;
pub use controller::{Controller, UiEvent};
pub use loader::{load, DataSources, Dataset, LoadError};
