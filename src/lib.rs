// NOTE: Allow these for the whole project.
#![allow(clippy::collapsible_if)]
#![allow(clippy::new_without_default)]

pub mod log;
pub mod app;
pub mod config;
pub mod render;
pub mod sim;
pub mod tile;
pub mod utils;

pub use tile::view::TileMapView;
