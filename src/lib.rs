//! Seeded pixel-art plants and the garden that grows them.
//!
//! [`plant::generate_plant_pixels`] turns a seed string and a growth stage
//! into an ordered list of coloured pixels on a 32x32 grid. The [`garden`]
//! module tracks points, watering and bloom coupons. [`store`] persists it.

pub mod config;
pub mod error;
pub mod export;
pub mod garden;
pub mod palette;
pub mod plant;
pub mod rng;
pub mod settings;
pub mod store;
pub mod terminal;
pub mod view;

pub use error::{GardenError, Result};
pub use plant::{generate_plant_pixels, Pixel, PlantCanvas, Stage};
