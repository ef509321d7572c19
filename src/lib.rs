pub mod app;
pub mod classifier;
pub mod colorbar;
pub mod config;
pub mod controller;
pub mod display_set;
pub mod layout;
pub mod menu;
pub mod presets;
pub mod services;
pub mod sync;
pub mod ui;
