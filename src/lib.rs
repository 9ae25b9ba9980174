pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod gallery;
pub mod headless;
pub mod render;
pub mod state;
pub mod ui;
