// Navigation tree library - exposes all core modules for testing

pub mod config;
pub mod model;
pub mod services;
pub mod view;
