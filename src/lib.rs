//! Dish recommendation service.
//!
//! Serves item-based collaborative-filtering recommendations over the food
//! platform's visit, like and search signals. Every request recomputes the
//! similarity structure from the current data; nothing is cached.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
