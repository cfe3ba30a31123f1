//! HTTP handlers

pub mod health;
pub mod home;
pub mod model;
pub mod predict;
