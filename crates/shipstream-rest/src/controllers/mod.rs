//! HTTP controllers.

pub mod admin_controller;
pub mod health_controller;
pub mod jobs_controller;
