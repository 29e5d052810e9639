//! HTTP request handlers for the offset API.

pub mod health;
pub mod predict;
