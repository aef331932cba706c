//! HTTP request handlers

pub mod docs;
pub mod health;
pub mod transit;
