// src/lib.rs

//! Wildberries banner resolution library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
