//! Library crate for exploding-kittens-back, exposing modules for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;
