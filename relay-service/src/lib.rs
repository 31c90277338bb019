//! Chat relay: forwards user prompts to Gemini behind a persona instruction.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod persona;
pub mod services;
pub mod startup;

pub use startup::{AppState, Application, build_router};
