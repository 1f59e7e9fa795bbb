//! Web form gateway for the heart-failure survival classifier
//!
//! `GET /` serves the input form, `POST /result` turns the submitted fields
//! into a feature vector, asks the model service for a class code and
//! renders the outcome, `GET /health` reports the loaded artifact.

pub mod config;
pub mod server;
pub mod templates;

pub use config::GatewayConfig;
pub use server::{build_router, serve, start_server, AppState};
