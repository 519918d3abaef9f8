pub mod config;
pub mod state;
pub mod error;
pub mod session;
pub mod routes;
pub mod handlers;
