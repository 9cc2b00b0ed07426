pub mod config;
pub mod cookie;
pub mod routes;
pub mod state;
