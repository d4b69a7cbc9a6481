pub mod backend;
pub mod checkout;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod provider;
pub mod response;
pub mod routes;
pub mod state;
pub mod store;
