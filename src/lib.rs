pub mod auth;
pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod http;
pub mod parser;
pub mod profile;
pub mod query;
pub mod services;
pub mod writer;
