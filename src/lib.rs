//! chirpstore - posts and accounts persisted in a single JSON document
//!
//! Layers, bottom to top:
//! - `store`: the document file and the transaction guard around it
//! - `repository`: typed collections with id allocation and validation
//! - `auth`: password hashing, session tokens, renewal tokens
//! - `api`: the service facade a transport builds on
//! - `cli`: a command-line transport over the service

pub mod api;
pub mod auth;
pub mod censor;
pub mod cli;
pub mod config;
pub mod observability;
pub mod repository;
pub mod store;
