#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Password-protected task boards: each board owns ordered columns, each column owns"]
#![doc = "ordered cards, and every mutation is gated by a board-scoped session credential."]
#![doc = "The binary (`main.rs`) wires these modules into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod ordering;
pub mod routes;
pub mod service;
pub mod store;

pub use crate::error::AppError;
pub use crate::service::BoardService;
