pub mod access;
pub mod api;
pub mod backend;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
