pub mod config;
pub mod context;
pub mod event;
pub mod fetch;
pub mod handler;
pub mod infra;
pub mod secrets;
pub mod services;
pub mod storage;
