pub mod chat_api;
pub mod secret_store;
