pub mod account;
pub mod credential;
pub mod event;
pub mod repository;
pub mod types;
