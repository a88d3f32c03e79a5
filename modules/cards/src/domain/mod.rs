pub mod document;
pub mod error;
pub mod id;
pub mod rules;
pub mod service;
pub mod store;
