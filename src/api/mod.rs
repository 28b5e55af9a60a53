//! API handlers for Biblios REST endpoints

pub mod books;
pub mod health;
pub mod lending;
pub mod openapi;
pub mod users;
