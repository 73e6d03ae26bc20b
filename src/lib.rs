pub mod common;
pub mod controller;
pub mod error;
pub mod host;
pub mod model;
