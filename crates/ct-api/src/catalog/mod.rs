pub mod import;
pub mod migrate;
pub mod model;
pub mod routes;
pub mod service;

pub use routes::routes;
