pub mod model;
pub mod routes;
pub mod service;

pub use model::ProgressEntry;
pub use routes::routes;
