pub mod external;
pub mod routes;

pub use routes::routes;
