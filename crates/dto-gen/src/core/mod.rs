pub mod mapper;
pub mod schema;
pub mod types;
