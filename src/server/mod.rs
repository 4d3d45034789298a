pub mod app;
pub mod errors;
mod extract;
pub mod pagination;
mod routes;
