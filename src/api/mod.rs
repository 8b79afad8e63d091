pub mod handlers;
pub mod middleware;
pub mod response;
mod routes;

pub use routes::create_router;
