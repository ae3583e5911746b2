pub mod auth;
pub mod blog;
pub mod docs;
pub mod model;
pub mod user;
