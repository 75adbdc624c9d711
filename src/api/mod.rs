pub mod auth;
pub mod investments;
pub mod routes;
