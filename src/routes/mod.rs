pub mod admin;
pub mod candidature_routes;
pub mod health;
