pub mod extract;
pub mod health;
pub mod params;
pub mod routes;
