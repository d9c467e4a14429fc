pub mod app_config;
pub mod cache;
pub mod clock;
pub mod domain;
mod extensions;
mod geo_location_deserializer;
pub mod geolocation;
pub mod office;
