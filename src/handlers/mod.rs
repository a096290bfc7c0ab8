// Shared response and validation helpers
pub mod common;

// Property catalog endpoints
pub mod properties;

// Image upload endpoint
pub mod uploads;

pub use properties::property_routes;
pub use uploads::upload_routes;
