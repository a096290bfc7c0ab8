pub mod property;

pub use property::{Location, PropertyStatus, PropertyType};
