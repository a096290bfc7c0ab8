// Property catalog
pub mod properties;

// Image hosting delegation
pub mod uploads;

pub use properties::PropertyService;
pub use uploads::UploadService;
