//! Configuration module

mod desk;

pub use desk::DeskConfig;
pub use desk::ImageConfig;
pub use desk::ReadingConfig;
pub use desk::API_URL_ENV;
