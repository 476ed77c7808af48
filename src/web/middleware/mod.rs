pub mod auth;
pub mod device_auth;
pub mod organisation;
