pub mod account_routes;
pub mod audit_routes;
pub mod device_routes;
pub mod kiosk_routes;
pub mod location_routes;
pub mod organisation_routes;
pub mod poster_routes;
