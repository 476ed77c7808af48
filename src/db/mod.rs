pub mod entities;
pub mod enums;
pub mod schema;
pub mod seed;
pub mod services;
