pub mod beaches_api;
pub mod ckan;
pub mod db;
pub mod pdf_generation;
pub mod server;
pub mod services;
pub mod web;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

#[macro_use]
extern crate rust_i18n;

// Poster labels, English with Irish translations
i18n!("locales", fallback = "en");
