pub mod auth_service;
pub mod poster_workflow;
pub mod template_recommendation;
