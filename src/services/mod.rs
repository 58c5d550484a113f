pub mod candidature_service;
pub mod submission_service;
pub mod upload_service;
