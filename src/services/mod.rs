pub mod attempt_service;
pub mod grader;
pub mod statistics;
pub mod visibility;
