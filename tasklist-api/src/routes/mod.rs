/// API route handlers
///
/// - `health`: Health check endpoint
/// - `tasks`: Owner-scoped task list endpoints

pub mod health;
pub mod tasks;
