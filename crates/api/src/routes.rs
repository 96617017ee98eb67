/// Next-slot query endpoints
pub mod availability;
/// Health check endpoints
pub mod health;
/// Teacher directory endpoints
pub mod teacher;
/// Ticket submission and workflow endpoints
pub mod ticket;
