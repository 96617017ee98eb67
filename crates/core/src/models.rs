pub mod teacher;
pub mod ticket;
