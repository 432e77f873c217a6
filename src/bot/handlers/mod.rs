pub mod expense;
pub mod general;
