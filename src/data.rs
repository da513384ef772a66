pub mod filter;
pub mod student;
pub mod validation;
