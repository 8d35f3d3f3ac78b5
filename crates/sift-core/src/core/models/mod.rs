pub mod chain;
pub mod job;
pub mod ranked;
