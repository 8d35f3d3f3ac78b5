pub mod rank;
pub mod scan;
