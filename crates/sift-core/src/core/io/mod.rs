pub mod af3;
pub mod boltz;
pub mod input;
pub mod npz;
pub mod score_table;
