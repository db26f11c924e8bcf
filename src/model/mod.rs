pub mod aggregated;
pub mod bar;
pub mod signal;
