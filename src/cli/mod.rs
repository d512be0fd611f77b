pub mod import;
pub mod serve;
pub mod stats;
pub mod sweep;
