pub mod scan;
pub mod sync;
