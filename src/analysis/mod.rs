pub mod correlation;
pub mod monthly;
pub mod narrative;
pub mod summary;
