pub mod aggregate;
pub mod clean;
pub mod correlation;
pub mod outliers;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod rank;
pub mod segment;
pub mod stats;
