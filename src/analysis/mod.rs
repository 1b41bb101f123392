/// Numeric core: outlier rejection, density estimation and baseline
/// correction. Everything here is pure; nothing touches the source table.

pub mod baseline;
pub mod density;
pub mod outlier;
pub mod stats;
