//! Domain logic - pure release rules independent of process execution

pub mod options;
pub mod tag;
pub mod version;

pub use options::ReleaseOptions;
pub use tag::TagSet;
pub use version::TargetVersion;
