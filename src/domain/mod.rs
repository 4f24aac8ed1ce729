//! Domain logic - pure release rules independent of git and the package manager

pub mod line_ending;
pub mod release_type;
pub mod tag;
pub mod target;
pub mod version;

pub use line_ending::LineEnding;
pub use release_type::ReleaseType;
pub use tag::VersionTemplate;
pub use target::Target;
