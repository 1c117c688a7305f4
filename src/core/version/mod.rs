mod ordering;

pub use ordering::{latest_version, Version, VersionError};
