use std::fmt;

use thiserror::Error;

/// Separates name and version in on-disk names (`worldedit-7.3.0.jar`).
pub const DELIMITER: char = '-';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("empty {0}")]
    Empty(&'static str),

    #[error("{kind} {value:?} contains forbidden character {ch:?}")]
    ForbiddenChar {
        kind: &'static str,
        value: String,
        ch: char,
    },

    #[error("{kind} {value:?} must not start with '.'")]
    Hidden { kind: &'static str, value: String },
}

/// A `(name, version)` pair naming one artifact instance in a family.
///
/// Construction validates both halves, so every identity encodes to a
/// single path component and decodes back to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionedIdentity {
    name: String,
    version: String,
}

impl VersionedIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self, IdentityError> {
        let name = name.into();
        let version = version.into();
        validate_name(&name)?;
        validate_version(&version)?;
        Ok(Self { name, version })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for VersionedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, DELIMITER, self.version)
    }
}

/// Maps identities to file or directory names and back.
///
/// `name-version[.extension]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityCodec {
    extension: Option<&'static str>,
}

impl IdentityCodec {
    pub const fn new(extension: Option<&'static str>) -> Self {
        Self { extension }
    }

    pub fn encode(&self, identity: &VersionedIdentity) -> String {
        match self.extension {
            Some(ext) => format!("{identity}.{ext}"),
            None => identity.to_string(),
        }
    }

    /// Parse an on-disk name. `None` means the entry is not an artifact
    /// under this naming convention.
    pub fn decode(&self, file_name: &str) -> Option<VersionedIdentity> {
        let stem = match self.extension {
            Some(ext) => file_name
                .strip_suffix(ext)
                .and_then(|rest| rest.strip_suffix('.'))?,
            None => file_name,
        };

        // Names never contain the delimiter, so the first one splits.
        let (name, version) = stem.split_once(DELIMITER)?;
        VersionedIdentity::new(name, version).ok()
    }
}

/// Artifact names: no delimiter, no path separators, not hidden.
pub fn validate_name(name: &str) -> Result<(), IdentityError> {
    validate_component("name", name, &[DELIMITER, '/', '\\', '\0'])
}

/// Versions may carry the delimiter (`1.0.0-rc.1`).
pub fn validate_version(version: &str) -> Result<(), IdentityError> {
    validate_component("version", version, &['/', '\\', '\0'])
}

/// Directory names above the artifact level (minigame, format).
pub fn validate_bucket(bucket: &str) -> Result<(), IdentityError> {
    validate_component("bucket", bucket, &['/', '\\', '\0'])
}

fn validate_component(
    kind: &'static str,
    value: &str,
    forbidden: &[char],
) -> Result<(), IdentityError> {
    if value.is_empty() {
        return Err(IdentityError::Empty(kind));
    }
    if value.starts_with('.') {
        return Err(IdentityError::Hidden {
            kind,
            value: value.to_string(),
        });
    }
    if let Some(ch) = value.chars().find(|c| forbidden.contains(c)) {
        return Err(IdentityError::ForbiddenChar {
            kind,
            value: value.to_string(),
            ch,
        });
    }
    Ok(())
}
