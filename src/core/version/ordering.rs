use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("malformed version {version:?}: {reason}")]
    Malformed { version: String, reason: &'static str },

    #[error("no versions listed")]
    Empty,
}

/// One pre-release identifier (`beta`, `2`, `rc1`).
#[derive(Debug, Clone, PartialEq, Eq)]
enum PreRelease {
    Numeric(u64),
    Alpha(String),
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (PreRelease::Numeric(a), PreRelease::Numeric(b)) => a.cmp(b),
            (PreRelease::Numeric(_), PreRelease::Alpha(_)) => Ordering::Less,
            (PreRelease::Alpha(_), PreRelease::Numeric(_)) => Ordering::Greater,
            (PreRelease::Alpha(a), PreRelease::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dotted-numeric version with optional pre-release and build metadata.
///
/// Supported formats:
///   `1.20.4`, `v1.2`, `1.0.0-beta.2`, `1.0rc1`, `3.1.0+build.7`, `1.2.3.4`
///
/// Missing numeric segments compare as zero, so `1.2 == 1.2.0`.
/// Build metadata is kept in the raw string but ignored for ordering.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<u64>,
    pre: Vec<PreRelease>,
}

impl Version {
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let malformed = |reason| VersionError::Malformed {
            version: raw.to_string(),
            reason,
        };

        if raw.is_empty() {
            return Err(malformed("empty string"));
        }

        let body = raw.strip_prefix('v').unwrap_or(raw);
        let (body, build) = match body.split_once('+') {
            Some((body, build)) => (body, Some(build)),
            None => (body, None),
        };
        if let Some(build) = build {
            if !identifiers_are_valid(build) {
                return Err(malformed("invalid build metadata"));
            }
        }

        // The pre-release follows a `-`, or starts right after the last
        // number when it begins with a letter (`1.0rc1`).
        let core_len = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(body.len());
        let (core, rest) = body.split_at(core_len);
        let pre = if rest.is_empty() {
            None
        } else if let Some(pre) = rest.strip_prefix('-') {
            Some(pre)
        } else if rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '~') {
            Some(rest)
        } else {
            return Err(malformed("expected dot-separated numbers"));
        };

        let mut segments = Vec::new();
        for part in core.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed("expected dot-separated numbers"));
            }
            let n = part
                .parse::<u64>()
                .map_err(|_| malformed("numeric segment out of range"))?;
            segments.push(n);
        }

        let pre = match pre {
            Some(pre) => {
                if !identifiers_are_valid(pre) {
                    return Err(malformed("invalid pre-release"));
                }
                pre.split('.')
                    .map(|id| match id.parse::<u64>() {
                        Ok(n) if id.bytes().all(|b| b.is_ascii_digit()) => PreRelease::Numeric(n),
                        _ => PreRelease::Alpha(id.to_string()),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        Ok(Self {
            raw: raw.to_string(),
            segments,
            pre,
        })
    }

    /// The string exactly as the catalog listed it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn segment(&self, idx: usize) -> u64 {
        self.segments.get(idx).copied().unwrap_or(0)
    }
}

fn identifiers_are_valid(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|id| {
            !id.is_empty()
                && id
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'~')
        })
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for idx in 0..len {
            match self.segment(idx).cmp(&other.segment(idx)) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }

        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.pre.cmp(&other.pre),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Pick the greatest version of a list.
///
/// Every entry must parse; one malformed entry fails the whole list.
/// Among versions that order equal (`1.2` and `1.2.0`) the lexically
/// greatest raw string is returned, so the answer does not depend on
/// list order.
pub fn latest_version<S: AsRef<str>>(versions: &[S]) -> Result<String, VersionError> {
    let parsed = versions
        .iter()
        .map(|v| Version::parse(v.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    parsed
        .into_iter()
        .max_by(|a, b| a.cmp(b).then_with(|| a.raw.cmp(&b.raw)))
        .map(|v| v.raw)
        .ok_or(VersionError::Empty)
}
