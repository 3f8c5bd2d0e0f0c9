#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![warn(clippy::std_instead_of_core)]

use core::fmt;
use core::str::FromStr;

/// A semantic-version handle (`major.minor.patch`) compared against field
/// version predicates.
///
/// There is deliberately no `nil`/`None` variant on this type: "current /
/// newest" is represented at call sites as `Option<&Version>` being
/// `None`, matching spec.md's "a `nil` runtime version matches every
/// predicate" rule without baking absence into the version type itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(semver::Version);

impl Version {
    /// Constructs a version directly from its three numeric components.
    #[must_use]
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Parses a `major.minor.patch` string. Pre-release/build identifiers
    /// are accepted by the underlying parser but not required.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        semver::Version::parse(s.trim())
            .map(Self)
            .map_err(|_| VersionError::kind_only(VersionErrorKind::InvalidVersion))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error parsing a [`Version`] or [`VersionPredicate`].
pub type VersionError = pducodec_error::Error<VersionErrorKind>;

#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionErrorKind {
    /// The version string isn't a valid `major[.minor[.patch]]`.
    InvalidVersion,
    /// The predicate's comparator isn't one of `>=`, `<=`, `>`, `<`, `==`, `~>`.
    InvalidOperator,
    /// The predicate string has no comparator/version split (e.g. empty).
    MalformedPredicate,
}

impl std::error::Error for VersionErrorKind {}

impl fmt::Display for VersionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVersion => write!(f, "invalid version string"),
            Self::InvalidOperator => write!(f, "unsupported version predicate operator"),
            Self::MalformedPredicate => write!(f, "malformed version predicate"),
        }
    }
}

trait VersionErrorExt {
    fn kind_only(kind: VersionErrorKind) -> Self;
}

impl VersionErrorExt for VersionError {
    fn kind_only(kind: VersionErrorKind) -> Self {
        Self::new("pducodec_version", kind)
    }
}

/// Comparator used by a [`VersionPredicate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Op {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
    /// Ruby-style pessimistic constraint (`~>`): locks every component to
    /// the left of the last one given, allows the last one to float up.
    Pessimistic,
}

/// How many numeric components the predicate's version literal specified.
/// Only matters for `Pessimistic`, which locks the upper bound at the
/// precision one level coarser than the most specific component given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Precision {
    Major,
    Minor,
    Patch,
}

/// A semver comparator string such as `">= 2.0.0"` or `"~> 2.1"`, matched
/// against a runtime [`Version`] to decide whether a versioned field
/// contributes bytes / consumes bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionPredicate {
    op: Op,
    version: semver::Version,
    precision: Precision,
}

impl VersionPredicate {
    /// Parses a predicate string of the form `"<op> <version>"`, where
    /// `<op>` is one of `>=`, `<=`, `>`, `<`, `==`, `~>` and `<version>` is
    /// `major[.minor[.patch]]`.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let s = s.trim();

        let (op_str, rest) = split_operator(s).ok_or(VersionError::kind_only(VersionErrorKind::MalformedPredicate))?;
        let op = match op_str {
            ">=" => Op::Ge,
            "<=" => Op::Le,
            ">" => Op::Gt,
            "<" => Op::Lt,
            "==" | "=" => Op::Eq,
            "~>" => Op::Pessimistic,
            _ => return Err(VersionError::kind_only(VersionErrorKind::InvalidOperator)),
        };

        let (version, precision) = parse_partial_version(rest.trim())?;

        Ok(Self { op, version, precision })
    }

    /// Evaluates the predicate against a runtime version handle.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        let v = &version.0;
        match self.op {
            Op::Ge => *v >= self.version,
            Op::Le => *v <= self.version,
            Op::Gt => *v > self.version,
            Op::Lt => *v < self.version,
            Op::Eq => *v == self.version,
            Op::Pessimistic => {
                let upper = bump(&self.version, self.precision);
                *v >= self.version && *v < upper
            }
        }
    }
}

fn split_operator(s: &str) -> Option<(&str, &str)> {
    for op in ["~>", ">=", "<=", "==", ">", "<", "="] {
        if let Some(rest) = s.strip_prefix(op) {
            return Some((op, rest));
        }
    }
    None
}

fn parse_partial_version(s: &str) -> Result<(semver::Version, Precision), VersionError> {
    let mut parts = s.split('.');
    let major: u64 = parts
        .next()
        .filter(|p| !p.is_empty())
        .and_then(|p| p.parse().ok())
        .ok_or(VersionError::kind_only(VersionErrorKind::InvalidVersion))?;

    let minor = parts.next();
    let patch = parts.next();
    if parts.next().is_some() {
        return Err(VersionError::kind_only(VersionErrorKind::InvalidVersion));
    }

    match (minor, patch) {
        (None, None) => Ok((semver::Version::new(major, 0, 0), Precision::Major)),
        (Some(minor), None) => {
            let minor: u64 = minor.parse().map_err(|_| VersionError::kind_only(VersionErrorKind::InvalidVersion))?;
            Ok((semver::Version::new(major, minor, 0), Precision::Minor))
        }
        (Some(minor), Some(patch)) => {
            let minor: u64 = minor.parse().map_err(|_| VersionError::kind_only(VersionErrorKind::InvalidVersion))?;
            let patch: u64 = patch.parse().map_err(|_| VersionError::kind_only(VersionErrorKind::InvalidVersion))?;
            Ok((semver::Version::new(major, minor, patch), Precision::Patch))
        }
        (None, Some(_)) => unreachable!("split() never yields a patch component without a minor one"),
    }
}

fn bump(version: &semver::Version, precision: Precision) -> semver::Version {
    match precision {
        Precision::Major => semver::Version::new(version.major + 1, 0, 0),
        Precision::Minor => semver::Version::new(version.major, version.minor + 1, 0),
        Precision::Patch => semver::Version::new(version.major, version.minor, version.patch + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ge_predicate() {
        let p = VersionPredicate::parse(">= 2.0.0").unwrap();
        assert!(!p.matches(&Version::new(1, 9, 9)));
        assert!(p.matches(&Version::new(2, 0, 0)));
        assert!(p.matches(&Version::new(2, 1, 0)));
    }

    #[test]
    fn pessimistic_minor_precision() {
        let p = VersionPredicate::parse("~> 2.1").unwrap();
        assert!(!p.matches(&Version::new(2, 0, 9)));
        assert!(p.matches(&Version::new(2, 1, 0)));
        assert!(p.matches(&Version::new(2, 1, 99)));
        assert!(!p.matches(&Version::new(2, 2, 0)));
    }

    #[test]
    fn pessimistic_patch_precision() {
        let p = VersionPredicate::parse("~> 2.1.3").unwrap();
        assert!(p.matches(&Version::new(2, 1, 3)));
        assert!(!p.matches(&Version::new(2, 1, 4)));
        assert!(!p.matches(&Version::new(2, 1, 2)));
    }

    #[test]
    fn scenario_versioned_msg() {
        let newer = VersionPredicate::parse(">= 2.0.0").unwrap();
        let even_newer = VersionPredicate::parse(">= 2.1.0").unwrap();

        assert!(!newer.matches(&Version::new(1, 0, 0)));
        assert!(newer.matches(&Version::new(2, 0, 0)));
        assert!(!even_newer.matches(&Version::new(2, 0, 0)));
        assert!(even_newer.matches(&Version::new(2, 1, 0)));
    }

    #[test]
    fn rejects_unknown_operator() {
        let err = VersionPredicate::parse("?? 1.0.0").unwrap_err();
        assert!(matches!(err.kind(), VersionErrorKind::InvalidOperator));
    }
}
