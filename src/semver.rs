//! Semantic versions and version ranges
//!
//! A [`VersionRange`] is kept as a union of intervals so that inclusion, overlap and containment
//! are plain interval arithmetic. The text it was parsed from is kept for printing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Bound;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::TypeAssertionError;

static VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?$",
    )
    .expect("version pattern")
});

static PARTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*|[xX*])(?:\.(0|[1-9]\d*|[xX*])(?:\.(0|[1-9]\d*|[xX*])(?:-([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?(?:\+([0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*))?)?)?$",
    )
    .expect("partial version pattern")
});

/// Pre-release identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    Numeric(u64),
    Alpha(String),
}

impl Identifier {
    fn parse(part: &str) -> Identifier {
        match part.parse::<u64>() {
            Ok(n) if !part.starts_with('0') || part == "0" => Identifier::Numeric(n),
            _ => Identifier::Alpha(part.to_string()),
        }
    }
}

impl Ord for Identifier {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::Alpha(_)) => Ordering::Less,
            (Identifier::Alpha(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::Alpha(a), Identifier::Alpha(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alpha(s) => write!(f, "{}", s),
        }
    }
}

/// A semantic version `major.minor.patch[-pre][+build]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<Identifier>,
    pub build: Vec<String>,
}

impl Version {
    pub const fn new(
        major: u64,
        minor: u64,
        patch: u64,
    ) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Version, TypeAssertionError> {
        let caps = VERSION
            .captures(text.trim())
            .ok_or_else(|| invalid_version(text))?;
        let number = |i: usize| -> Result<u64, TypeAssertionError> {
            caps[i].parse::<u64>().map_err(|_| invalid_version(text))
        };
        Ok(Version {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            prerelease: caps
                .get(4)
                .map(|m| m.as_str().split('.').map(Identifier::parse).collect())
                .unwrap_or_default(),
            build: caps
                .get(5)
                .map(|m| m.as_str().split('.').map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    fn next_major(&self) -> Version {
        Version::new(self.major + 1, 0, 0)
    }

    fn next_minor(&self) -> Version {
        Version::new(self.major, self.minor + 1, 0)
    }

    fn next_patch(&self) -> Version {
        Version::new(self.major, self.minor, self.patch + 1)
    }
}

fn invalid_version(text: &str) -> TypeAssertionError {
    TypeAssertionError::new("", format!("'{}' is not a valid semantic version", text))
}

impl Ord for Version {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.prerelease.cmp(&other.prerelease),
            })
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = TypeAssertionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (i, id) in self.prerelease.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { '-' } else { '.' }, id)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

/// Contiguous set of versions
#[derive(Debug, Clone, PartialEq, Eq)]
struct Interval {
    lower: Bound<Version>,
    upper: Bound<Version>,
}

impl Interval {
    const fn all() -> Interval {
        Interval {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    fn exact(version: Version) -> Interval {
        Interval {
            lower: Bound::Included(version.clone()),
            upper: Bound::Included(version),
        }
    }

    fn half_open(
        lower: Version,
        upper: Version,
    ) -> Interval {
        Interval {
            lower: Bound::Included(lower),
            upper: Bound::Excluded(upper),
        }
    }

    fn includes(
        &self,
        version: &Version,
    ) -> bool {
        let above = match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(v) => version >= v,
            Bound::Excluded(v) => version > v,
        };
        let below = match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(v) => version <= v,
            Bound::Excluded(v) => version < v,
        };
        above && below
    }

    fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Bound::Included(l), Bound::Included(u)) => l > u,
            (Bound::Included(l) | Bound::Excluded(l), Bound::Included(u) | Bound::Excluded(u)) => l >= u,
            _ => false,
        }
    }

    fn intersect(
        &self,
        other: &Interval,
    ) -> Interval {
        Interval {
            lower: max_lower(&self.lower, &other.lower),
            upper: min_upper(&self.upper, &other.upper),
        }
    }

    /// True when every version of `other` is in `self`
    fn contains(
        &self,
        other: &Interval,
    ) -> bool {
        max_lower(&self.lower, &other.lower) == other.lower
            && min_upper(&self.upper, &other.upper) == other.upper
    }
}

fn max_lower(
    a: &Bound<Version>,
    b: &Bound<Version>,
) -> Bound<Version> {
    match (a, b) {
        (Bound::Unbounded, x) | (x, Bound::Unbounded) => x.clone(),
        (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.max(y).clone()),
        (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.max(y).clone()),
        (Bound::Included(i), Bound::Excluded(e)) | (Bound::Excluded(e), Bound::Included(i)) => {
            if i > e {
                Bound::Included(i.clone())
            } else {
                Bound::Excluded(e.clone())
            }
        }
    }
}

fn min_upper(
    a: &Bound<Version>,
    b: &Bound<Version>,
) -> Bound<Version> {
    match (a, b) {
        (Bound::Unbounded, x) | (x, Bound::Unbounded) => x.clone(),
        (Bound::Included(x), Bound::Included(y)) => Bound::Included(x.min(y).clone()),
        (Bound::Excluded(x), Bound::Excluded(y)) => Bound::Excluded(x.min(y).clone()),
        (Bound::Included(i), Bound::Excluded(e)) | (Bound::Excluded(e), Bound::Included(i)) => {
            if i < e {
                Bound::Included(i.clone())
            } else {
                Bound::Excluded(e.clone())
            }
        }
    }
}

/// Partially specified version such as `1`, `1.2.x` or `1.2.3-rc1`
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    full: Option<Version>,
}

impl Partial {
    fn parse(
        text: &str,
        range: &str,
    ) -> Result<Partial, TypeAssertionError> {
        let caps = PARTIAL.captures(text).ok_or_else(|| invalid_range(range))?;
        let part = |i: usize| -> Option<u64> {
            caps.get(i)
                .map(|m| m.as_str())
                .filter(|s| !matches!(*s, "x" | "X" | "*"))
                .and_then(|s| s.parse().ok())
        };
        let (major, minor, patch) = (part(1), part(2), part(3));
        // A wildcard may not be followed by a concrete number
        if (major.is_none() && (minor.is_some() || patch.is_some())) || (minor.is_none() && patch.is_some()) {
            return Err(invalid_range(range));
        }
        let full = match (major, minor, patch) {
            (Some(_), Some(_), Some(_)) => Some(Version::parse(text)?),
            _ => None,
        };
        Ok(Partial {
            major,
            minor,
            patch,
            full,
        })
    }

    /// Lowest version matching the partial
    fn floor(&self) -> Version {
        match &self.full {
            Some(v) => v.clone(),
            None => Version::new(
                self.major.unwrap_or(0),
                self.minor.unwrap_or(0),
                self.patch.unwrap_or(0),
            ),
        }
    }

    /// First version above everything matching the partial; `None` when unbounded
    fn ceiling(&self) -> Option<Version> {
        match (self.major, self.minor, self.patch) {
            (None, _, _) => None,
            (Some(major), None, _) => Some(Version::new(major + 1, 0, 0)),
            (Some(major), Some(minor), None) => Some(Version::new(major, minor + 1, 0)),
            _ => None,
        }
    }

    fn interval(&self) -> Interval {
        if let Some(v) = &self.full {
            return Interval::exact(v.clone());
        }
        match self.ceiling() {
            Some(upper) => Interval::half_open(self.floor(), upper),
            None => Interval::all(),
        }
    }
}

fn invalid_range(text: &str) -> TypeAssertionError {
    TypeAssertionError::new("", format!("'{}' is not a valid version range", text))
}

fn comparator(
    text: &str,
    range: &str,
) -> Result<Interval, TypeAssertionError> {
    let (op, rest) = [">=", "<=", ">", "<", "=", "~>", "~", "^"]
        .iter()
        .find_map(|op| text.strip_prefix(op).map(|rest| (*op, rest.trim_start())))
        .unwrap_or(("", text));
    let partial = Partial::parse(rest, range)?;
    let floor = partial.floor();
    let interval = match op {
        "" | "=" => partial.interval(),
        ">=" => Interval {
            lower: Bound::Included(floor),
            upper: Bound::Unbounded,
        },
        ">" => match (&partial.full, partial.ceiling()) {
            (Some(v), _) => Interval {
                lower: Bound::Excluded(v.clone()),
                upper: Bound::Unbounded,
            },
            (None, Some(next)) => Interval {
                lower: Bound::Included(next),
                upper: Bound::Unbounded,
            },
            // `>*` matches nothing
            (None, None) => Interval {
                lower: Bound::Excluded(floor.clone()),
                upper: Bound::Excluded(floor),
            },
        },
        "<" => Interval {
            lower: Bound::Unbounded,
            upper: Bound::Excluded(floor),
        },
        "<=" => match (&partial.full, partial.ceiling()) {
            (Some(v), _) => Interval {
                lower: Bound::Unbounded,
                upper: Bound::Included(v.clone()),
            },
            (None, Some(next)) => Interval {
                lower: Bound::Unbounded,
                upper: Bound::Excluded(next),
            },
            (None, None) => Interval::all(),
        },
        "~" | "~>" => {
            let upper = match (partial.minor, partial.patch) {
                (None, _) => floor.next_major(),
                (Some(_), _) => floor.next_minor(),
            };
            Interval::half_open(floor, upper)
        }
        _ => {
            // Caret: the left-most non-zero component may not change
            let upper = if floor.major > 0 || partial.minor.is_none() {
                floor.next_major()
            } else if floor.minor > 0 || partial.patch.is_none() {
                floor.next_minor()
            } else {
                floor.next_patch()
            };
            Interval::half_open(floor, upper)
        }
    };
    Ok(interval)
}

/// Set of versions described by range notation: `>=1.0.0 <2.0.0`, `1.x`, `~1.2`, `^1.2.3`,
/// `1.0.0 - 2.0.0` and unions with `||`
#[derive(Debug, Clone)]
pub struct VersionRange {
    source: String,
    intervals: Vec<Interval>,
}

impl VersionRange {
    pub fn parse(text: &str) -> Result<VersionRange, TypeAssertionError> {
        let mut intervals = Vec::new();
        for alternative in text.split("||") {
            let alternative = alternative.trim();
            let interval = if alternative.is_empty() || alternative == "*" {
                Interval::all()
            } else if let Some((low, high)) = alternative.split_once(" - ") {
                let low = Partial::parse(low.trim(), text)?;
                let high = Partial::parse(high.trim(), text)?;
                let upper = match (&high.full, high.ceiling()) {
                    (Some(v), _) => Bound::Included(v.clone()),
                    (None, Some(next)) => Bound::Excluded(next),
                    (None, None) => Bound::Unbounded,
                };
                Interval {
                    lower: Bound::Included(low.floor()),
                    upper,
                }
            } else {
                let mut interval = Interval::all();
                for part in alternative.split_whitespace() {
                    interval = interval.intersect(&comparator(part, text)?);
                }
                interval
            };
            if !interval.is_empty() {
                intervals.push(interval);
            }
        }
        Ok(VersionRange {
            source: text.trim().to_string(),
            intervals,
        })
    }

    /// Range matching exactly one version
    pub fn exact(version: &Version) -> VersionRange {
        VersionRange {
            source: version.to_string(),
            intervals: vec![Interval::exact(version.clone())],
        }
    }

    pub fn includes(
        &self,
        version: &Version,
    ) -> bool {
        self.intervals.iter().any(|i| i.includes(version))
    }

    /// True when some version is in both ranges
    pub fn is_overlap(
        &self,
        other: &VersionRange,
    ) -> bool {
        self.intervals
            .iter()
            .any(|a| other.intervals.iter().any(|b| !a.intersect(b).is_empty()))
    }

    /// True when every version in `other` is also in `self`
    pub fn contains(
        &self,
        other: &VersionRange,
    ) -> bool {
        other
            .intervals
            .iter()
            .all(|b| self.intervals.iter().any(|a| a.contains(b)))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for VersionRange {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.source == other.source || self.intervals == other.intervals
    }
}

impl Eq for VersionRange {}

impl Hash for VersionRange {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.intervals.len().hash(state);
    }
}

impl FromStr for VersionRange {
    type Err = TypeAssertionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
