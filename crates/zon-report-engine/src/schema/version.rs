use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static VERSION_REGEX: OnceLock<Regex> = OnceLock::new();

/// The version tag the bundled renderers understand.
pub const CURRENT_VERSION: &str = "zon-report@v1";

/// A parsed `kind@vMAJOR` schema tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    pub kind: String,
    pub major: u32,
}

impl SchemaVersion {
    /// Parse a tag such as `zon-report@v1`. Returns `None` for anything that
    /// does not follow the `kind@vN` shape.
    pub fn parse(tag: &str) -> Option<Self> {
        let regex = VERSION_REGEX.get_or_init(|| {
            Regex::new(r"^([a-z0-9][a-z0-9._-]*)@v(\d{1,9})$").expect("Invalid version regex")
        });
        let caps = regex.captures(tag)?;
        let major = caps[2].parse().ok()?;
        Some(Self {
            kind: caps[1].to_string(),
            major,
        })
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.kind, self.major)
    }
}

/// The set of schema versions a renderer declares support for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedVersions {
    versions: Vec<SchemaVersion>,
}

impl SupportedVersions {
    /// Build the set from tags. Malformed entries are skipped with a warning.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (supported, rejected) = Self::from_tags(tags);
        for tag in rejected {
            log::warn!("ignoring malformed supported version `{tag}`");
        }
        supported
    }

    /// Build the set and return the tags that are not schema versions.
    pub fn from_tags<I, S>(tags: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut versions = Vec::new();
        let mut rejected = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            match SchemaVersion::parse(tag) {
                Some(version) => versions.push(version),
                None => rejected.push(tag.to_string()),
            }
        }
        versions.sort();
        versions.dedup();
        (Self { versions }, rejected)
    }

    pub fn supports(&self, tag: &str) -> bool {
        SchemaVersion::parse(tag).is_some_and(|version| self.versions.contains(&version))
    }

    pub fn tags(&self) -> Vec<String> {
        self.versions.iter().map(ToString::to_string).collect()
    }
}

impl Default for SupportedVersions {
    fn default() -> Self {
        Self::new([CURRENT_VERSION])
    }
}
