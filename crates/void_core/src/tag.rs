//! Hierarchical tags
//!
//! A tag is a dotted path such as `Equipment.Hand.Main`. Each segment is a
//! parent of the tags below it, so `Equipment.Hand.Main` matches
//! `Equipment.Hand` and `Equipment`, but not `Equipment.Head`.

use core::fmt;
use core::hash::{Hash, Hasher};

/// Separator between tag segments
pub const TAG_SEPARATOR: char = '.';

/// A named, hierarchical tag with a precomputed FNV-1a hash
#[derive(Clone)]
pub struct Tag {
    name: Box<str>,
    hash: u64,
}

fn fnv1a(name: &str) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for byte in name.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

impl Tag {
    /// Create a new tag. Leading/trailing separators and whitespace are trimmed.
    pub fn new(name: &str) -> Self {
        let name = name.trim().trim_matches(TAG_SEPARATOR);
        Self {
            name: name.into(),
            hash: fnv1a(name),
        }
    }

    /// The empty tag, which matches nothing
    pub fn none() -> Self {
        Self::new("")
    }

    /// Whether this is the empty tag
    #[inline]
    pub fn is_none(&self) -> bool {
        self.name.is_empty()
    }

    /// Get the full dotted name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the precomputed hash
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }

    /// Iterate over the segments of this tag
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split(TAG_SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// The direct parent (`A.B.C` -> `A.B`), if any
    pub fn parent(&self) -> Option<Tag> {
        self.name
            .rfind(TAG_SEPARATOR)
            .map(|pos| Tag::new(&self.name[..pos]))
    }

    /// Append a child segment
    pub fn child(&self, segment: &str) -> Tag {
        if self.is_none() {
            Tag::new(segment)
        } else {
            Tag::new(&format!("{}{}{}", self.name, TAG_SEPARATOR, segment))
        }
    }

    /// True if `self` equals `other` or is a descendant of it.
    ///
    /// The empty tag never matches.
    pub fn matches(&self, other: &Tag) -> bool {
        if self.is_none() || other.is_none() {
            return false;
        }
        if self.hash == other.hash && self.name == other.name {
            return true;
        }
        self.name.len() > other.name.len()
            && self.name.starts_with(&*other.name)
            && self.name[other.name.len()..].starts_with(TAG_SEPARATOR)
    }

    /// True only if both tags are the same
    #[inline]
    pub fn matches_exact(&self, other: &Tag) -> bool {
        self == other
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Tag::new(&name))
    }
}
