use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Language-neutral category identifier (e.g., `OST_Walls`).
///
/// Identifiers are stable across host UI languages, which is why Stage 2b of
/// the category resolver falls back to them when display names do not match.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

/// Object-model class name (e.g., `WallType`, `ViewSheet`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(pub String);

/// Document-unique element identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl CategoryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ClassName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an element (or a class of elements) is a blueprint or a placed thing.
///
/// Serialized as `"type"` / `"instance"` to match the document schema. Unlike
/// open-ended catalog enums there is no `Other` variant: the resolver's
/// uniformity invariant depends on every element being exactly one of the two.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum ElementKind {
    TypeDefinition,
    Instance,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::TypeDefinition => "type",
            ElementKind::Instance => "instance",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "type" => Some(ElementKind::TypeDefinition),
            "instance" => Some(ElementKind::Instance),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).ok_or_else(|| {
            serde::de::Error::unknown_variant(&value, &["type", "instance"])
        })
    }
}
