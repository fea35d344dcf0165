//! The tri-namespace path model.
//!
//! Yandex Disk exposes three disjoint root scopes: application-private
//! storage (`app:/`), the user's disk (`disk:/`), and the trash (`trash:/`).
//! A [`DiskPath`] is a value type tying a relative path to one of them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A path inside one of the three storage namespaces.
///
/// Variant order matters: the derived comparisons sort `App` before `Disk`
/// before `Trash`, and paths inside the same namespace lexicographically.
/// Paths in different namespaces are never equal, even with identical
/// relative parts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiskPath {
    /// Application-private storage (`app:/...`).
    App(String),
    /// The user's disk storage (`disk:/...`).
    Disk(String),
    /// The trash (`trash:/...`).
    Trash(String),
}

impl DiskPath {
    /// An app-namespace path. A leading `app:/` scheme is stripped if present.
    pub fn app(path: &str) -> Self {
        let path = path.strip_prefix("app:/").unwrap_or(path);
        Self::App(without_trailing_slash(path).to_string())
    }

    /// A disk-namespace path. A leading `disk:/` scheme is stripped if present.
    pub fn disk(path: &str) -> Self {
        let path = path.strip_prefix("disk:/").unwrap_or(path);
        Self::Disk(without_trailing_slash(path).to_string())
    }

    /// A trash-namespace path. A leading `trash:/` scheme is stripped if present.
    pub fn trash(path: &str) -> Self {
        let path = path.strip_prefix("trash:/").unwrap_or(path);
        Self::Trash(without_trailing_slash(path).to_string())
    }

    /// Parse a path string, dispatching on its scheme prefix.
    ///
    /// Strings without a recognized prefix are treated as disk paths.
    /// Parsing never fails.
    pub fn parse(path: &str) -> Self {
        if path.starts_with("app:/") {
            Self::app(path)
        } else if path.starts_with("trash:/") {
            Self::trash(path)
        } else {
            Self::disk(path)
        }
    }

    /// The relative path inside the namespace, without the scheme prefix.
    pub fn relative(&self) -> &str {
        match self {
            Self::App(path) | Self::Disk(path) | Self::Trash(path) => path,
        }
    }

    /// The serialized form, percent-encoded for inclusion in a query string.
    ///
    /// The namespace prefix is encoded along with the rest of the path.
    pub fn url_encoded(&self) -> String {
        urlencoding::encode(&self.to_string()).into_owned()
    }

    /// Last path component, used for display purposes.
    pub fn file_name(&self) -> &str {
        self.relative().rsplit('/').next().unwrap_or_default()
    }
}

fn without_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

impl fmt::Display for DiskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(path) => write!(f, "app:/{path}"),
            Self::Disk(path) => write!(f, "disk:/{path}"),
            Self::Trash(path) => write!(f, "trash:/{path}"),
        }
    }
}

impl From<&str> for DiskPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl Serialize for DiskPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DiskPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
