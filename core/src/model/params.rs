//! Request-parameter value types shared by the listing endpoints.

use std::fmt;

/// Resource attribute the server may sort listings by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Path,
    Created,
    Modified,
    Size,
    Deleted,
}

impl SortField {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Size => "size",
            Self::Deleted => "deleted",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "name" => Some(Self::Name),
            "path" => Some(Self::Path),
            "created" => Some(Self::Created),
            "modified" => Some(Self::Modified),
            "size" => Some(Self::Size),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Sort key for listing requests; descending keys serialize with a `-` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parse the wire form (`"name"`, `"-modified"`, ...); unknown fields
    /// yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.strip_prefix('-') {
            Some(field) => SortField::parse(field).map(Self::descending),
            None => SortField::parse(raw).map(Self::ascending),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field.as_str())
        } else {
            f.write_str(self.field.as_str())
        }
    }
}

/// Requested preview dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSize {
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
    /// Fixed width, proportional height (`"120x"`).
    Width(u32),
    /// Fixed height, proportional width (`"x120"`).
    Height(u32),
    /// Exact dimensions (`"120x240"`).
    Exact { width: u32, height: u32 },
}

impl fmt::Display for PreviewSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S => f.write_str("S"),
            Self::M => f.write_str("M"),
            Self::L => f.write_str("L"),
            Self::Xl => f.write_str("XL"),
            Self::Xxl => f.write_str("XXL"),
            Self::Xxxl => f.write_str("XXXL"),
            Self::Width(width) => write!(f, "{width}x"),
            Self::Height(height) => write!(f, "x{height}"),
            Self::Exact { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

/// File classification assigned by the server at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Audio,
    Backup,
    Book,
    Compressed,
    Data,
    Development,
    DiskImage,
    Document,
    Encoded,
    Executable,
    Flash,
    Font,
    Image,
    Settings,
    Spreadsheet,
    Text,
    Unknown,
    Video,
    Web,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Audio => "audio",
            Self::Backup => "backup",
            Self::Book => "book",
            Self::Compressed => "compressed",
            Self::Data => "data",
            Self::Development => "development",
            Self::DiskImage => "diskimage",
            Self::Document => "document",
            Self::Encoded => "encoded",
            Self::Executable => "executable",
            Self::Flash => "flash",
            Self::Font => "font",
            Self::Image => "image",
            Self::Settings => "settings",
            Self::Spreadsheet => "spreadsheet",
            Self::Text => "text",
            Self::Unknown => "unknown",
            Self::Video => "video",
            Self::Web => "web",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_round_trips_through_wire_form() {
        for raw in ["name", "path", "created", "modified", "size", "deleted", "-name", "-size"] {
            let key = SortKey::parse(raw).unwrap();
            assert_eq!(key.to_string(), raw);
        }
    }

    #[test]
    fn unknown_sort_field_is_none() {
        assert!(SortKey::parse("color").is_none());
        assert!(SortKey::parse("-color").is_none());
        assert!(SortKey::parse("").is_none());
    }

    #[test]
    fn preview_size_wire_forms() {
        assert_eq!(PreviewSize::S.to_string(), "S");
        assert_eq!(PreviewSize::Xxxl.to_string(), "XXXL");
        assert_eq!(PreviewSize::Width(120).to_string(), "120x");
        assert_eq!(PreviewSize::Height(240).to_string(), "x240");
        assert_eq!(
            PreviewSize::Exact {
                width: 120,
                height: 240
            }
            .to_string(),
            "120x240"
        );
    }

    #[test]
    fn media_type_wire_forms() {
        assert_eq!(MediaType::Audio.to_string(), "audio");
        assert_eq!(MediaType::DiskImage.to_string(), "diskimage");
        assert_eq!(MediaType::Web.to_string(), "web");
    }
}
