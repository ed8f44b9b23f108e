use std::fmt;

use serde::Serialize;

/// On-disk image formats the transformer reads and writes.
///
/// Output keeps the input's format; the kind is derived from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Kind for a file name such as `Shot_01.JPG`.
    ///
    /// The whole name is matched by suffix, so a bare `.png` counts too.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".png") {
            Some(Self::Png)
        } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    pub fn is_supported(name: &str) -> bool {
        Self::from_file_name(name).is_some()
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
