//! Document entities

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Separator placed between the parts of a multi-part document.
pub const PART_SEPARATOR: &str = "\n\n";

/// Kind of source a document is loaded from (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Site,
    Youtube,
    Pdf,
    Csv,
    Txt,
    Excel,
    Image,
}

impl SourceKind {
    /// All kinds, in menu order.
    pub const ALL: [SourceKind; 7] = [
        SourceKind::Site,
        SourceKind::Youtube,
        SourceKind::Pdf,
        SourceKind::Csv,
        SourceKind::Txt,
        SourceKind::Excel,
        SourceKind::Image,
    ];

    /// Stable tag used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Site => "site",
            SourceKind::Youtube => "youtube",
            SourceKind::Pdf => "pdf",
            SourceKind::Csv => "csv",
            SourceKind::Txt => "txt",
            SourceKind::Excel => "excel",
            SourceKind::Image => "image",
        }
    }

    /// Human label, as it appears in the system prompt
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Site => "Site",
            SourceKind::Youtube => "Youtube",
            SourceKind::Pdf => "Pdf",
            SourceKind::Csv => "Csv",
            SourceKind::Txt => "Txt",
            SourceKind::Excel => "Excel",
            SourceKind::Image => "Image",
        }
    }

    /// Whether the location is a URL / video id rather than a local path
    pub fn is_remote(&self) -> bool {
        matches!(self, SourceKind::Site | SourceKind::Youtube)
    }

    /// File extensions accepted for local kinds (empty for remote kinds)
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            SourceKind::Site | SourceKind::Youtube => &[],
            SourceKind::Pdf => &["pdf"],
            SourceKind::Csv => &["csv"],
            SourceKind::Txt => &["txt"],
            SourceKind::Excel => &["xlsx", "xls"],
            SourceKind::Image => &["png", "jpg", "jpeg"],
        }
    }

    /// Prompt shown to the user when asking for a location of this kind
    pub fn location_hint(&self) -> &'static str {
        match self {
            SourceKind::Site => "site URL",
            SourceKind::Youtube => "video URL or id",
            SourceKind::Pdf => "path to a .pdf file",
            SourceKind::Csv => "path to a .csv file",
            SourceKind::Txt => "path to a .txt file",
            SourceKind::Excel => "path to a .xlsx/.xls file",
            SourceKind::Image => "path to a .png/.jpg/.jpeg image",
        }
    }

    /// Guess the kind from a location string.
    ///
    /// YouTube hosts win over the generic `http(s)://` rule; local paths are
    /// matched by extension.
    pub fn infer(location: &str) -> Result<Self, DomainError> {
        let lower = location.trim().to_ascii_lowercase();
        if lower.contains("youtube.com/") || lower.contains("youtu.be/") {
            return Ok(SourceKind::Youtube);
        }
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(SourceKind::Site);
        }

        let extension = Path::new(&lower)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_string();

        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.extensions().contains(&extension.as_str()))
            .ok_or_else(|| DomainError::UninferableSource(location.to_string()))
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "site" | "web" | "url" => Ok(SourceKind::Site),
            "youtube" | "video" => Ok(SourceKind::Youtube),
            "pdf" => Ok(SourceKind::Pdf),
            "csv" => Ok(SourceKind::Csv),
            "txt" | "text" => Ok(SourceKind::Txt),
            "excel" | "xlsx" | "xls" | "spreadsheet" => Ok(SourceKind::Excel),
            "image" | "imagem" | "png" | "jpg" | "jpeg" => Ok(SourceKind::Image),
            _ => Err(DomainError::UnknownSourceKind(s.to_string())),
        }
    }
}

impl Serialize for SourceKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Where a document comes from (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub kind: SourceKind,
    /// URL or video id for remote kinds, file path otherwise
    pub location: String,
}

impl DocumentSource {
    pub fn new(kind: SourceKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
        }
    }

    /// Build a source, inferring the kind when none is given
    pub fn resolve(kind: Option<SourceKind>, location: impl Into<String>) -> Result<Self, DomainError> {
        let location = location.into();
        let kind = match kind {
            Some(kind) => kind,
            None => SourceKind::infer(&location)?,
        };
        Ok(Self::new(kind, location))
    }
}

impl std::fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.location)
    }
}

/// Normalized text extracted from a source (Entity)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub kind: SourceKind,
    pub content: String,
}

impl Document {
    pub fn new(kind: SourceKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    /// Build a document from loader parts joined with [`PART_SEPARATOR`]
    pub fn from_parts<I, S>(kind: SourceKind, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(kind, join_parts(parts))
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }
}

/// Concatenate multi-part loader output with blank-line separators
pub fn join_parts<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            joined.push_str(PART_SEPARATOR);
        }
        joined.push_str(part.as_ref());
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_parse_tags_and_labels() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.as_str().parse::<SourceKind>().unwrap(), kind);
            assert_eq!(kind.label().parse::<SourceKind>().unwrap(), kind);
        }
        assert_eq!("Imagem".parse::<SourceKind>().unwrap(), SourceKind::Image);
        assert_eq!("XLSX".parse::<SourceKind>().unwrap(), SourceKind::Excel);
        assert!("docx".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_infer_kind() {
        assert_eq!(
            SourceKind::infer("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            SourceKind::Youtube
        );
        assert_eq!(SourceKind::infer("https://youtu.be/dQw4w9WgXcQ").unwrap(), SourceKind::Youtube);
        assert_eq!(SourceKind::infer("https://example.com/post").unwrap(), SourceKind::Site);
        assert_eq!(SourceKind::infer("report.PDF").unwrap(), SourceKind::Pdf);
        assert_eq!(SourceKind::infer("/tmp/sales.xls").unwrap(), SourceKind::Excel);
        assert_eq!(SourceKind::infer("scan.jpeg").unwrap(), SourceKind::Image);
        assert!(matches!(
            SourceKind::infer("notes.docx"),
            Err(DomainError::UninferableSource(_))
        ));
    }

    #[test]
    fn test_remote_kinds_have_no_extensions() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.is_remote(), kind.extensions().is_empty());
        }
    }

    #[test]
    fn test_resolve_prefers_explicit_kind() {
        let source = DocumentSource::resolve(Some(SourceKind::Txt), "data.csv").unwrap();
        assert_eq!(source.kind, SourceKind::Txt);
        let source = DocumentSource::resolve(None, "data.csv").unwrap();
        assert_eq!(source.kind, SourceKind::Csv);
    }

    #[test]
    fn test_join_parts_uses_blank_lines() {
        assert_eq!(join_parts(["a", "b", "c"]), "a\n\nb\n\nc");
        assert_eq!(join_parts(["only"]), "only");
        assert_eq!(join_parts(Vec::<String>::new()), "");
    }

    #[test]
    fn test_document_from_parts() {
        let doc = Document::from_parts(SourceKind::Pdf, vec!["page 1".to_string(), "page 2".to_string()]);
        assert_eq!(doc.content, "page 1\n\npage 2");
        assert!(!doc.is_empty());
        assert!(Document::new(SourceKind::Txt, "  \n").is_empty());
    }
}
