//! Plain text loader

use sofia_application::LoadError;
use sofia_domain::{Document, SourceKind};
use std::path::Path;

pub async fn load_text(path: &Path) -> Result<Document, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LoadError::io(path, e))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| LoadError::parse(SourceKind::Txt, format!("not valid UTF-8: {}", e)))?;
    Ok(Document::new(
        SourceKind::Txt,
        text.strip_prefix('\u{feff}').unwrap_or(&text),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_text_keeps_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "\u{feff}line one\nline two\n").unwrap();

        let doc = load_text(&path).await.unwrap();
        assert_eq!(doc.content, "line one\nline two\n");
    }

    #[tokio::test]
    async fn test_load_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        assert!(load_text(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, [0x4f, 0x6c, 0xe1]).unwrap();

        let err = load_text(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { kind: SourceKind::Txt, .. }));
    }
}
