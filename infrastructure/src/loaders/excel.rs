//! Spreadsheet loader: every sheet rendered as an aligned text table

use calamine::{Data, Reader, open_workbook_auto};
use sofia_application::LoadError;
use sofia_domain::{Document, SourceKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column separator of rendered tables
const COLUMN_GAP: &str = "  ";

/// Placeholder for empty cells
const EMPTY_CELL: &str = "NaN";

pub async fn load_excel(path: &Path) -> Result<Document, LoadError> {
    let path: PathBuf = path.to_path_buf();
    let content = tokio::task::spawn_blocking(move || read_workbook(&path))
        .await
        .map_err(|e| LoadError::parse(SourceKind::Excel, format!("reader task failed: {}", e)))??;
    Ok(Document::new(SourceKind::Excel, content))
}

fn read_workbook(path: &Path) -> Result<String, LoadError> {
    if !path.exists() {
        return Err(LoadError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::parse(SourceKind::Excel, e))?;

    let mut content = String::new();
    for sheet in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| LoadError::parse(SourceKind::Excel, format!("sheet '{}': {}", sheet, e)))?;
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();
        debug!(sheet = %sheet, rows = rows.len(), "sheet read");

        content.push_str(&format!("\n\n--- {} ---\n\n", sheet));
        content.push_str(&render_table(&rows));
    }
    Ok(content)
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => EMPTY_CELL.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Right-aligned columns, the first row being the header
pub fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let cell = |row: &[String], i: usize| -> String {
        row.get(i).cloned().unwrap_or_else(|| EMPTY_CELL.to_string())
    };

    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .map(|row| cell(row, i).chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(i, width)| format!("{:>width$}", cell(row, i), width = width))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_render_table_right_aligns() {
        let table = render_table(&rows(&[&["name", "age"], &["Ana", "31"], &["Bartolomeu", "7"]]));
        assert_eq!(table, "      name  age\n       Ana   31\nBartolomeu    7");
    }

    #[test]
    fn test_render_table_pads_short_rows() {
        let table = render_table(&rows(&[&["a", "b"], &["1"]]));
        assert_eq!(table, "a    b\n1  NaN");
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&[]), "");
    }

    #[test]
    fn test_render_cell() {
        assert_eq!(render_cell(&Data::Float(31.0)), "31");
        assert_eq!(render_cell(&Data::Float(2.5)), "2.5");
        assert_eq!(render_cell(&Data::Empty), "NaN");
        assert_eq!(render_cell(&Data::String("x".to_string())), "x");
        assert_eq!(render_cell(&Data::Bool(true)), "true");
    }

    #[tokio::test]
    async fn test_load_excel_renders_every_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sales = workbook.add_worksheet().set_name("Vendas").unwrap();
        sales.write_string(0, 0, "produto").unwrap();
        sales.write_string(0, 1, "qtd").unwrap();
        sales.write_string(1, 0, "caneta").unwrap();
        sales.write_number(1, 1, 3).unwrap();
        sales.write_string(2, 0, "lapis").unwrap();
        sales.write_number(2, 1, 2.5).unwrap();
        let other = workbook.add_worksheet().set_name("Outra").unwrap();
        other.write_string(0, 0, "a").unwrap();
        workbook.save(&path).unwrap();

        let doc = load_excel(&path).await.unwrap();
        assert_eq!(doc.kind, SourceKind::Excel);
        assert_eq!(
            doc.content,
            "\n\n--- Vendas ---\n\nproduto  qtd\n caneta    3\n  lapis  2.5\n\n--- Outra ---\n\na"
        );
    }

    #[tokio::test]
    async fn test_missing_workbook() {
        let err = load_excel(Path::new("/nonexistent/sales.xlsx")).await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
