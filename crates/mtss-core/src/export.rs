//! Export artifacts shared by the HTML and PDF packagers

use std::io;
use std::path::{Path, PathBuf};

/// A finished export file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, e.g. `Nsightz_Intervention_Menu.pdf`
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl ExportArtifact {
    pub const PDF_MIME: &'static str = "application/pdf";
    pub const HTML_MIME: &'static str = "text/html; charset=utf-8";

    pub fn new(filename: impl Into<String>, bytes: Vec<u8>, mime: &'static str) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mime,
        }
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write into `dir` under the suggested file name
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Wrote export");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_to_uses_filename() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ExportArtifact::new(
            "Nsightz_MTSS_Resource.html",
            b"<html></html>".to_vec(),
            ExportArtifact::HTML_MIME,
        );
        let path = artifact.write_to(dir.path()).unwrap();
        assert!(path.ends_with("Nsightz_MTSS_Resource.html"));
        assert_eq!(std::fs::read(path).unwrap(), b"<html></html>");
        assert_eq!(artifact.len(), 13);
    }
}
