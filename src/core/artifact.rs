//! Build artifacts handed to a pass.

/// Content of one build output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactContent {
    Text(String),
    /// Non UTF-8 content. Never scanned, always passed through.
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the build output root, `/`-separated.
    pub filename: String,
    pub content: ArtifactContent,
}

impl Artifact {
    pub fn text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: ArtifactContent::Text(text.into()),
        }
    }

    pub fn binary(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content: ArtifactContent::Binary(bytes),
        }
    }

    /// Build an artifact from raw file content, treating valid UTF-8 as text.
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => Self::text(filename, text),
            Err(err) => Self::binary(filename, err.into_bytes()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            ArtifactContent::Text(text) => Some(text),
            ArtifactContent::Binary(_) => None,
        }
    }

    /// Final path component of the filename.
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.filename)
    }

    /// Extension of the basename, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.basename();
        name.rfind('.')
            .filter(|&dot| dot > 0)
            .map(|dot| &name[dot + 1..])
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.content {
            ArtifactContent::Text(text) => text.as_bytes(),
            ArtifactContent::Binary(bytes) => bytes,
        }
    }
}
