//! # Document Artifacts
//!
//! Where rendered documents live, keyed by receipt id.
//!
//! ```text
//! <documents dir>/
//! ├── 5f2b8c1e-9a4d-4c3b-8e7f-0123456789ab.pdf
//! └── 91c07d22-4e1f-4b9a-a0d3-fedcba987654.pdf
//! ```
//!
//! Methods are synchronous: `create` hands back a sink the renderer writes
//! into from a blocking task.
//!
//! A file sink's `flush` also syncs the file to disk. The renderer flushes
//! when it finishes, so a document is durable before its receipt is
//! recorded.

use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Storage for one document per receipt id.
pub trait ArtifactStore: Send + Sync {
    /// Where the document for `id` is (or would be) kept.
    fn location(&self, id: &str) -> String;

    /// Opens a fresh sink for the document, replacing any previous one.
    fn create(&self, id: &str) -> io::Result<Box<dyn Write + Send>>;

    /// Deletes the document. Missing documents are an `ErrorKind::NotFound`
    /// error.
    fn remove(&self, id: &str) -> io::Result<()>;

    fn exists(&self, id: &str) -> bool;

    fn read(&self, id: &str) -> io::Result<Vec<u8>>;
}

/// Keeps `<dir>/<id>.pdf` files, creating the directory on demand.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileArtifactStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for `id`. Ids that could escape the directory are rejected.
    fn path(&self, id: &str) -> io::Result<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("invalid document id '{}'", id),
            ));
        }
        Ok(self.dir.join(format!("{}.pdf", id)))
    }
}

/// Buffered file sink whose `flush` reaches the disk, not just the OS.
#[derive(Debug)]
struct SyncingFile {
    inner: BufWriter<File>,
}

impl SyncingFile {
    fn new(file: File) -> Self {
        SyncingFile {
            inner: BufWriter::new(file),
        }
    }
}

impl Write for SyncingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()?;
        self.inner.get_ref().sync_all()
    }
}

impl ArtifactStore for FileArtifactStore {
    fn location(&self, id: &str) -> String {
        self.dir.join(format!("{}.pdf", id)).display().to_string()
    }

    fn create(&self, id: &str) -> io::Result<Box<dyn Write + Send>> {
        let path = self.path(id)?;
        fs::create_dir_all(&self.dir)?;
        debug!(path = %path.display(), "Opening document artifact");
        Ok(Box::new(SyncingFile::new(File::create(path)?)))
    }

    fn remove(&self, id: &str) -> io::Result<()> {
        fs::remove_file(self.path(id)?)
    }

    fn exists(&self, id: &str) -> bool {
        self.path(id).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read(&self, id: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path(id)?)
    }
}
