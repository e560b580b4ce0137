//! Client-side save of produced files.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Blob-save port: offers produced bytes to the user under a resolved name.
pub trait FileSink: Send + Sync {
    /// Saves `bytes` under `nome` and returns where they landed.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the bytes cannot be written.
    fn save(&self, nome: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes files into a target directory.
#[derive(Debug)]
pub struct DiskSink {
    dir: PathBuf,
}

impl DiskSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileSink for DiskSink {
    fn save(&self, nome: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        // Server-supplied names must not escape the target directory.
        let nome = std::path::Path::new(nome)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty filename"))?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(nome);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Test sink capturing saves in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    saves: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(nome, bytes)` pair saved so far, in order.
    #[must_use]
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FileSink for MemorySink {
    fn save(&self, nome: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let mut saves = self.saves.lock().unwrap_or_else(PoisonError::into_inner);
        saves.push((nome.to_owned(), bytes.to_vec()));
        Ok(PathBuf::from(nome))
    }
}
