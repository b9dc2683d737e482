use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Raw payload storage behind the recent-search cache
///
/// Implementations hold one JSON document under a fixed name. Only one cache
/// instance should own a given store at a time; concurrent owners degrade to
/// last-writer-wins.
pub trait SearchHistoryStore: Send + Sync {
    /// Read the persisted payload, `None` when nothing has been written yet
    fn read(&self) -> io::Result<Option<String>>;

    /// Overwrite the persisted payload
    fn write(&self, payload: &str) -> io::Result<()>;
}

/// History store backed by a single file on disk
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SearchHistoryStore for FileHistoryStore {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, payload: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)
    }
}

/// History store kept in memory, for tests and ephemeral profiles
#[derive(Default)]
pub struct InMemoryHistory {
    payload: Mutex<Option<String>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchHistoryStore for InMemoryHistory {
    fn read(&self) -> io::Result<Option<String>> {
        let guard = self
            .payload
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "history lock poisoned"))?;
        Ok(guard.clone())
    }

    fn write(&self, payload: &str) -> io::Result<()> {
        let mut guard = self
            .payload
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "history lock poisoned"))?;
        *guard = Some(payload.to_string());
        Ok(())
    }
}
