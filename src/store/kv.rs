use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// String key-value storage with browser-storage semantics: reads never
/// fail, writes are fire-and-forget. A failed write is logged and dropped;
/// the stores built on top are caches, not sources of truth.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-lifetime storage, the sessionStorage analogue. Entries vanish
/// when the process exits, which is exactly what a pending payment wants.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Persistent storage backed by a single JSON file, the localStorage
/// analogue. The file is read once at open; a missing or corrupt file
/// starts empty. Every mutation rewrites the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<HashMap<String, String>>(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "store file corrupt, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let serialized = match serde_json::to_string(entries) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize store file");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to write store file");
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
            self.flush(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
            self.flush(&entries);
        }
    }
}
