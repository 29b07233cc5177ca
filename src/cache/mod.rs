use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const SUMMARY_DIR: &str = "summaries";

/// How a cache entry is stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEncoding {
    Plain,
    Gzip,
}

impl EntryEncoding {
    fn extension(self) -> &'static str {
        match self {
            EntryEncoding::Plain => "txt",
            EntryEncoding::Gzip => "gz",
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            EntryEncoding::Plain => Ok(text.as_bytes().to_vec()),
            EntryEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder
                    .write_all(text.as_bytes())
                    .context("Failed to compress cache entry")?;
                encoder.finish().context("Failed to compress cache entry")
            }
        }
    }

    pub fn decode(self, data: &[u8]) -> Result<String> {
        match self {
            EntryEncoding::Plain => {
                String::from_utf8(data.to_vec()).context("Invalid UTF-8 in cached summary")
            }
            EntryEncoding::Gzip => {
                let mut text = String::new();
                GzDecoder::new(data)
                    .read_to_string(&mut text)
                    .context("Failed to decompress cache entry")?;
                Ok(text)
            }
        }
    }
}

/// On-disk cache of comment summaries, keyed by model and prompt
pub struct SummaryCache {
    cache_dir: PathBuf,
    ttl_hours: u32,
    encoding: EntryEncoding,
}

impl SummaryCache {
    pub fn new(cache_dir: PathBuf, ttl_hours: u32, compression_enabled: bool) -> Self {
        let encoding = if compression_enabled {
            EntryEncoding::Gzip
        } else {
            EntryEncoding::Plain
        };

        SummaryCache {
            cache_dir,
            ttl_hours,
            encoding,
        }
    }

    /// Create the cache directory structure
    pub fn initialize(&self) -> Result<()> {
        let path = self.cache_dir.join(SUMMARY_DIR);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create cache directory: {:?}", path))?;

        info!("Cache initialized at {:?}", self.cache_dir);
        Ok(())
    }

    /// Cache key for a prompt sent to a given model
    pub fn key_for(model: &str, prompt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(model.as_bytes());
        hasher.update(b"\0"); // Separator to prevent collisions
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(SUMMARY_DIR)
            .join(format!("{}.{}", key, self.encoding.extension()))
    }

    fn max_age(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_hours) * 3600)
    }

    fn is_expired(&self, path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .map(|modified| modified.elapsed().unwrap_or_default() > self.max_age())
            .unwrap_or(true)
    }

    /// Cached summary for `key`, if present and younger than the TTL
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        if self.is_expired(&path) {
            debug!("Cache expired: {:?}", path);
            if let Err(e) = fs::remove_file(&path) {
                debug!("Failed to remove expired cache {:?}: {}", path, e);
            }
            return Ok(None);
        }

        let data = fs::read(&path).with_context(|| format!("Failed to read cache: {:?}", path))?;
        self.encoding.decode(&data).map(Some)
    }

    pub fn put(&self, key: &str, summary: &str) -> Result<()> {
        let path = self.entry_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory: {:?}", parent))?;
        }

        let data = self.encoding.encode(summary)?;
        debug!("Encoded {} summary bytes as {} bytes", summary.len(), data.len());

        fs::write(&path, data).with_context(|| format!("Failed to write cache: {:?}", path))?;
        debug!("Cached summary to {:?}", path);
        Ok(())
    }

    /// Remove every cached summary
    pub fn clear_all(&self) -> Result<()> {
        info!("Clearing all cache at {:?}", self.cache_dir);

        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)
                .with_context(|| format!("Failed to clear cache: {:?}", self.cache_dir))?;
        }

        self.initialize()
    }

    /// Remove entries older than the TTL, returning how many were dropped
    pub fn clear_expired(&self) -> Result<usize> {
        let dir = self.cache_dir.join(SUMMARY_DIR);
        if !dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() && self.is_expired(&path) {
                debug!("Removing expired cache: {:?}", path);
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => debug!("Failed to remove expired cache {:?}: {}", path, e),
                }
            }
        }

        if removed > 0 {
            info!("Removed {} expired cache entries", removed);
        }

        Ok(removed)
    }
}
