use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

// @module: Video description and content hashing

/// Name of the hash scheme this provider looks videos up by
pub const NAPIPROJEKT_HASH: &str = "napiprojekt";

/// Number of leading bytes covered by the napiprojekt hash (10 MiB)
pub const NAPIPROJEKT_READ_SIZE: u64 = 10 * 1024 * 1024;

/// A video as seen by subtitle providers: a name plus the hashes computed for it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Video {
    /// Display name, usually the file name
    pub name: String,

    /// Location on disk, if the video came from a file
    pub path: Option<PathBuf>,

    /// File size in bytes, if known
    pub size: Option<u64>,

    /// Hash values keyed by hash scheme name
    pub hashes: HashMap<String, String>,
}

impl Video {
    /// Create a video with no hashes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Attach a hash value for the given scheme
    pub fn with_hash(mut self, scheme: impl Into<String>, value: impl Into<String>) -> Self {
        self.hashes.insert(scheme.into(), value.into());
        self
    }

    /// Hash a video file and describe it
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open video file: {:?}", path))?;
        let size = file
            .metadata()
            .with_context(|| format!("Failed to read metadata of: {:?}", path))?
            .len();

        let hash = compute_napiprojekt_hash(BufReader::new(file))
            .with_context(|| format!("Failed to hash video file: {:?}", path))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            name,
            path: Some(path.to_path_buf()),
            size: Some(size),
            hashes: HashMap::new(),
        }
        .with_hash(NAPIPROJEKT_HASH, hash))
    }

    /// The napiprojekt hash, if one was computed or supplied
    pub fn napiprojekt_hash(&self) -> Option<&str> {
        self.hashes.get(NAPIPROJEKT_HASH).map(String::as_str)
    }
}

/// Lowercase hex MD5 of the first 10 MiB read from `reader`
pub fn compute_napiprojekt_hash<R: Read>(reader: R) -> std::io::Result<String> {
    let mut limited = reader.take(NAPIPROJEKT_READ_SIZE);
    let mut hasher = Md5::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let read = limited.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
