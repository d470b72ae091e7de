//! Hash Command
//!
//! File fingerprinting with automatic parallelization via Rayon.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rayon::prelude::*;
use sigmatch::{Blake2b, Blake3};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Algorithm {
    /// Chunked Merkle-tree hash with extendable output
    Tree,
    /// Sequential hash with a 1-64 byte digest
    Sequential,
}

enum HasherWrapper {
    Tree(Box<Blake3>),
    Sequential(Box<Blake2b>),
}

impl HasherWrapper {
    fn new(algo: Algorithm, length: usize) -> Result<Self> {
        match algo {
            Algorithm::Tree => Ok(Self::Tree(Box::new(Blake3::new()))),
            Algorithm::Sequential => {
                let h = Blake2b::new(length).map_err(|e| anyhow::anyhow!("{}", e))?;
                Ok(Self::Sequential(Box::new(h)))
            }
        }
    }

    fn update(&mut self, data: &[u8]) -> Result<()> {
        match self {
            Self::Tree(h) => {
                h.update(data);
                Ok(())
            }
            Self::Sequential(h) => h.update(data).map_err(|e| anyhow::anyhow!("{}", e)),
        }
    }

    fn finalize(mut self, length: usize) -> Result<String> {
        match &mut self {
            Self::Tree(h) => Ok(h.finalize(length).to_hex()),
            Self::Sequential(h) => {
                let digest = h.finalize(length).map_err(|e| anyhow::anyhow!("{}", e))?;
                Ok(digest.to_hex())
            }
        }
    }
}

/// Fingerprint files (Rayon parallelizes automatically when beneficial).
pub fn hash_files(files: &[PathBuf], algo: Algorithm, length: usize) -> Result<()> {
    let results = Mutex::new(Vec::with_capacity(files.len()));
    let errors = Mutex::new(Vec::new());

    files.par_iter().for_each(|file_path| {
        let result = (|| -> Result<String> {
            let mut file = std::fs::File::open(file_path)
                .with_context(|| format!("Failed to open: {}", file_path.display()))?;

            let mut hasher = HasherWrapper::new(algo, length)?;
            let mut buffer = [0u8; 128 * 1024]; // 128 KB buffer

            loop {
                let n = std::io::Read::read(&mut file, &mut buffer)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n])?;
            }

            hasher.finalize(length)
        })();

        match result {
            Ok(hex_hash) => {
                results.lock().unwrap().push((file_path.clone(), hex_hash));
            }
            Err(e) => {
                errors.lock().unwrap().push((file_path.clone(), e));
            }
        }
    });

    // Print in original order
    let mut results = results.into_inner().unwrap();
    results.sort_by_key(|(path, _)| files.iter().position(|p| p == path).unwrap_or(usize::MAX));

    for (file_path, hex_hash) in results {
        println!("{}  {}", hex_hash, file_path.display());
    }

    let errors = errors.into_inner().unwrap();
    for (file_path, error) in &errors {
        eprintln!("Error: {}: {}", file_path.display(), error);
    }

    if !errors.is_empty() {
        anyhow::bail!("Failed to hash {} file(s)", errors.len());
    }

    Ok(())
}
