//! Scan Command
//!
//! Match a file's fingerprint against a signature database.

use anyhow::{Context, Result};
use sigmatch::matching::{exact_match, similarity_search};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;

// =============================================================================
// DATABASE LOADING
// =============================================================================

/// Load a signature database: one lowercase hex digest per line, blank
/// lines and `#` comments ignored. Malformed lines become absent slots so
/// line numbers in the output stay meaningful.
fn load_database(path: &PathBuf) -> Result<Vec<Option<String>>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;

    let reader = BufReader::new(file);
    let mut signatures = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            signatures.push(None);
            continue;
        }

        let valid = line.len() % 2 == 0
            && line
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        if valid {
            signatures.push(Some(line.to_string()));
        } else {
            eprintln!("Warning: Invalid signature skipped: {}", line);
            signatures.push(None);
        }
    }

    Ok(signatures)
}

// =============================================================================
// SCAN
// =============================================================================

/// Fingerprint `file` and report exact (and optionally near) matches from
/// the database at `database`.
pub fn scan_file(file: &PathBuf, database: &PathBuf, threshold: Option<f64>) -> Result<()> {
    let mut input = File::open(file)
        .with_context(|| format!("Failed to open: {}", file.display()))?;

    let mut hasher = sigmatch::Blake3::new();
    let mut buffer = [0u8; 128 * 1024];
    loop {
        let n = input.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    let digest = hasher.finalize(32);
    let digest_hex = digest.to_hex();

    println!("{}  {}", digest_hex, file.display());

    let signatures = load_database(database)?;
    if signatures.is_empty() {
        anyhow::bail!("Signature database is empty: {}", database.display());
    }

    let hits = exact_match(&digest_hex, &signatures)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    if hits.is_empty() {
        println!("No exact match");
    } else {
        for index in &hits {
            println!("MATCH: signature at line {}", index + 1);
        }
    }

    if let Some(threshold) = threshold {
        let binary: Vec<Option<Vec<u8>>> = signatures
            .iter()
            .map(|slot| slot.as_ref().and_then(|hex| hex::decode(hex).ok()))
            .collect();

        let ranked = similarity_search(digest.as_bytes(), &binary, threshold)
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        if ranked.is_empty() {
            println!("No signatures at or above similarity {:.3}", threshold);
        } else {
            for result in &ranked {
                println!(
                    "NEAR: signature at line {} (similarity {:.3})",
                    result.index + 1,
                    result.similarity
                );
            }
        }
    }

    Ok(())
}
