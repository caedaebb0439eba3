//! Reassembly of archives that were published as numbered chunks.
//!
//! Provides `splice` for concatenating chunk files into a single target
//! in catalog order, deleting the chunks once the target is complete.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

mod error;

pub use error::{Error, Result};

/// Copy block size for chunk reassembly.
const COPY_BLOCK: usize = 1024 * 1024;

/// What a `splice` call did, for caller-side reporting.
#[derive(Debug)]
pub struct SpliceReport {
    pub target: PathBuf,
    /// The target already existed, so nothing was read or written.
    pub already_merged: bool,
    pub chunks_merged: usize,
    pub bytes_written: u64,
    /// Chunks that were merged but could not be deleted afterwards.
    pub leftover: Vec<(PathBuf, std::io::Error)>,
}

/// Concatenate `chunks` into `target` in the given order, then delete them.
///
/// If `target` already exists the call is a no-op and the chunks are left
/// untouched. If any chunk is missing the merge aborts at that point,
/// leaving a partially written (possibly empty) target behind and deleting
/// nothing. Chunks are deleted only after the target has been fully
/// written; a failed deletion is recorded in the report rather than
/// treated as an error, so the merge is never rolled back.
pub fn splice(target: &Path, chunks: &[PathBuf]) -> Result<SpliceReport> {
    if target.exists() {
        return Ok(SpliceReport {
            target: target.to_path_buf(),
            already_merged: true,
            chunks_merged: 0,
            bytes_written: 0,
            leftover: Vec::new(),
        });
    }

    let mut out = File::create(target)?;
    let mut buf = vec![0u8; COPY_BLOCK];
    let mut bytes_written = 0u64;

    for chunk in chunks {
        if !chunk.exists() {
            return Err(Error::MissingChunk(chunk.clone()));
        }

        let mut input = File::open(chunk)?;
        loop {
            let n = input.read(&mut buf)?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            bytes_written += n as u64;
        }
    }

    drop(out);

    let mut leftover = Vec::new();
    for chunk in chunks {
        if let Err(e) = fs::remove_file(chunk) {
            leftover.push((chunk.clone(), e));
        }
    }

    Ok(SpliceReport {
        target: target.to_path_buf(),
        already_merged: false,
        chunks_merged: chunks.len(),
        bytes_written,
        leftover,
    })
}
