//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
///
/// A default archiver has no file behind it and silently drops records, which lets modules be
/// used without a session (in tests for example).
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member which is set up in the
/// struct's `init` or `new` functions. Records must be flat (no nested structs or sequences) as
/// the csv writer derives the header from the field names.
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::in_dir(&session.arch_root, path)
    }

    /// Create a new archiver at `path` relative to `dir`, creating any missing parent
    /// directories.
    pub fn in_dir<D: AsRef<Path>, P: AsRef<Path>>(
        dir: D, path: P
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let full_path = dir.as_ref().join(path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create (or truncate) the file then reopen in append mode
        File::create(&full_path)?;
        let file = OpenOptions::new()
            .append(true)
            .open(full_path)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Returns true if this archiver is backed by a file.
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(ref mut w) = self.writer {
            w.serialize(record)?;
            w.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        time_s: f64,
        left: f64,
        right: f64,
    }

    #[test]
    fn test_default_archiver_drops_records() {
        let mut a = Archiver::default();
        assert!(!a.is_open());
        a.serialise(Sample { time_s: 0.0, left: 0.0, right: 0.0 }).unwrap();
    }

    #[test]
    fn test_archiver_writes_header_and_rows() {
        let dir = std::env::temp_dir()
            .join(format!("util_archive_test_{}", std::process::id()));

        let mut a = Archiver::in_dir(&dir, "drive/out.csv").unwrap();
        a.serialise(Sample { time_s: 0.0, left: 0.5, right: -0.5 }).unwrap();
        a.serialise(Sample { time_s: 0.02, left: 1.0, right: 1.0 }).unwrap();

        let contents = std::fs::read_to_string(dir.join("drive/out.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "time_s,left,right");
        assert_eq!(lines[1], "0.0,0.5,-0.5");
        assert_eq!(lines.len(), 3);

        std::fs::remove_dir_all(&dir).ok();
    }
}
