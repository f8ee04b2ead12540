//! This module provides the `ProgramLoader` struct, responsible for loading
//! programs from various sources, including files and strings.

use crate::parser::parse;
use crate::program::Program;
use crate::types::ProgramError;
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` is a utility struct for loading tape-machine programs.
/// It provides methods to load programs from individual files, from string
/// content, and to discover and load all `.tur` files within a directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the `.tur` file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed.
    /// * `Err(ProgramError::File)` if the file cannot be read.
    /// * `Err(ProgramError::Parse)` if the file content is not a valid program.
    pub fn load_program(path: &Path) -> Result<Program, ProgramError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ProgramError::File(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single program from the provided string content.
    ///
    /// This is useful for parsing programs that are not stored in files,
    /// e.g., from user input.
    pub fn load_program_from_string(content: &str) -> Result<Program, ProgramError> {
        parse(content)
    }

    /// Loads all program files (`.tur` extension) from a given directory.
    ///
    /// It iterates through the directory, attempts to load each `.tur` file,
    /// and collects the results. Directories and non-`.tur` files are
    /// skipped.
    ///
    /// # Arguments
    ///
    /// * `directory` - A reference to the `Path` of the directory to scan.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Program), ProgramError>>` - A vector where
    ///   each element indicates whether a program was successfully loaded
    ///   (containing its path and the `Program` itself) or if an error
    ///   occurred during loading.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), ProgramError>> {
        if !directory.exists() {
            return vec![Err(ProgramError::File(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(ProgramError::File(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(ProgramError::File(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.tur files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "tur") {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(ProgramError::File(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}
