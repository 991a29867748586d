//! Directory scanning and renaming.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{fmt, fs};

use anyhow::{Context, Result};
use colored::Colorize;
use walkdir::WalkDir;

use crate::movie_name::{MovieLookup, MovieRenameConfig, NameResolver, Resolution};
use crate::{print_error, print_warning};

/// Movie directory renamer.
#[derive(Debug)]
pub struct MovieRename<L: MovieLookup> {
    root: PathBuf,
    config: MovieRenameConfig,
    lookup: L,
}

/// Proposed rename for one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDecision {
    pub original: String,
    pub proposed: String,
    pub changed: bool,
}

/// Directory found under the root.
#[derive(Debug)]
struct DirectoryEntry {
    path: PathBuf,
    name: String,
}

impl RenameDecision {
    /// Create a decision from the directory name and its resolution.
    ///
    /// Names that already match the canonical form after separator normalization,
    /// and names with nothing left after cleanup, are never changed.
    #[must_use]
    pub fn new(original: &str, resolution: &Resolution) -> Self {
        let proposed = resolution.name().to_string();
        let changed = !resolution.is_noop() && !proposed.is_empty() && proposed != original;
        Self {
            original: original.to_string(),
            proposed,
            changed,
        }
    }
}

impl<L: MovieLookup> MovieRename<L> {
    /// Create a new instance for the given root directory.
    #[must_use]
    pub const fn new(root: PathBuf, config: MovieRenameConfig, lookup: L) -> Self {
        Self { root, config, lookup }
    }

    /// Run renaming for all subdirectories of the root.
    ///
    /// Returns the number of directories renamed, or that would be renamed in dryrun mode.
    ///
    /// # Errors
    /// Returns an error if the root directory cannot be listed,
    /// or if the metadata lookup returns a malformed response.
    pub async fn run(&self) -> Result<usize> {
        if self.config.verbose {
            println!("{self}");
        }

        if self.config.dryrun {
            println!("{}", "=== Running in dryrun mode ===".cyan().bold());
            println!("Provide --dryrun=false to actually rename directories");
            if !self.config.skip_confirmation {
                Self::wait_for_confirmation()?;
            }
        }

        let directories = self.gather_directories()?;
        if directories.is_empty() {
            if self.config.verbose {
                println!("No directories to rename");
            }
            return Ok(0);
        }

        let resolver = NameResolver::new(&self.config, &self.lookup);
        let mut stdout = io::stdout();
        let mut num_renamed: usize = 0;
        for directory in directories {
            let decision = self.decide(&resolver, &directory.name, &mut stdout).await?;
            if decision.changed && self.rename_directory(&directory.path, &decision) {
                num_renamed += 1;
            }
        }

        let message = format!(
            "{num_renamed} {}",
            if num_renamed == 1 { "directory" } else { "directories" }
        );
        if self.config.dryrun {
            println!("Dryrun: would have renamed {message}");
        } else {
            println!("{}", format!("Renamed {message}").green());
        }

        Ok(num_renamed)
    }

    /// Resolve the new name for a directory and write the outcome to `out`.
    ///
    /// The report is the same in dryrun and rename mode apart from the heading.
    ///
    /// # Errors
    /// Returns an error if the metadata lookup returns a malformed response,
    /// or if writing the report fails.
    pub async fn decide(
        &self,
        resolver: &NameResolver<'_, L>,
        name: &str,
        out: &mut impl Write,
    ) -> Result<RenameDecision> {
        let resolution = resolver.resolve(name).await?;
        let decision = RenameDecision::new(name, &resolution);

        match resolution {
            Resolution::Matched { .. } if decision.changed => {
                writeln!(out, "{}", self.heading())?;
                crate::write_diff(out, &decision.original, &decision.proposed)?;
            }
            Resolution::Matched { .. } => {
                if self.config.noop {
                    writeln!(out, "{} {}", "No-op:".dimmed(), decision.original)?;
                }
            }
            Resolution::Fallback { .. } => {
                if decision.proposed.is_empty() {
                    print_warning!("Nothing left of the name after cleanup: {}", decision.original);
                } else {
                    writeln!(out, "{}", "Potential:".yellow().bold())?;
                    crate::write_diff(out, &decision.original, &decision.proposed)?;
                }
            }
        }

        Ok(decision)
    }

    /// Get all subdirectories of the root sorted by name.
    fn gather_directories(&self) -> Result<Vec<DirectoryEntry>> {
        if !self.root.is_dir() {
            anyhow::bail!("Not a directory: {}", self.root.display());
        }

        let mut directories = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to list directory {}", self.root.display()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = crate::get_normalized_dir_name(entry.path())?;
            if crate::is_ignored_name(&name) {
                if self.config.verbose {
                    println!("{} {name}", "Ignoring:".dimmed());
                }
                continue;
            }
            directories.push(DirectoryEntry {
                path: entry.into_path(),
                name,
            });
        }

        Ok(directories)
    }

    /// Rename the directory if not running in dryrun mode.
    ///
    /// Returns true if the directory was renamed, or would be renamed in dryrun mode.
    fn rename_directory(&self, path: &Path, decision: &RenameDecision) -> bool {
        if self.config.dryrun {
            return true;
        }

        let new_path = path.with_file_name(&decision.proposed);
        let capitalization_change_only = decision.original.to_lowercase() == decision.proposed.to_lowercase();

        // On a case-insensitive file system the new path resolves to the directory itself,
        // so only an entry with the exact new name counts as an existing target.
        let target_exists = if capitalization_change_only {
            Self::has_entry_named(&new_path)
        } else {
            new_path.exists()
        };
        if target_exists {
            print_warning!("Skipping rename to already existing directory: {}", decision.proposed);
            return false;
        }

        if self.config.verbose {
            println!("Renaming {} to {}", decision.original, decision.proposed);
        }

        let result = if capitalization_change_only {
            Self::rename_with_temp_dir(path, &new_path)
        } else {
            fs::rename(path, &new_path)
        };

        match result {
            Ok(()) => true,
            Err(error) => {
                print_error!("Could not rename {}: {error}", decision.original);
                false
            }
        }
    }

    /// Check if the parent directory lists an entry with exactly this name.
    ///
    /// Returns true if the parent cannot be read.
    fn has_entry_named(path: &Path) -> bool {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return true;
        };
        fs::read_dir(parent).map_or(true, |entries| {
            entries.filter_map(Result::ok).any(|entry| entry.file_name() == name)
        })
    }

    /// Rename through an intermediate name to work around case-insensitive file systems.
    ///
    /// The original name is restored if the final rename fails.
    fn rename_with_temp_dir(path: &Path, new_path: &Path) -> io::Result<()> {
        let mut temp_name = new_path.as_os_str().to_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        if temp_path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Temporary directory already exists: {}", temp_path.display()),
            ));
        }

        fs::rename(path, &temp_path)?;
        fs::rename(&temp_path, new_path).or_else(|error| {
            fs::rename(&temp_path, path)?;
            Err(error)
        })
    }

    /// Wait for the user to press enter.
    fn wait_for_confirmation() -> Result<()> {
        print!("Press enter to continue...");
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        io::stdin().read_line(&mut input).context("Failed to read input")?;
        Ok(())
    }

    fn heading(&self) -> colored::ColoredString {
        if self.config.dryrun {
            "Dryrun:".cyan().bold()
        } else {
            "Rename:".magenta().bold()
        }
    }
}

impl<L: MovieLookup> fmt::Display for MovieRename<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root: {}", self.root.display())?;
        write!(f, "{}", self.config)
    }
}
