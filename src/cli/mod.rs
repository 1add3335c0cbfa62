pub mod redact;
pub mod restore;
pub mod scan;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use globset::GlobSet;

use crate::config::RedactConfig;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "netscrub")]
#[command(about = "Redact MAC and IP addresses from logs, reversibly", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr (overridden by NETSCRUB_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the addresses found in files
    Scan(ScanArgs),

    /// Replace addresses with placeholders and update the map
    Redact(RedactArgs),

    /// Put original addresses back using a saved map
    Restore {
        /// Redacted file
        path: PathBuf,

        /// Map written by `netscrub redact --map`
        #[arg(long)]
        map: PathBuf,
    },
}

/// Options shared by commands that read a corpus.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Files or directories (walked recursively)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Only read files matching this glob inside directories (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Worker threads (default from config: 16)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Config file (default: ./.netscrub.yml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RedactArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Redaction map to extend (created if missing)
    #[arg(long, conflicts_with = "legacy_map")]
    pub map: Option<PathBuf>,

    /// Plain original->replacement JSON map; exact-string matching only
    #[arg(long)]
    pub legacy_map: Option<PathBuf>,

    /// Directory for redacted copies (required for more than one input)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// With --legacy-map, use locally administered MAC surrogates
    #[arg(long, requires = "legacy_map")]
    pub local_macs: bool,
}

impl CorpusArgs {
    /// Project config with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<RedactConfig> {
        let mut config = match &self.config {
            Some(path) => RedactConfig::load_from(path)?,
            None => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                RedactConfig::load_project(&cwd)?
            }
        };
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if !self.include.is_empty() {
            config.include = self.include.clone();
        }
        Ok(config)
    }
}

/// A file selected for processing, with its path relative to the argument
/// it was found under.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Expand file and directory arguments into the files to process.
pub fn collect_inputs(paths: &[PathBuf], include: Option<&GlobSet>) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk_dir(path, path, include, &mut files)?;
        } else if path.is_file() {
            let relative = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.clone());
            files.push(InputFile {
                path: path.clone(),
                relative,
            });
        } else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("path not found: {}", path.display()),
            )
            .into());
        }
    }
    Ok(files)
}

fn walk_dir(
    root: &Path,
    dir: &Path,
    include: Option<&GlobSet>,
    out: &mut Vec<InputFile>,
) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for path in entries {
        // Skip hidden files and directories
        if path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'))
        {
            continue;
        }
        if path.is_dir() {
            walk_dir(root, &path, include, out)?;
        } else if path.is_file() {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            if include.is_some_and(|set| !set.is_match(&relative)) {
                continue;
            }
            out.push(InputFile { path, relative });
        }
    }
    Ok(())
}

/// Read every input as UTF-8 text, skipping unreadable or binary files.
///
/// Exits with status 1 when files were selected but none could be read.
pub fn read_inputs(files: Vec<InputFile>) -> Vec<(InputFile, String)> {
    let docs = read_readable(files);
    if docs.is_empty() {
        eprintln!("netscrub: no readable input files.");
        std::process::exit(1);
    }
    docs
}

fn read_readable(files: Vec<InputFile>) -> Vec<(InputFile, String)> {
    files
        .into_iter()
        .filter_map(|file| match std::fs::read_to_string(&file.path) {
            Ok(text) => Some((file, text)),
            Err(e) => {
                tracing::warn!("skipping {}: {e}", file.path.display());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_walks_and_filters() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        std::fs::create_dir_all(tmp.path().join(".hidden")).unwrap();
        std::fs::write(tmp.path().join("a.log"), "x").unwrap();
        std::fs::write(tmp.path().join("sub/b.log"), "x").unwrap();
        std::fs::write(tmp.path().join("sub/c.bin"), "x").unwrap();
        std::fs::write(tmp.path().join(".hidden/d.log"), "x").unwrap();

        let config = RedactConfig {
            include: vec!["*.log".into()],
            ..RedactConfig::default()
        };
        let set = config.include_set().unwrap();
        let files = collect_inputs(&[tmp.path().to_path_buf()], set.as_ref()).unwrap();
        let relative: Vec<PathBuf> = files.into_iter().map(|f| f.relative).collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("a.log"), PathBuf::from("sub/b.log")]
        );
    }

    #[test]
    fn test_unreadable_files_are_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.log"), "10.0.0.1").unwrap();
        std::fs::write(tmp.path().join("b.bin"), [0xff, 0xfe, 0xfd]).unwrap();
        let files = collect_inputs(&[tmp.path().to_path_buf()], None).unwrap();
        assert_eq!(files.len(), 2);
        let docs = read_readable(files);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].1, "10.0.0.1");
    }

    #[test]
    fn test_collect_missing_path() {
        assert!(collect_inputs(&[PathBuf::from("/definitely/not/here")], None).is_err());
    }
}
