use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::redact::{Executor, LegacyMap, RedactionMap};

use super::{collect_inputs, read_inputs, InputFile, RedactArgs};

/// Redact every input, extending and saving the chosen map.
///
/// A single input with no `--out-dir` is written to stdout.
pub fn run(args: &RedactArgs) -> Result<()> {
    let config = args.corpus.resolve_config()?;
    let include = config.include_set()?;
    let files = collect_inputs(&args.corpus.paths, include.as_ref())?;

    if files.is_empty() {
        eprintln!("netscrub: no input files.");
        return Ok(());
    }
    if files.len() > 1 && args.out_dir.is_none() {
        eprintln!(
            "netscrub: {} input files; use --out-dir to choose where redacted copies go.",
            files.len()
        );
        std::process::exit(1);
    }

    let docs = read_inputs(files);
    let texts: Vec<&str> = docs.iter().map(|(_, text)| text.as_str()).collect();
    let executor = Executor::from_config(&config)?;

    let redacted = if let Some(path) = &args.legacy_map {
        let local_macs = args.local_macs || config.local_macs;
        redact_legacy(&executor, &texts, path, local_macs)?
    } else {
        let existing = match &args.map {
            Some(path) if path.exists() => Some(RedactionMap::load(path)?),
            _ => None,
        };
        let (redacted, map) = executor.redact_corpus(&texts, existing);
        if let Some(path) = &args.map {
            map.save(path)?;
            eprintln!(
                "netscrub: {} map entries saved to {}",
                map.len(),
                path.display()
            );
        }
        redacted
    };

    write_outputs(&docs, &redacted, args.out_dir.as_deref())
}

fn redact_legacy(
    executor: &Executor,
    texts: &[&str],
    path: &Path,
    local_macs: bool,
) -> Result<Vec<String>> {
    let legacy = if path.exists() {
        LegacyMap::load(path)?
    } else {
        LegacyMap::new()
    };
    let mut legacy = legacy.with_local_macs(local_macs);
    let found = executor.discover(texts);
    let added: usize = executor
        .kinds()
        .iter()
        .map(|kind| legacy.extend(&found.sorted(*kind), *kind))
        .sum();
    tracing::info!(added, entries = legacy.len(), "legacy map ready");

    let redacted = executor.apply_many(&legacy, texts);
    legacy.save(path)?;
    eprintln!(
        "netscrub: {} legacy entries saved to {}",
        legacy.len(),
        path.display()
    );
    Ok(redacted)
}

fn write_outputs(
    docs: &[(InputFile, String)],
    redacted: &[String],
    out_dir: Option<&Path>,
) -> Result<()> {
    match out_dir {
        Some(dir) => {
            for ((input, _), text) in docs.iter().zip(redacted) {
                let dest = dir.join(&input.relative);
                if let Some(parent) = dest.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&dest, text)?;
                tracing::debug!(from = %input.path.display(), to = %dest.display(), "wrote redacted copy");
            }
            eprintln!(
                "netscrub: redacted {} file(s) into {}",
                redacted.len(),
                dir.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            for text in redacted {
                stdout.write_all(text.as_bytes())?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
