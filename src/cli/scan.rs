use crate::address::AddressKind;
use crate::error::Result;
use crate::redact::Executor;

use super::{collect_inputs, read_inputs, ScanArgs};

/// List every distinct address in the inputs, one `KIND<TAB>address` per line.
pub fn run(args: &ScanArgs) -> Result<()> {
    let config = args.corpus.resolve_config()?;
    let include = config.include_set()?;
    let files = collect_inputs(&args.corpus.paths, include.as_ref())?;
    if files.is_empty() {
        eprintln!("netscrub: no input files.");
        return Ok(());
    }

    eprintln!("netscrub: scanning {} file(s)...", files.len());
    let docs = read_inputs(files);
    let texts: Vec<&str> = docs.iter().map(|(_, text)| text.as_str()).collect();

    let executor = Executor::from_config(&config)?;
    let found = executor.discover(&texts);

    for kind in AddressKind::ALL {
        for address in found.get(kind) {
            println!("{kind}\t{address}");
        }
    }

    if found.is_empty() {
        eprintln!("netscrub: no addresses found.");
    } else {
        eprintln!(
            "netscrub: {} MAC, {} IPv4, {} IPv6 address(es).",
            found.macs.len(),
            found.ipv4.len(),
            found.ipv6.len()
        );
    }
    Ok(())
}
