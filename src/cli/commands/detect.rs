use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use trustsig::{Result, detect_compression};

use crate::cli::output;

/// Execute the `trustsig detect` command.
///
/// Prints the compression format of `file`. With `--decompress`, also
/// writes the decompressed content (or a plain copy of uncompressed
/// input) to that path.
pub fn execute(file: &Path, decompress: Option<&Path>) -> Result<()> {
    let input = File::open(file)?;
    let (detected, stream) = detect_compression(input)?;

    let name = detected.map_or("uncompressed", |format| format.name());
    println!("{}: {name}", file.display());

    if let Some(dest) = decompress {
        let mut reader: Box<dyn Read> = match detected {
            Some(format) => format.decompress(stream),
            None => Box::new(stream),
        };
        let mut out = File::create(dest)?;
        let written = io::copy(&mut reader, &mut out)?;
        output::success(&format!("Wrote {written} bytes to {}", dest.display()));
    }
    Ok(())
}
