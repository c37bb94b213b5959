use std::io::{self, Cursor, Read};

use crate::core::errors::{Result, TrustsigError};

/// Compression formats recognized by their leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
}

/// Magic prefixes, checked in order.
const MAGIC: &[(Compression, &[u8])] = &[
    (Compression::Gzip, &[0x1F, 0x8B, 0x08]),
    (Compression::Bzip2, &[0x42, 0x5A, 0x68]),
    (Compression::Xz, &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00]),
];

/// Longest magic prefix; detection never reads more than this.
const PREFIX_LEN: usize = 6;

impl Compression {
    /// Wrap `input` in a decoder for this format.
    pub fn decompress<'a, R: Read + 'a>(self, input: R) -> Box<dyn Read + 'a> {
        match self {
            Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(input)),
            Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(input)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(input)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
            Compression::Xz => "xz",
        }
    }
}

/// Stream returned by [`detect_compression`]: the sniffed prefix
/// followed by the untouched remainder of the input.
pub type ReplayStream<R> = io::Chain<Cursor<Vec<u8>>, R>;

/// Detect the compression format of `input` from its first bytes.
///
/// Returns the detected format (`None` for uncompressed data) and a
/// stream that yields exactly the original, still compressed, bytes.
/// Empty input is uncompressed and empty, not an error.
pub fn detect_compression<R: Read>(mut input: R) -> Result<(Option<Compression>, ReplayStream<R>)> {
    let mut prefix = vec![0u8; PREFIX_LEN];
    let mut filled = 0;
    while filled < PREFIX_LEN {
        match input.read(&mut prefix[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(TrustsigError::Detection {
                    reason: e.to_string(),
                });
            }
        }
    }
    prefix.truncate(filled);

    let detected = MAGIC
        .iter()
        .find(|(_, magic)| prefix.starts_with(magic))
        .map(|(format, _)| *format);
    tracing::debug!(format = ?detected, sniffed = filled, "detected compression");

    Ok((detected, Cursor::new(prefix).chain(input)))
}
