//! Compression codecs for archive copies
//!
//! Archive copies of landed files are written compressed to both storage
//! tiers. The codec is selected per deployment; the archive path carries the
//! codec's suffix so replay tooling can pick the right decoder.

use landfall_common::{LandfallError, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Pluggable compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Gzip,
    Zstd,
}

impl Codec {
    /// Filename suffix appended to archive copies
    pub fn suffix(&self) -> &'static str {
        match self {
            Codec::Gzip => ".gz",
            Codec::Zstd => ".zst",
        }
    }

    /// Compress a buffer
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Codec::Gzip => {
                let mut encoder =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder
                    .write_all(data)
                    .map_err(|e| LandfallError::Compression(format!("gzip encode: {}", e)))?;
                encoder
                    .finish()
                    .map_err(|e| LandfallError::Compression(format!("gzip finish: {}", e)))
            },
            Codec::Zstd => zstd::stream::encode_all(data, 0)
                .map_err(|e| LandfallError::Compression(format!("zstd encode: {}", e))),
        }
    }

    /// Decompress a buffer
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Codec::Gzip => {
                let mut decoder = flate2::read::GzDecoder::new(data);
                let mut decompressed = Vec::new();
                decoder
                    .read_to_end(&mut decompressed)
                    .map_err(|e| LandfallError::Compression(format!("gzip decode: {}", e)))?;
                Ok(decompressed)
            },
            Codec::Zstd => zstd::stream::decode_all(data)
                .map_err(|e| LandfallError::Compression(format!("zstd decode: {}", e))),
        }
    }
}

impl std::str::FromStr for Codec {
    type Err = LandfallError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gzip" | "gz" => Ok(Codec::Gzip),
            "zstd" | "zst" => Ok(Codec::Zstd),
            _ => Err(LandfallError::Config(format!("unknown codec: {}", s))),
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Codec::Gzip => write!(f, "gzip"),
            Codec::Zstd => write!(f, "zstd"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_round_trip() {
        let original = b"batch payload, repeated payload, repeated payload";
        let compressed = Codec::Gzip.compress(original).unwrap();
        assert_ne!(compressed, original.to_vec());
        assert_eq!(Codec::Gzip.decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_zstd_round_trip() {
        let original = b"batch payload, repeated payload, repeated payload";
        let compressed = Codec::Zstd.compress(original).unwrap();
        assert_eq!(Codec::Zstd.decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_decompress_invalid_is_compression_error() {
        let err = Codec::Gzip.decompress(b"not gzip data").unwrap_err();
        assert!(matches!(err, LandfallError::Compression(_)));
    }

    #[test]
    fn test_codec_from_str_and_suffix() {
        assert_eq!("gzip".parse::<Codec>().unwrap(), Codec::Gzip);
        assert_eq!("zst".parse::<Codec>().unwrap(), Codec::Zstd);
        assert!("lzma".parse::<Codec>().is_err());
        assert_eq!(Codec::Gzip.suffix(), ".gz");
        assert_eq!(Codec::Zstd.suffix(), ".zst");
    }
}
