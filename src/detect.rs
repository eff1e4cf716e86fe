//! PDF input detection: file extension filtering and header sniffing.

use crate::error::{Error, Result};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Version declared by a `%PDF-d.d` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfHeader {
    pub version: String,
}

impl fmt::Display for PdfHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

const MARKER: &[u8] = b"%PDF-";
/// Bytes searched for the marker.
const PROBE_LEN: u64 = 1024;

/// Check whether a path carries a `.pdf` extension (case-insensitive).
///
/// This is the only filter applied to directory entries; content is not
/// inspected.
pub fn has_pdf_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Read the header of a file and verify it is a PDF.
///
/// Only the first kilobyte is read; PDF writers may put junk bytes before
/// the `%PDF-` marker, so the marker is searched for within that window.
pub fn sniff_header<P: AsRef<Path>>(path: P) -> Result<PdfHeader> {
    let mut probe = Vec::with_capacity(PROBE_LEN as usize);
    File::open(path)?.take(PROBE_LEN).read_to_end(&mut probe)?;
    sniff_header_bytes(&probe)
}

/// Verify a PDF header from the leading bytes of a file.
pub fn sniff_header_bytes(data: &[u8]) -> Result<PdfHeader> {
    let at = data
        .windows(MARKER.len())
        .position(|w| w == MARKER)
        .ok_or(Error::UnknownFormat)?
        + MARKER.len();

    match data.get(at..at + 3) {
        Some(v) if is_version(v) => Ok(PdfHeader {
            version: String::from_utf8_lossy(v).into_owned(),
        }),
        Some(v) => Err(Error::UnsupportedVersion(
            String::from_utf8_lossy(v).into_owned(),
        )),
        None => Err(Error::UnknownFormat),
    }
}

/// `d.d`, e.g. `1.7`.
fn is_version(bytes: &[u8]) -> bool {
    matches!(bytes, [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_valid_pdf() {
        let header = sniff_header_bytes(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3").unwrap();
        assert_eq!(header.version, "1.7");
        assert_eq!(header.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_sniff_leading_garbage() {
        let data = b"\x00\x00junk%PDF-2.0\n";
        let header = sniff_header_bytes(data).unwrap();
        assert_eq!(header.version, "2.0");
    }

    #[test]
    fn test_sniff_invalid_format() {
        let result = sniff_header_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));

        let result = sniff_header_bytes(b"%PDF-");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_sniff_bad_version() {
        let result = sniff_header_bytes(b"%PDF-x.y\n");
        assert!(matches!(result, Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_pdf_extension() {
        assert!(has_pdf_extension("report.pdf"));
        assert!(has_pdf_extension("REPORT.PDF"));
        assert!(has_pdf_extension("dir/Mixed.Pdf"));
        assert!(!has_pdf_extension("report.json"));
        assert!(!has_pdf_extension("pdf"));
        assert!(!has_pdf_extension("archive.pdf.zip"));
    }

    #[test]
    fn test_version_shape() {
        assert!(is_version(b"1.4"));
        assert!(is_version(b"2.0"));
        assert!(!is_version(b"10."));
        assert!(!is_version(b"1-4"));
        assert!(!is_version(b"1."));
    }
}
