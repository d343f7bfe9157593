//! File type guessing
//!
//! Names are checked first (notice files, then archives, then known binary
//! extensions); only then is the content tasted.

use crate::error::ScanError;
use crate::report::DocumentType;
use crate::scanner::Document;

/// Bytes read from the start of a document to decide whether it is binary
pub const TASTE_LENGTH: usize = 200;

const NOTE_FILE_NAMES: &[&str] = &[
    "NOTICE",
    "LICENSE",
    "LICENSE.TXT",
    "NOTICE.TXT",
    "INSTALL",
    "INSTALL.TXT",
    "README",
    "README.TXT",
    "NEWS",
    "NEWS.TXT",
    "AUTHOR",
    "AUTHOR.TXT",
    "AUTHORS",
    "AUTHORS.TXT",
    "CHANGELOG",
    "CHANGELOG.TXT",
    "DISCLAIMER",
    "DISCLAIMER.TXT",
    "KEYS",
    "KEYS.TXT",
    "RELEASE-NOTES",
    "RELEASE-NOTES.TXT",
    "RELEASE_NOTES",
    "RELEASE_NOTES.TXT",
    "UPGRADE",
    "UPGRADE.TXT",
    "STATUS",
    "STATUS.TXT",
    "THIRD_PARTY_NOTICES",
    "THIRD_PARTY_NOTICES.TXT",
    "COPYRIGHT",
    "COPYRIGHT.TXT",
    "BUILDING",
    "BUILDING.TXT",
    "BUILD",
    "BUILT.TXT",
    "DEPENDENCIES",
];

const NOTE_FILE_EXTENSIONS: &[&str] = &["LICENSE", "LICENSE.TXT", "NOTICE", "NOTICE.TXT"];

const ARCHIVE_EXTENSIONS: &[&str] = &["JAR", "GZ", "ZIP", "TAR", "BZ", "BZ2", "RAR", "WAR"];

const DATA_EXTENSIONS: &[&str] = &[
    "DAT", "DOC", "NCB", "IDB", "SUO", "XCF", "RAJ", "CERT", "KS", "TS", "ODP",
];
const EXE_EXTENSIONS: &[&str] = &["EXE", "DLL", "LIB", "SO", "A", "EXP"];
const KEYSTORE_EXTENSIONS: &[&str] = &["JKS", "KEYSTORE", "PEM", "CRL"];
const IMAGE_EXTENSIONS: &[&str] = &[
    "PNG", "PDF", "GIF", "GIFF", "TIF", "TIFF", "JPG", "JPEG", "ICO", "ICNS",
];
const BYTECODE_EXTENSIONS: &[&str] = &["CLASS", "PYD", "OBJ", "PYC"];

const JAR_MANIFEST: &str = "MANIFEST.MF";

/// Last path segment, upper-cased
fn normalise(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_uppercase()
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    extensions
        .iter()
        .any(|ext| name.len() > ext.len() + 1 && name.ends_with(&format!(".{}", ext)))
}

/// Whether the name is a notice, readme or similar note file
pub fn is_note(name: &str) -> bool {
    let name = normalise(name);
    NOTE_FILE_NAMES.contains(&name.as_str()) || has_extension(&name, NOTE_FILE_EXTENSIONS)
}

/// Whether the name carries an archive extension
pub fn is_archive(name: &str) -> bool {
    has_extension(&normalise(name), ARCHIVE_EXTENSIONS)
}

/// Whether the name alone marks the document as binary
pub fn is_binary_name(name: &str) -> bool {
    let name = normalise(name);
    name == JAR_MANIFEST
        || [DATA_EXTENSIONS, KEYSTORE_EXTENSIONS, IMAGE_EXTENSIONS, BYTECODE_EXTENSIONS]
            .iter()
            .any(|extensions| has_extension(&name, extensions))
        || is_executable(&name)
}

fn is_executable(name: &str) -> bool {
    name == "JAVA"
        || has_extension(name, EXE_EXTENSIONS)
        // Versioned shared objects such as libfoo.so.1
        || EXE_EXTENSIONS
            .iter()
            .any(|ext| name.contains(&format!(".{}.", ext)))
}

/// Whether the first bytes of a document look binary.
///
/// Malformed UTF-8 is binary. Otherwise characters above U+0100 or at or below
/// U+0008 are counted, and more than 30 percent of them makes the content binary.
pub fn is_binary_taste(taste: &[u8]) -> bool {
    let text = match std::str::from_utf8(taste) {
        Ok(text) => text,
        // A multi-byte character cut off by the taste length is not malformed
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&taste[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return true,
    };

    let mut length = 0usize;
    let mut high = 0usize;
    for c in text.chars() {
        length += 1;
        let code = c as u32;
        if code > 256 || code <= 8 {
            high += 1;
        }
    }
    high * 100 > length * 30
}

/// Classify a document before any header check
pub fn guess(document: &dyn Document) -> Result<DocumentType, ScanError> {
    let name = document.name();
    if is_note(name) {
        return Ok(DocumentType::Notice);
    }
    if document.is_composite() || is_archive(name) {
        return Ok(DocumentType::Archive);
    }
    if is_binary_name(name) || is_binary_taste(&document.taste(TASTE_LENGTH)?) {
        return Ok(DocumentType::Binary);
    }
    Ok(DocumentType::Standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::TextDocument;

    #[test]
    fn test_note_names() {
        assert!(is_note("NOTICE"));
        assert!(is_note("docs/readme.txt"));
        assert!(is_note("third_party/foo.LICENSE"));
        assert!(is_note("AUTHORS.txt"));
        assert!(!is_note("src/notice.rs"));
    }

    #[test]
    fn test_archive_names() {
        assert!(is_archive("lib/commons.jar"));
        assert!(is_archive("dist/release.TAR.GZ"));
        assert!(!is_archive("src/gzip.rs"));
        assert!(!is_archive(".gz"));
    }

    #[test]
    fn test_binary_names() {
        assert!(is_binary_name("images/logo.png"));
        assert!(is_binary_name("META-INF/MANIFEST.MF"));
        assert!(is_binary_name("target/libfoo.so.1"));
        assert!(is_binary_name("Foo.class"));
        assert!(is_binary_name("certs/server.pem"));
        assert!(!is_binary_name("src/main.rs"));
        assert!(!is_binary_name("scripts/a.sh"));
    }

    #[test]
    fn test_taste() {
        assert!(!is_binary_taste(b"fn main() {\n    println!(\"hi\");\n}\n"));
        assert!(is_binary_taste(&[0u8; 64]));
        assert!(is_binary_taste(&[0xff, 0xfe, 0x00, 0x41]));
        assert!(!is_binary_taste(b""));
    }

    #[test]
    fn test_taste_tolerates_cut_character() {
        let mut taste = "é".repeat(99).into_bytes();
        taste.push(0xc3);
        assert!(!is_binary_taste(&taste));
    }

    #[test]
    fn test_taste_counts_wide_characters() {
        assert!(is_binary_taste("日本語のテキスト".as_bytes()));
        assert!(!is_binary_taste("Ünïcödé text with a few accents".as_bytes()));
    }

    #[test]
    fn test_guess_order() {
        let notice = TextDocument::new("NOTICE", "Copyright");
        assert_eq!(guess(&notice).unwrap(), DocumentType::Notice);

        let archive = TextDocument::new("a.zip", "PK\x03\x04");
        assert_eq!(guess(&archive).unwrap(), DocumentType::Archive);

        let binary = TextDocument::new("blob", vec![0u8; 32]);
        assert_eq!(guess(&binary).unwrap(), DocumentType::Binary);

        let text = TextDocument::new("lib.rs", "// SPDX-License-Identifier: MIT\n");
        assert_eq!(guess(&text).unwrap(), DocumentType::Standard);
    }
}
