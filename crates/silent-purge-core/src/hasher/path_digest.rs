use sha2::{Digest, Sha256};
use std::path::Path;

/// Cache identifier for a discovered file: SHA-256 of its raw path bytes, lowercase hex.
///
/// Only the path is hashed, never the content. A renamed file gets a new identifier and an
/// edited-in-place file keeps its old one. UTF-8 paths hash the same as `identify_str`.
pub fn identify(path: &Path) -> String {
    digest_hex(path.as_os_str().as_encoded_bytes())
}

pub fn identify_str(path: &str) -> String {
    digest_hex(path.as_bytes())
}

fn digest_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_identify_is_stable() {
        let a = identify_str("videos/a.mp4");
        let b = identify_str("videos/a.mp4");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_identify_known_digest() {
        assert_eq!(
            identify_str("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_identify_distinguishes_paths() {
        assert_ne!(identify_str("videos/a.mp4"), identify_str("videos/b.mp4"));
        assert_ne!(identify_str("videos/a.mp4"), identify_str("videos/A.mp4"));
    }

    #[cfg(unix)]
    #[test]
    fn test_identify_keeps_non_utf8_bytes_apart() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let a = Path::new(OsStr::from_bytes(b"media/clip\xff.mp4"));
        let b = Path::new(OsStr::from_bytes(b"media/clip\xfe.mp4"));
        assert_eq!(a.to_string_lossy(), b.to_string_lossy());
        assert_ne!(identify(a), identify(b));
    }

    #[test]
    fn test_identify_path_matches_string_form() {
        let path = PathBuf::from("root").join("sub").join("clip.avi");
        assert_eq!(identify(&path), identify_str(&path.to_string_lossy()));
    }
}
