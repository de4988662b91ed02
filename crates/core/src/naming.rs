//! Object naming for uploaded files.
//!
//! Uploaded files are never stored under the client's filename. Each one gets
//! `<epoch-millis>-<token>.<ext>` where `token` is a short random base-36
//! string. The token makes same-millisecond names distinct with high
//! probability; it is not a cryptographic uniqueness guarantee and must not be
//! treated as an access-control secret.

use rand::Rng;

/// Length of the random base-36 token.
pub const TOKEN_LENGTH: usize = 10;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a storage-safe object name for a file originally called
/// `original_name`, using the current time and the thread-local RNG.
///
/// ```
/// use feedback_core::naming::safe_object_name;
///
/// let name = safe_object_name("封面.JPG");
/// assert!(name.ends_with(".JPG"));
/// assert!(name.is_ascii());
/// ```
pub fn safe_object_name(original_name: &str) -> String {
    let now_millis = chrono::Utc::now().timestamp_millis();
    safe_object_name_with(original_name, now_millis, &mut rand::rng())
}

/// Deterministic core of [`safe_object_name`].
pub fn safe_object_name_with<R: Rng + ?Sized>(
    original_name: &str,
    now_millis: i64,
    rng: &mut R,
) -> String {
    let token = random_token(rng);
    match file_extension(original_name) {
        Some(ext) => format!("{now_millis}-{token}.{ext}"),
        None => format!("{now_millis}-{token}"),
    }
}

/// Random `[0-9a-z]` token of [`TOKEN_LENGTH`] characters.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LENGTH)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}

/// Extension of `name`: the text after the last `.`, reduced to ASCII
/// alphanumerics.
///
/// Returns `None` when there is no `.` or nothing usable remains.
pub fn file_extension(name: &str) -> Option<String> {
    let (_, raw) = name.rsplit_once('.')?;
    let ext: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    if ext.is_empty() {
        None
    } else {
        Some(ext)
    }
}

/// Recover a UTF-8 filename that arrived decoded as Latin-1.
///
/// Clients that send raw UTF-8 in the multipart `filename` parameter are often
/// decoded byte-per-char, turning `封面.jpg` into mojibake. When every char is
/// in the Latin-1 range and the resulting bytes form valid UTF-8, the
/// re-decoded string is returned; otherwise the input is returned unchanged.
/// Only used for log output.
pub fn recover_latin1_filename(name: &str) -> String {
    let bytes: Option<Vec<u8>> = name
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    match bytes {
        Some(bytes) => String::from_utf8(bytes).unwrap_or_else(|_| name.to_string()),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn name_has_timestamp_token_and_extension() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = safe_object_name_with("cover.jpg", 1_700_000_000_000, &mut rng);

        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpg");
        let (ts, token) = stem.split_once('-').unwrap();
        assert_eq!(ts, "1700000000000");
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn missing_extension_produces_no_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        let name = safe_object_name_with("README", 42, &mut rng);
        assert!(!name.contains('.'));
        assert!(name.starts_with("42-"));
    }

    #[test]
    fn extension_uses_last_dot() {
        assert_eq!(file_extension("a.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("photo.JPEG").as_deref(), Some("JPEG"));
        assert_eq!(file_extension("trailing."), None);
        assert_eq!(file_extension("noext"), None);
    }

    #[test]
    fn extension_drops_unsafe_characters() {
        assert_eq!(file_extension("x.p/n g").as_deref(), Some("png"));
        assert_eq!(file_extension("x.图片"), None);
    }

    #[test]
    fn non_ascii_original_still_yields_ascii_name() {
        let name = safe_object_name("版权页.png");
        assert!(name.is_ascii());
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn ten_thousand_names_are_distinct() {
        let mut rng = rand::rng();
        let names: HashSet<String> = (0..10_000)
            .map(|_| safe_object_name_with("a.jpg", 1_700_000_000_000, &mut rng))
            .collect();
        assert_eq!(names.len(), 10_000);
    }

    #[test]
    fn recovers_mis_encoded_utf8() {
        let original = "封面.jpg";
        let mangled: String = original.bytes().map(char::from).collect();
        assert_ne!(mangled, original);
        assert_eq!(recover_latin1_filename(&mangled), original);
    }

    #[test]
    fn leaves_proper_names_alone() {
        assert_eq!(recover_latin1_filename("cover.jpg"), "cover.jpg");
        // Already-correct UTF-8 contains chars above U+00FF.
        assert_eq!(recover_latin1_filename("封面.jpg"), "封面.jpg");
        // Genuine Latin-1 that is not valid UTF-8 once re-encoded.
        assert_eq!(recover_latin1_filename("café.png"), "café.png");
    }
}
