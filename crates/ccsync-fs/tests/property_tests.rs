use ccsync_fs::{NormalizedPath, content_digest};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_normalized_path_has_no_backslashes(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        prop_assert!(!path.as_str().contains('\\'));

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(path, roundtripped);
    }

    #[test]
    fn test_suffix_roundtrip(s in "[a-z/._-]{1,40}") {
        let path = NormalizedPath::new(&s);
        let suffixed = path.with_suffix(".age");
        prop_assert_eq!(suffixed.strip_suffix(".age"), Some(path));
    }

    #[test]
    fn test_digest_is_fixed_length_hex(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let digest = content_digest(&bytes);
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
