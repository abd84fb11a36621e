/*!
 * Tests for subhash derivation
 */

use napiprojekt::errors::HashError;
use napiprojekt::subhash::{SUBHASH_LEN, derive_subhash};

use crate::common::{SAMPLE_HASH, SAMPLE_SUBHASH};

#[test]
fn test_deriveSubhash_withKnownHashes_shouldMatchGoldenValues() {
    assert_eq!(derive_subhash(SAMPLE_HASH).unwrap(), SAMPLE_SUBHASH);
    assert_eq!(derive_subhash("d41d8cd98f00b204e9800998ecf8427e").unwrap(), "8030b");
    assert_eq!(derive_subhash("1168f0d1ea337b35a0bebab05c4b290b").unwrap(), "e6005");
    assert_eq!(derive_subhash("000000000000000000000000000000ff").unwrap(), "00000");
}

#[test]
fn test_deriveSubhash_withWindowStartingOnLastCharacter_shouldUseOneDigit() {
    // third step reads index 6 ('f'), 16 + 15 = 31 is the last position
    assert_eq!(derive_subhash("ffffffffffffffffffffffffffffffff").unwrap(), "eebcd");
}

#[test]
fn test_deriveSubhash_calledRepeatedly_shouldBeDeterministic() {
    let first = derive_subhash(SAMPLE_HASH).unwrap();
    for _ in 0..100 {
        assert_eq!(derive_subhash(SAMPLE_HASH).unwrap(), first);
    }
}

#[test]
fn test_deriveSubhash_output_shouldBeFiveLowercaseHexChars() {
    let subhash = derive_subhash("D41D8CD98F00B204E9800998ECF8427E").unwrap();
    assert_eq!(subhash.len(), SUBHASH_LEN);
    assert!(subhash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_deriveSubhash_withSixteenCharHash_shouldReportTooShort() {
    // second step needs position 13 + 3 = 16
    assert_eq!(
        derive_subhash("0123456789abcdef"),
        Err(HashError::TooShort { position: 16, length: 16 })
    );
    assert!(matches!(derive_subhash("a1b2c3d4e5f6a1b2"), Err(HashError::TooShort { .. })));
}

#[test]
fn test_deriveSubhash_withEmptyHash_shouldReportFirstIndex() {
    assert_eq!(derive_subhash(""), Err(HashError::TooShort { position: 14, length: 0 }));
}

#[test]
fn test_deriveSubhash_withNonHexSelector_shouldReportInvalidDigit() {
    let mut hash = SAMPLE_HASH.to_string();
    hash.replace_range(14..15, "z");
    assert_eq!(
        derive_subhash(&hash),
        Err(HashError::InvalidDigit { position: 14, character: 'z' })
    );
}

#[test]
fn test_deriveSubhash_withNonHexInsideWindow_shouldReportInvalidDigit() {
    // first window of the sample hash starts at position 14 and covers 14..16
    let mut hash = SAMPLE_HASH.to_string();
    hash.replace_range(15..16, "g");
    assert_eq!(
        derive_subhash(&hash),
        Err(HashError::InvalidDigit { position: 15, character: 'g' })
    );
}
