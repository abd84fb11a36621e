/*!
 * Best-effort character set detection for subtitle payloads.
 *
 * Payloads arrive as bytes in whatever encoding the uploader used, most often
 * Windows-1250 or ISO-8859-2 for Polish text, sometimes UTF-8.
 */

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

/// Pick the most likely encoding of `bytes`
///
/// A byte order mark wins, then strict UTF-8, then the statistical guess.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode `bytes` into text using the detected encoding
///
/// Undecodable sequences become U+FFFD rather than failing the whole payload.
pub fn best_guess_text(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, used, had_errors) = encoding.decode(bytes);

    if had_errors {
        debug!("Payload decoded as {} with replacement characters", used.name());
    } else {
        debug!("Payload decoded as {}", used.name());
    }

    text.into_owned()
}
