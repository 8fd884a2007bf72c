//! Decoding of revert payloads into human-readable reasons
//!
//! A failed ledger call may carry a plain sentinel, a hex-encoded wrapped
//! error, or an already-decoded message. Wrapped errors can nest: the string
//! extracted from one payload may itself be a wrapped payload, so decoding
//! peels layers until a plain message remains.

/// The message reported when a payload carries no decodable detail
pub const DEFAULT_REVERT_MESSAGE: &str =
    "The call was reverted without providing further details.";

/// The sentinel reported for a revert with no payload
const REVERTED_SENTINEL: &str = "Reverted";
/// The prefix of a hex-encoded wrapped revert payload
const ENCODED_PREFIX: &str = "Reverted 0x";
/// The length of the `0x` prefix plus the ABI header of an `Error(string)`
/// payload: a 4-byte selector, a 32-byte offset, and a 32-byte length
const ABI_HEADER_CHARS: usize = 138;
/// The maximum number of nested payloads to unwrap
const MAX_UNWRAP_DEPTH: usize = 5;

/// Decode a revert payload into a printable reason string
///
/// Total: malformed payloads fall back to [`DEFAULT_REVERT_MESSAGE`] and
/// plain messages pass through unchanged.
pub fn decode_revert(payload: &str) -> String {
    decode_revert_inner(payload, 0)
}

/// Decode one layer of a revert payload, recursing on extracted strings
fn decode_revert_inner(payload: &str, depth: usize) -> String {
    if depth > MAX_UNWRAP_DEPTH {
        return DEFAULT_REVERT_MESSAGE.to_string();
    }

    if payload == REVERTED_SENTINEL {
        return DEFAULT_REVERT_MESSAGE.to_string();
    }

    if let Some(body) = payload.strip_prefix(ENCODED_PREFIX) {
        let bytes = format!("0x{body}");
        return match extract_reason(&bytes) {
            Some(reason) => decode_revert_inner(&reason, depth + 1),
            None => DEFAULT_REVERT_MESSAGE.to_string(),
        };
    }

    payload.to_string()
}

/// Extract the string carried by a hex-encoded `Error(string)` payload
///
/// Skips the ABI header, strips the zero padding, and decodes the remainder
/// as UTF-8. `None` when the payload is too short, not valid hex, or not
/// valid UTF-8.
fn extract_reason(bytes: &str) -> Option<String> {
    let tail = bytes.get(ABI_HEADER_CHARS..)?;
    let raw = hex::decode(tail).ok()?;

    let unpadded_len = raw.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    String::from_utf8(raw[..unpadded_len].to_vec()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The `Error(string)` selector
    const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

    /// Wrap a message the way a node reports a nested revert: the
    /// `Reverted 0x` prefix followed by a hex-encoded `Error(string)` payload
    fn wrap(message: &str) -> String {
        let mut encoded = Vec::new();
        encoded.extend_from_slice(&ERROR_SELECTOR);

        // Offset and length words of the string argument
        let mut offset = [0u8; 32];
        offset[31] = 0x20;
        encoded.extend_from_slice(&offset);

        let mut length = [0u8; 32];
        length[24..].copy_from_slice(&(message.len() as u64).to_be_bytes());
        encoded.extend_from_slice(&length);

        encoded.extend_from_slice(message.as_bytes());
        let padding = (32 - message.len() % 32) % 32;
        encoded.extend_from_slice(&vec![0u8; padding]);

        format!("Reverted 0x{}", hex::encode(encoded))
    }

    /// Test the bare sentinel
    #[test]
    fn test_bare_sentinel() {
        assert_eq!(decode_revert("Reverted"), DEFAULT_REVERT_MESSAGE);
    }

    /// Test that plain messages pass through unchanged
    #[test]
    fn test_plain_message_passthrough() {
        assert_eq!(decode_revert("hello"), "hello");
        assert_eq!(decode_revert(""), "");
    }

    /// Test that a payload too short to carry a reason falls back to the
    /// default message
    #[test]
    fn test_short_payload() {
        assert_eq!(decode_revert("Reverted 0xdeadbeef"), DEFAULT_REVERT_MESSAGE);
    }

    /// Test that non-hex payloads fall back to the default message
    #[test]
    fn test_malformed_hex() {
        let payload = format!("Reverted 0x{}zz", "00".repeat(70));
        assert_eq!(decode_revert(&payload), DEFAULT_REVERT_MESSAGE);
    }

    /// Test decoding a single wrapped payload
    #[test]
    fn test_single_wrap() {
        let payload = wrap("SharesWrapper: insufficient balance");
        assert_eq!(decode_revert(&payload), "SharesWrapper: insufficient balance");
    }

    /// Test that nested payloads are peeled layer by layer
    #[test]
    fn test_nested_wrap() {
        let payload = wrap(&wrap("inner reason"));
        assert_eq!(decode_revert(&payload), "inner reason");
    }

    /// Test that unwrapping stops at the depth bound
    #[test]
    fn test_unwrap_depth_bound() {
        let mut payload = "inner reason".to_string();
        for _ in 0..=MAX_UNWRAP_DEPTH {
            payload = wrap(&payload);
        }

        assert_eq!(decode_revert(&payload), DEFAULT_REVERT_MESSAGE);
    }

    /// Test idempotence on fully-decoded strings
    #[test]
    fn test_idempotence() {
        for message in ["hello", "", "some revert reason", DEFAULT_REVERT_MESSAGE] {
            let decoded = decode_revert(message);
            assert_eq!(decode_revert(&decoded), decoded);
        }
    }
}
