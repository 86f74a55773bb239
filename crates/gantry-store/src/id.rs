use std::fmt;

use bson::oid::ObjectId;
use bson::Bson;

use crate::error::{StoreError, StoreResult};

/// Validated wrapper over the store's native 12-byte document identifier.
///
/// Exactly two textual forms are accepted: the 24-character hexadecimal
/// encoding, or a string whose UTF-8 encoding is exactly 12 bytes, taken as
/// the raw identifier bytes. Everything else fails with
/// [`StoreError::InvalidIdentifier`]. Parsing happens before any store
/// round-trip, so malformed identifiers never reach the driver.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    /// Parse a textual identifier into the store-native form.
    pub fn parse(input: &str) -> StoreResult<Self> {
        if input.len() == 24 && input.bytes().all(|b| b.is_ascii_hexdigit()) {
            let oid = ObjectId::parse_str(input)
                .map_err(|_| StoreError::InvalidIdentifier(input.to_string()))?;
            return Ok(Self(oid));
        }
        let raw = input.as_bytes();
        if raw.len() == 12 {
            let mut bytes = [0u8; 12];
            bytes.copy_from_slice(raw);
            return Ok(Self(ObjectId::from_bytes(bytes)));
        }
        Err(StoreError::InvalidIdentifier(input.to_string()))
    }

    /// The driver-native identifier value.
    pub fn as_oid(&self) -> ObjectId {
        self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", self.to_hex())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        Bson::ObjectId(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hex_form_roundtrips() {
        let id = DocumentId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn uppercase_hex_accepted() {
        let id = DocumentId::parse("507F1F77BCF86CD799439011").unwrap();
        assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn raw_twelve_bytes_accepted() {
        let id = DocumentId::parse("abcdefghijkl").unwrap();
        assert_eq!(id.as_oid().bytes(), *b"abcdefghijkl");
    }

    #[test]
    fn wrong_lengths_rejected() {
        for input in ["", "abc", "507f1f77bcf86cd79943901", "507f1f77bcf86cd7994390111"] {
            assert!(matches!(
                DocumentId::parse(input),
                Err(StoreError::InvalidIdentifier(_))
            ));
        }
    }

    #[test]
    fn non_hex_24_chars_rejected() {
        // 24 characters but not hex, and not 12 bytes either.
        assert!(DocumentId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
    }

    #[test]
    fn display_is_hex() {
        let id = DocumentId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(format!("{id}"), "507f1f77bcf86cd799439011");
    }

    proptest! {
        #[test]
        fn any_24_hex_string_parses(s in "[0-9a-fA-F]{24}") {
            let id = DocumentId::parse(&s).unwrap();
            prop_assert_eq!(id.to_hex(), s.to_lowercase());
        }

        #[test]
        fn any_12_byte_ascii_parses(s in "[ -~]{12}") {
            prop_assert!(DocumentId::parse(&s).is_ok());
        }

        #[test]
        fn other_ascii_lengths_rejected(s in "[g-z]{1,32}") {
            // Letters outside the hex alphabet, so only the 12-byte rule
            // could apply.
            prop_assume!(s.len() != 12);
            prop_assert!(DocumentId::parse(&s).is_err());
        }
    }
}
