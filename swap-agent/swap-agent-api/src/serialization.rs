//! Serialization helpers for the swap agent API

/// A module for serializing and deserializing U256 as decimal strings
pub mod u256_string_serialization {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize a U256 to a string
    pub fn serialize<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    /// Deserialize a string to a U256
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let s = String::deserialize(d)?;
        U256::from_str_radix(&s, 10).map_err(|_| D::Error::custom("Invalid U256 value"))
    }
}

/// A module for serializing and deserializing an optional U256 as a decimal
/// string
pub mod u256_option_string_serialization {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize an optional U256 to a string
    pub fn serialize<S: Serializer>(value: &Option<U256>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => s.serialize_str(&value.to_string()),
            None => s.serialize_none(),
        }
    }

    /// Deserialize a string to an optional U256
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<U256>, D::Error> {
        let maybe_str = Option::<String>::deserialize(d)?;
        maybe_str
            .map(|s| {
                U256::from_str_radix(&s, 10).map_err(|_| D::Error::custom("Invalid U256 value"))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use rand::{thread_rng, Rng};
    use serde::{Deserialize, Serialize};

    /// A test wrapper exercising the U256 helper
    #[derive(Serialize, Deserialize)]
    struct U256Wrapper {
        /// The wrapped value
        #[serde(with = "super::u256_string_serialization")]
        value: U256,
    }

    /// A test wrapper exercising the optional U256 helper
    #[derive(Serialize, Deserialize)]
    struct OptionalU256Wrapper {
        /// The wrapped value
        #[serde(default, with = "super::u256_option_string_serialization")]
        value: Option<U256>,
    }

    /// Test serialization and deserialization of a U256
    #[test]
    fn test_u256_serialization() {
        let mut rng = thread_rng();
        let bytes: [u8; 32] = rng.gen();
        let value = U256::from_be_bytes(bytes);

        let serialized = serde_json::to_string(&U256Wrapper { value }).unwrap();
        let deserialized: U256Wrapper = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value, deserialized.value);
    }

    /// Test that the U256 helper round-trips through a decimal string
    #[test]
    fn test_u256_decimal_representation() {
        let value = U256::from(100_000u64);
        let serialized = serde_json::to_string(&U256Wrapper { value }).unwrap();
        assert_eq!(serialized, r#"{"value":"100000"}"#);
    }

    /// Test serialization and deserialization of an optional U256
    #[test]
    fn test_optional_u256_serialization() {
        let value = Some(U256::from(42u64));
        let serialized = serde_json::to_string(&OptionalU256Wrapper { value }).unwrap();
        let deserialized: OptionalU256Wrapper = serde_json::from_str(&serialized).unwrap();
        assert_eq!(value, deserialized.value);

        let deserialized: OptionalU256Wrapper = serde_json::from_str(r#"{}"#).unwrap();
        assert!(deserialized.value.is_none());
    }
}
