use std::marker::PhantomData;

use textcall_rpc::{Codec, DecodeError};

/// Carries a record type as self-describing UTF-8 JSON text: field names
/// travel with the values, so the decode side reconstructs the record with
/// no separate schema. Stateless; one instance serves every call of a
/// method.
#[derive(Debug)]
pub struct JsonCodec<T> {
    _phantom: PhantomData<T>,
}

impl<T> JsonCodec<T> {
    /// A codec for `T`. `const` so descriptors can live in statics.
    pub const fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Codec for JsonCodec<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + std::fmt::Debug + Send + Sync,
{
    type Value = T;

    fn encode(&self, value: &T) -> Vec<u8> {
        log::debug!("encoding {value:?}");
        serde_json::to_vec(value).expect("records must be JSON-encodable")
    }

    fn decode(&self, buffer: &[u8]) -> Result<T, DecodeError> {
        let value: T = serde_json::from_slice(buffer).map_err(|e| {
            if e.is_eof() {
                DecodeError::Truncated
            } else {
                DecodeError::Malformed(e.to_string())
            }
        })?;
        log::debug!("decoded {value:?}");
        Ok(value)
    }
}

pub mod base64_bytes {
    //! Serde adapter for raw-byte fields.
    //!
    //! JSON strings cannot carry arbitrary bytes, so byte fields are written
    //! as standard padded base64 text and decoded back to the original bytes.
    //! Annotate the field with `#[serde(with = "textcall_json::base64_bytes")]`.

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use textcall_rpc::{Codec, DecodeError};

    use super::JsonCodec;

    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct Greeting {
        name: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct Upload {
        name: String,
        #[serde(with = "super::base64_bytes")]
        attachment: Vec<u8>,
    }

    const GREETING_CODEC: JsonCodec<Greeting> = JsonCodec::new();
    const UPLOAD_CODEC: JsonCodec<Upload> = JsonCodec::new();

    #[test]
    fn records_round_trip() {
        let record = Greeting {
            name: "World".to_owned(),
        };
        let decoded = GREETING_CODEC
            .decode(&GREETING_CODEC.encode(&record))
            .expect("encoded record must decode");
        assert_eq!(record, decoded);
    }

    #[test]
    fn wire_text_is_human_readable() {
        let encoded = GREETING_CODEC.encode(&Greeting {
            name: "World".to_owned(),
        });
        let text = std::str::from_utf8(&encoded).expect("wire payload must be UTF-8 text");
        assert_eq!(r#"{"name":"World"}"#, text);
    }

    #[test]
    fn binary_fields_round_trip() {
        // not valid UTF-8, and exercises padding
        for attachment in [vec![], vec![0xFF], vec![0u8, 159, 146, 150, 255, 1, 2]] {
            let record = Upload {
                name: "payload.bin".to_owned(),
                attachment,
            };
            let decoded = UPLOAD_CODEC
                .decode(&UPLOAD_CODEC.encode(&record))
                .expect("encoded record must decode");
            assert_eq!(record, decoded);
        }
    }

    #[test]
    fn binary_fields_are_carried_as_base64_text() {
        let encoded = UPLOAD_CODEC.encode(&Upload {
            name: "payload.bin".to_owned(),
            attachment: vec![0xFF],
        });
        let text = std::str::from_utf8(&encoded).expect("wire payload must be UTF-8 text");
        assert!(text.contains(r#""attachment":"/w==""#), "got {text}");
    }

    #[test]
    fn truncated_payloads_are_rejected() {
        let mut encoded = GREETING_CODEC.encode(&Greeting {
            name: "World".to_owned(),
        });
        encoded.truncate(encoded.len() - 3);
        assert!(matches!(
            GREETING_CODEC.decode(&encoded),
            Err(DecodeError::Truncated)
        ));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        assert!(matches!(
            GREETING_CODEC.decode(b"definitely not json"),
            Err(DecodeError::Malformed(_))
        ));
        // right shape, wrong field type
        assert!(matches!(
            GREETING_CODEC.decode(br#"{"name":7}"#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(matches!(
            UPLOAD_CODEC.decode(br#"{"name":"payload.bin","attachment":"not base64!!"}"#),
            Err(DecodeError::Malformed(_))
        ));
    }
}
