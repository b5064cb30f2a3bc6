use serde::de::DeserializeOwned;
use serde::Serialize;

use bidchain_ledger::Ledger;

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::MAX_MESSAGE_SIZE;

/// JSON snapshot codec for ledgers and protocol bodies.
///
/// Anything larger than [`MAX_MESSAGE_SIZE`] is refused in both directions.
/// Decoding never validates the chain itself; that is the verifier's job.
pub struct LedgerCodec;

impl LedgerCodec {
    /// Encode a ledger as a JSON array of blocks.
    pub fn encode(ledger: &Ledger) -> ProtocolResult<Vec<u8>> {
        Self::encode_message(ledger)
    }

    /// Decode a JSON array of blocks. Empty or malformed input fails.
    pub fn decode(data: &[u8]) -> ProtocolResult<Ledger> {
        Self::decode_message(data)
    }

    pub fn encode_message<T: Serialize + ?Sized>(msg: &T) -> ProtocolResult<Vec<u8>> {
        let bytes =
            serde_json::to_vec(msg).map_err(|e| ProtocolError::Serialization(e.to_string()))?;
        check_size(bytes.len())?;
        Ok(bytes)
    }

    pub fn decode_message<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<T> {
        check_size(data.len())?;
        serde_json::from_slice(data).map_err(|e| ProtocolError::Deserialization(e.to_string()))
    }
}

fn check_size(size: usize) -> ProtocolResult<()> {
    if size > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge {
            size,
            max: MAX_MESSAGE_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidchain_issuer::Issuer;
    use bidchain_ledger::ChainVerifier;
    use bidchain_types::{ImpId, Price};

    fn sample() -> Ledger {
        let mut issuer = Issuer::create(
            Some(ImpId::new("imp-1").unwrap()),
            Some(Price::new(5.0).unwrap()),
        )
        .unwrap();
        issuer
            .issue_price_update(Price::new(7.5).unwrap())
            .unwrap();
        issuer.into_ledger()
    }

    #[test]
    fn decoded_snapshot_still_verifies() {
        let ledger = sample();
        let bytes = LedgerCodec::encode(&ledger).unwrap();
        let decoded = LedgerCodec::decode(&bytes).unwrap();
        assert_eq!(decoded, ledger);
        assert!(ChainVerifier::validate(&decoded));
    }

    #[test]
    fn snapshot_is_block_array_with_wire_names() {
        let bytes = LedgerCodec::encode(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("\"previousHash\""));
        assert!(text.contains("\"price_update\""));
    }

    #[test]
    fn empty_array_fails_closed() {
        assert!(matches!(
            LedgerCodec::decode(b"[]"),
            Err(ProtocolError::Deserialization(_))
        ));
    }

    #[test]
    fn garbage_fails_closed() {
        assert!(LedgerCodec::decode(b"not json").is_err());
        assert!(LedgerCodec::decode(br#"[{"index":0}]"#).is_err());
    }

    #[test]
    fn negative_price_fails_closed() {
        let bytes = LedgerCodec::encode(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap().replacen("\"price\":5", "\"price\":-5", 1);
        assert!(LedgerCodec::decode(text.as_bytes()).is_err());
    }

    #[test]
    fn oversized_input_is_refused() {
        let data = vec![b' '; MAX_MESSAGE_SIZE + 1];
        assert!(matches!(
            LedgerCodec::decode(&data),
            Err(ProtocolError::MessageTooLarge { .. })
        ));
    }
}
