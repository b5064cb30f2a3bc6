use bidchain_crypto::{Ed25519, SignatureScheme};

use crate::error::{InvalidChain, ViolationKind};
use crate::ledger::Ledger;
use crate::records::Block;

/// Chain integrity verifier.
///
/// Checks, in order: the genesis block, then for every later block the index
/// sequence, the previous-hash link, the recomputed hash, and the signature of
/// the embedded transaction against its own public key. The first failure
/// wins. Verification is pure and never mutates the chain.
///
/// Note the signature only proves that *some* key signed the price; it does
/// not pin which key. Callers that care about the signer's identity must
/// compare `publicKey` against a key they already trust.
pub struct ChainVerifier;

impl ChainVerifier {
    /// `true` when every check passes.
    pub fn validate(ledger: &Ledger) -> bool {
        Self::validate_blocks(ledger.blocks())
    }

    pub fn validate_blocks(blocks: &[Block]) -> bool {
        Self::verify(blocks).is_ok()
    }

    /// Verify with Ed25519 signatures, reporting the first violation.
    pub fn verify(blocks: &[Block]) -> Result<(), InvalidChain> {
        Self::verify_with::<Ed25519>(blocks)
    }

    /// Verify using an explicit signature scheme.
    pub fn verify_with<S: SignatureScheme>(blocks: &[Block]) -> Result<(), InvalidChain> {
        let Some(genesis) = blocks.first() else {
            return Err(violation(0, ViolationKind::EmptyChain));
        };
        if !genesis_is_well_formed(genesis) {
            return Err(violation(0, ViolationKind::MalformedGenesis));
        }

        for (position, pair) in blocks.windows(2).enumerate() {
            let (previous, block) = (&pair[0], &pair[1]);
            let position = position + 1;

            let expected = previous.index + 1;
            if block.index != expected {
                return Err(violation(
                    position,
                    ViolationKind::IndexGap {
                        expected,
                        found: block.index,
                    },
                ));
            }
            if block.previous_hash != previous.hash {
                return Err(violation(position, ViolationKind::BrokenLink));
            }
            match Ledger::hash(&block.payload, &block.previous_hash) {
                Ok(computed) if computed == block.hash => {}
                _ => return Err(violation(position, ViolationKind::HashMismatch)),
            }

            let Some(tx) = block.payload.transaction() else {
                return Err(violation(position, ViolationKind::UnexpectedGenesis));
            };
            S::verify(
                tx.public_key(),
                tx.signed_message().as_bytes(),
                tx.signature(),
            )
            .map_err(|_| violation(position, ViolationKind::BadSignature))?;
        }

        Ok(())
    }
}

fn violation(position: usize, kind: ViolationKind) -> InvalidChain {
    InvalidChain { position, kind }
}

fn genesis_is_well_formed(block: &Block) -> bool {
    block.index == 0
        && block.is_genesis()
        && block.previous_hash.is_genesis_parent()
        && Ledger::hash(&block.payload, &block.previous_hash)
            .map(|h| h == block.hash)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Creation, Payload, PriceUpdate};
    use bidchain_crypto::{PublicKey, Signature, SignatureError, Signer, SigningKey};
    use bidchain_types::{BlockHash, ImpId, Price};

    fn imp() -> ImpId {
        ImpId::new("imp-1").unwrap()
    }

    fn price(v: f64) -> Price {
        Price::new(v).unwrap()
    }

    fn push(ledger: &mut Ledger, payload: Payload) {
        let block = ledger.next_block(payload).unwrap();
        ledger.append(block).unwrap();
    }

    fn sample_ledger(sk: &SigningKey) -> Ledger {
        let mut ledger = Ledger::new().unwrap();
        push(
            &mut ledger,
            Payload::Creation(Creation::sign(imp(), price(10.0), sk)),
        );
        push(
            &mut ledger,
            Payload::PriceUpdate(PriceUpdate::sign(imp(), price(10.0), price(12.0), sk)),
        );
        ledger
    }

    fn rehash_from(blocks: &mut [Block], start: usize) {
        for i in start..blocks.len() {
            if i > 0 {
                blocks[i].previous_hash = blocks[i - 1].hash.clone();
            }
            blocks[i].hash = Ledger::hash(&blocks[i].payload, &blocks[i].previous_hash).unwrap();
        }
    }

    #[test]
    fn fresh_ledger_is_valid() {
        assert!(ChainVerifier::validate(&Ledger::new().unwrap()));
    }

    #[test]
    fn issued_chain_is_valid() {
        let sk = SigningKey::generate();
        let ledger = sample_ledger(&sk);
        assert_eq!(ChainVerifier::verify(ledger.blocks()), Ok(()));
    }

    #[test]
    fn verification_is_idempotent() {
        let sk = SigningKey::generate();
        let ledger = sample_ledger(&sk);
        let before = ledger.clone();
        assert!(ChainVerifier::validate(&ledger));
        assert!(ChainVerifier::validate(&ledger));
        assert_eq!(ledger, before);
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert_eq!(
            ChainVerifier::verify(&[]).unwrap_err().kind,
            ViolationKind::EmptyChain
        );
    }

    #[test]
    fn tampered_price_breaks_hash() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        if let Payload::PriceUpdate(tx) = &mut blocks[2].payload {
            tx.new_price = price(99.0);
        }
        let err = ChainVerifier::verify(&blocks).unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.kind, ViolationKind::HashMismatch);
    }

    #[test]
    fn rehashed_tamper_fails_signature() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        if let Payload::Creation(tx) = &mut blocks[1].payload {
            tx.price = price(1.0);
        }
        rehash_from(&mut blocks, 1);
        let err = ChainVerifier::verify(&blocks).unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.kind, ViolationKind::BadSignature);
    }

    #[test]
    fn swapped_public_key_fails_signature() {
        let sk = SigningKey::generate();
        let other = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        if let Payload::PriceUpdate(tx) = &mut blocks[2].payload {
            tx.public_key = other.public_key();
        }
        rehash_from(&mut blocks, 2);
        assert_eq!(
            ChainVerifier::verify(&blocks).unwrap_err().kind,
            ViolationKind::BadSignature
        );
    }

    #[test]
    fn tampered_timestamp_is_caught_by_hash() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        if let Payload::Creation(tx) = &mut blocks[1].payload {
            tx.timestamp = bidchain_types::Timestamp::from_millis(1);
        }
        assert_eq!(
            ChainVerifier::verify(&blocks).unwrap_err().kind,
            ViolationKind::HashMismatch
        );
    }

    #[test]
    fn broken_link_is_reported() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        blocks[2].previous_hash = BlockHash::from_digest([7; 32]);
        let err = ChainVerifier::verify(&blocks).unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.kind, ViolationKind::BrokenLink);
    }

    #[test]
    fn index_gap_is_reported() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        blocks[2].index = 5;
        assert_eq!(
            ChainVerifier::verify(&blocks).unwrap_err().kind,
            ViolationKind::IndexGap {
                expected: 2,
                found: 5
            }
        );
    }

    #[test]
    fn dropped_middle_block_is_reported() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        blocks.remove(1);
        assert!(!ChainVerifier::validate_blocks(&blocks));
    }

    #[test]
    fn forged_genesis_is_rejected() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        blocks[0].previous_hash = BlockHash::from_digest([1; 32]);
        rehash_from(&mut blocks, 0);
        assert_eq!(
            ChainVerifier::verify(&blocks).unwrap_err().kind,
            ViolationKind::MalformedGenesis
        );
    }

    #[test]
    fn genesis_payload_past_index_zero_is_rejected() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        blocks[1].payload = Payload::genesis();
        rehash_from(&mut blocks, 1);
        let err = ChainVerifier::verify(&blocks).unwrap_err();
        assert_eq!(err.position, 1);
        assert_eq!(err.kind, ViolationKind::UnexpectedGenesis);
    }

    struct AcceptAll;

    impl SignatureScheme for AcceptAll {
        fn verify(_: &PublicKey, _: &[u8], _: &Signature) -> Result<(), SignatureError> {
            Ok(())
        }
    }

    #[test]
    fn custom_scheme_is_used() {
        let sk = SigningKey::generate();
        let mut blocks = sample_ledger(&sk).into_blocks();
        if let Payload::Creation(tx) = &mut blocks[1].payload {
            tx.signature = Signature::from_bytes(vec![0u8; 64]);
        }
        rehash_from(&mut blocks, 1);
        assert!(ChainVerifier::verify(&blocks).is_err());
        assert!(ChainVerifier::verify_with::<AcceptAll>(&blocks).is_ok());
    }
}
