use serde::{Deserialize, Serialize};

use bidchain_crypto::LinkHasher;
use bidchain_types::{BlockHash, Price, Timestamp};

use crate::error::{LedgerError, LedgerResult, LinkRejection, RejectedLink};
use crate::records::{Block, Payload};

/// Append-only, hash-linked sequence of blocks for one impression.
///
/// A ledger always holds at least the genesis block, so [`Ledger::tip`]
/// never fails. Blocks are only ever added at the tip; nothing is pruned or
/// rewritten. On the wire a ledger is a plain JSON array of blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Ledger {
    blocks: Vec<Block>,
}

impl Ledger {
    /// Start a fresh ledger holding only a genesis block.
    pub fn new() -> LedgerResult<Self> {
        Ok(Self {
            blocks: vec![Self::create_genesis()?],
        })
    }

    /// Build the sentinel block: index 0, `{"type":"genesis"}`, previous
    /// hash `"0"`.
    pub fn create_genesis() -> LedgerResult<Block> {
        let previous_hash = BlockHash::genesis_parent();
        let payload = Payload::genesis();
        let hash = Self::hash(&payload, &previous_hash)?;
        Ok(Block {
            index: 0,
            timestamp: Timestamp::now(),
            payload,
            previous_hash,
            hash,
        })
    }

    /// Adopt an externally supplied block sequence.
    ///
    /// The blocks are not re-validated; run the chain verifier before
    /// trusting anything read from the result. An empty sequence cannot be
    /// a ledger and is rejected as malformed.
    pub fn from_blocks(blocks: Vec<Block>) -> LedgerResult<Self> {
        if blocks.is_empty() {
            return Err(LedgerError::MalformedInput(
                "block sequence is empty; a ledger starts with genesis".into(),
            ));
        }
        Ok(Self { blocks })
    }

    /// `H(payload, previous_hash)`.
    pub fn hash(payload: &Payload, previous_hash: &BlockHash) -> LedgerResult<BlockHash> {
        Ok(LinkHasher::link(payload, previous_hash)?)
    }

    /// The last block.
    pub fn tip(&self) -> &Block {
        // from_blocks and new never leave the sequence empty
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Build a candidate that links `payload` onto the current tip.
    pub fn next_block(&self, payload: Payload) -> LedgerResult<Block> {
        let tip = self.tip();
        let previous_hash = tip.hash.clone();
        let hash = Self::hash(&payload, &previous_hash)?;
        Ok(Block {
            index: tip.index + 1,
            timestamp: Timestamp::now(),
            payload,
            previous_hash,
            hash,
        })
    }

    /// Append `candidate` if it links onto the tip.
    ///
    /// The candidate must name the tip's hash as its previous hash, carry the
    /// next index, hash correctly, and not be a genesis marker. On rejection
    /// the ledger is left untouched.
    pub fn append(&mut self, candidate: Block) -> Result<(), RejectedLink> {
        let reject = |reason| RejectedLink {
            index: candidate.index,
            reason,
        };
        let tip = self.tip();

        if candidate.payload.is_genesis() {
            return Err(reject(LinkRejection::UnexpectedGenesis));
        }
        let expected = tip.index + 1;
        if candidate.index != expected {
            return Err(reject(LinkRejection::IndexOutOfSequence { expected }));
        }
        if candidate.previous_hash != tip.hash {
            return Err(reject(LinkRejection::PreviousHashMismatch));
        }
        match Self::hash(&candidate.payload, &candidate.previous_hash) {
            Ok(computed) if computed == candidate.hash => {}
            _ => return Err(reject(LinkRejection::HashMismatch)),
        }

        self.blocks.push(candidate);
        Ok(())
    }

    /// Price-resolution rule: the tip's `newPrice` when the tip is a price
    /// update, otherwise the `price` of the creation at index 1.
    pub fn current_price(&self) -> Option<Price> {
        self.tip()
            .payload
            .new_price()
            .or_else(|| self.blocks.get(1)?.payload.creation_price())
    }
}

impl TryFrom<Vec<Block>> for Ledger {
    type Error = LedgerError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Self::from_blocks(blocks)
    }
}

impl From<Ledger> for Vec<Block> {
    fn from(ledger: Ledger) -> Self {
        ledger.blocks
    }
}
