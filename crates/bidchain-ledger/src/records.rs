use serde::{Deserialize, Serialize};

use bidchain_crypto::{PublicKey, Signature, Signer};
use bidchain_types::{BlockHash, ImpId, Price, Timestamp};

/// One ledger entry binding a payload to the previous block via a hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Block {
    pub index: u64,
    pub timestamp: Timestamp,
    pub payload: Payload,
    pub previous_hash: BlockHash,
    pub hash: BlockHash,
}

impl Block {
    pub fn is_genesis(&self) -> bool {
        self.payload.is_genesis()
    }
}

/// Business content of a block. The `type` tag selects the variant on the
/// wire: `genesis`, `creation` or `price_update`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Genesis(Genesis),
    Creation(Creation),
    PriceUpdate(PriceUpdate),
}

impl Payload {
    pub fn genesis() -> Self {
        Self::Genesis(Genesis {})
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, Self::Genesis(_))
    }

    /// The signed transaction, or `None` for the genesis marker.
    pub fn transaction(&self) -> Option<&dyn Transaction> {
        match self {
            Self::Genesis(_) => None,
            Self::Creation(tx) => Some(tx as &dyn Transaction),
            Self::PriceUpdate(tx) => Some(tx as &dyn Transaction),
        }
    }

    /// `newPrice` when this is a price update.
    pub fn new_price(&self) -> Option<Price> {
        match self {
            Self::PriceUpdate(tx) => Some(tx.new_price),
            _ => None,
        }
    }

    /// `price` when this is a creation.
    pub fn creation_price(&self) -> Option<Price> {
        match self {
            Self::Creation(tx) => Some(tx.price),
            _ => None,
        }
    }
}

/// Body of the genesis marker. Carries no fields; any key besides `type`
/// is refused on decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Genesis {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Creation,
    PriceUpdate,
}

/// Behaviour shared by every signed transaction variant.
///
/// The signature covers only [`Transaction::signed_message`], not the whole
/// transaction: timestamps and the variant tag are protected by the block
/// hash instead.
pub trait Transaction {
    fn kind(&self) -> TransactionKind;
    fn imp_id(&self) -> &ImpId;
    fn public_key(&self) -> &PublicKey;
    fn signature(&self) -> &Signature;
    /// The exact string that was signed.
    fn signed_message(&self) -> String;
}

/// `impId|price` in the form both parties sign and verify.
pub fn signed_message(imp_id: &ImpId, price: Price) -> String {
    format!("{imp_id}|{price}")
}

/// First transaction of an impression, setting its opening price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Creation {
    pub imp_id: ImpId,
    pub price: Price,
    pub timestamp: Timestamp,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl Creation {
    /// Build and sign a creation over `impId|price`.
    pub fn sign<K: Signer + ?Sized>(imp_id: ImpId, price: Price, signer: &K) -> Self {
        let signature = signer.sign(signed_message(&imp_id, price).as_bytes());
        Self {
            imp_id,
            price,
            timestamp: Timestamp::now(),
            public_key: signer.public_key(),
            signature,
        }
    }
}

impl Transaction for Creation {
    fn kind(&self) -> TransactionKind {
        TransactionKind::Creation
    }

    fn imp_id(&self) -> &ImpId {
        &self.imp_id
    }

    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn signed_message(&self) -> String {
        signed_message(&self.imp_id, self.price)
    }
}

/// A new price for an existing impression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PriceUpdate {
    pub imp_id: ImpId,
    pub previous_price: Price,
    pub new_price: Price,
    pub timestamp: Timestamp,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl PriceUpdate {
    /// Build and sign an update over `impId|newPrice`.
    pub fn sign<K: Signer + ?Sized>(
        imp_id: ImpId,
        previous_price: Price,
        new_price: Price,
        signer: &K,
    ) -> Self {
        let signature = signer.sign(signed_message(&imp_id, new_price).as_bytes());
        Self {
            imp_id,
            previous_price,
            new_price,
            timestamp: Timestamp::now(),
            public_key: signer.public_key(),
            signature,
        }
    }
}

impl Transaction for PriceUpdate {
    fn kind(&self) -> TransactionKind {
        TransactionKind::PriceUpdate
    }

    fn imp_id(&self) -> &ImpId {
        &self.imp_id
    }

    fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn signed_message(&self) -> String {
        signed_message(&self.imp_id, self.new_price)
    }
}
