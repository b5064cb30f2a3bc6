use bidchain_crypto::{PublicKey, Signer, SigningKey};
use bidchain_ledger::{Block, ChainVerifier, Creation, Ledger, Payload, PriceUpdate};
use bidchain_types::{ImpId, Price};

use crate::error::{IssuerError, IssuerResult};

/// A signing identity plus the ledger it holds.
///
/// Ledgers the issuer built itself are trusted. A ledger adopted from
/// elsewhere (via [`Issuer::holder`] or [`Issuer::load_ledger`]) must pass the
/// [`ChainVerifier`] before the issuer will sign anything on top of it.
pub struct Issuer<K: Signer = SigningKey> {
    signer: K,
    imp_id: Option<ImpId>,
    ledger: Ledger,
    trusted: bool,
}

impl Issuer<SigningKey> {
    /// Originate a ledger under a freshly generated Ed25519 key.
    ///
    /// A creation is issued only when both `imp_id` and `price` are given;
    /// otherwise the ledger holds just its genesis block.
    pub fn create(imp_id: Option<ImpId>, price: Option<Price>) -> IssuerResult<Self> {
        Self::with_signer(SigningKey::generate(), imp_id, price)
    }
}

impl<K: Signer> Issuer<K> {
    /// Originate a ledger under an existing signer.
    pub fn with_signer(
        signer: K,
        imp_id: Option<ImpId>,
        price: Option<Price>,
    ) -> IssuerResult<Self> {
        let mut issuer = Self {
            signer,
            imp_id: imp_id.clone(),
            ledger: Ledger::new()?,
            trusted: true,
        };
        if let (Some(imp_id), Some(price)) = (imp_id, price) {
            issuer.issue_creation(imp_id, price)?;
        }
        Ok(issuer)
    }

    /// Adopt a received block sequence. Nothing is verified until the first
    /// issue call.
    pub fn holder(signer: K, imp_id: Option<ImpId>, blocks: Vec<Block>) -> IssuerResult<Self> {
        Ok(Self {
            signer,
            imp_id,
            ledger: Ledger::from_blocks(blocks)?,
            trusted: false,
        })
    }

    /// Replace the held ledger with an external sequence.
    pub fn load_ledger(&mut self, blocks: Vec<Block>) -> IssuerResult<()> {
        self.ledger = Ledger::from_blocks(blocks)?;
        self.trusted = false;
        Ok(())
    }

    /// Sign `impId|price` and append the creation at the tip.
    pub fn issue_creation(&mut self, imp_id: ImpId, price: Price) -> IssuerResult<Block> {
        self.ensure_trusted()?;
        let creation = Creation::sign(imp_id.clone(), price, &self.signer);
        if self.imp_id.is_none() {
            self.imp_id = Some(imp_id);
        }
        self.append(Payload::Creation(creation))
    }

    /// Sign `impId|newPrice` and append the update at the tip.
    ///
    /// `previousPrice` is whatever [`Issuer::current_price`] resolves to.
    pub fn issue_price_update(&mut self, new_price: Price) -> IssuerResult<Block> {
        self.ensure_trusted()?;
        let previous_price = self.current_price()?;
        let imp_id = self.resolve_imp_id()?;
        let update = PriceUpdate::sign(imp_id, previous_price, new_price, &self.signer);
        self.append(Payload::PriceUpdate(update))
    }

    /// The tip's `newPrice` if the tip is an update, else the creation price
    /// at index 1.
    pub fn current_price(&self) -> IssuerResult<Price> {
        self.ledger
            .current_price()
            .ok_or(IssuerError::PriceUnavailable)
    }

    /// Run the chain verifier over the held ledger.
    pub fn is_valid(&self) -> bool {
        ChainVerifier::validate(&self.ledger)
    }

    /// The configured impression id, or failing that the id of the first
    /// transaction in the ledger.
    pub fn imp_id(&self) -> Option<ImpId> {
        self.imp_id.clone().or_else(|| {
            self.ledger
                .blocks()
                .iter()
                .find_map(|block| block.payload.transaction())
                .map(|tx| tx.imp_id().clone())
        })
    }

    pub fn public_key(&self) -> PublicKey {
        self.signer.public_key()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    fn resolve_imp_id(&self) -> IssuerResult<ImpId> {
        self.imp_id().ok_or(IssuerError::MissingImpId)
    }

    fn ensure_trusted(&mut self) -> IssuerResult<()> {
        if !self.trusted {
            ChainVerifier::verify(self.ledger.blocks()).map_err(IssuerError::UntrustedHistory)?;
            self.trusted = true;
        }
        Ok(())
    }

    fn append(&mut self, payload: Payload) -> IssuerResult<Block> {
        let block = self.ledger.next_block(payload)?;
        self.ledger.append(block.clone())?;
        Ok(block)
    }
}
