use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Public key as carried inside a transaction.
///
/// Opaque encoded bytes, hex on the wire. Which algorithm the bytes belong
/// to is decided by the [`SignatureScheme`] that verifies them; the ledger
/// types never look inside.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey(Vec<u8>);

/// Signature as carried inside a transaction (hex on the wire).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature(Vec<u8>);

/// A signing capability: anything that can sign bytes and name the public
/// key that verifies the result.
pub trait Signer {
    fn sign(&self, message: &[u8]) -> Signature;
    fn public_key(&self) -> PublicKey;
}

/// Verification side of an asymmetric signature scheme.
pub trait SignatureScheme {
    fn verify(
        public_key: &PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> Result<(), SignatureError>;
}

impl<S: Signer + ?Sized> Signer for &S {
    fn sign(&self, message: &[u8]) -> Signature {
        (**self).sign(message)
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }
}

impl<S: Signer + ?Sized> Signer for Arc<S> {
    fn sign(&self, message: &[u8]) -> Signature {
        (**self).sign(message)
    }

    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }
}

/// Ed25519, the default scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519;

impl SignatureScheme for Ed25519 {
    fn verify(
        public_key: &PublicKey,
        message: &[u8],
        signature: &Signature,
    ) -> Result<(), SignatureError> {
        VerifyingKey::try_from(public_key)?.verify(message, signature)
    }
}

/// Ed25519 signing key (private).
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Ed25519 verifying key (public).
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Create from raw 32-byte secret.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// The corresponding public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Raw secret key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl Signer for SigningKey {
    fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer as _;
        Signature(self.0.sign(message).to_bytes().to_vec())
    }

    fn public_key(&self) -> PublicKey {
        self.verifying_key().to_public_key()
    }
}

impl VerifyingKey {
    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        use ed25519_dalek::Verifier;
        let sig = ed25519_dalek::Signature::from_slice(signature.as_bytes())
            .map_err(|_| SignatureError::InvalidSignature)?;
        self.0
            .verify(message, &sig)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// Create from raw 32-byte public key.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| SignatureError::InvalidKey)?;
        Ok(Self(key))
    }

    /// Encode for embedding in a transaction.
    pub fn to_public_key(&self) -> PublicKey {
        PublicKey(self.0.to_bytes().to_vec())
    }
}

impl TryFrom<&PublicKey> for VerifyingKey {
    type Error = SignatureError;

    fn try_from(key: &PublicKey) -> Result<Self, Self::Error> {
        let bytes: [u8; 32] = key
            .as_bytes()
            .try_into()
            .map_err(|_| SignatureError::InvalidKey)?;
        Self::from_bytes(bytes)
    }
}

impl PublicKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        hex::decode(&value)
            .map(Self)
            .map_err(|e| SignatureError::InvalidEncoding(e.to_string()))
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

impl TryFrom<String> for Signature {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        hex::decode(&value)
            .map(Self)
            .map_err(|e| SignatureError::InvalidEncoding(e.to_string()))
    }
}

impl From<Signature> for String {
    fn from(sig: Signature) -> Self {
        sig.to_hex()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", hex::encode(self.0.to_bytes()))
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = &self.0[..self.0.len().min(8)];
        write!(f, "Signature({}...)", hex::encode(prefix))
    }
}

/// Errors from signing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
    #[error("invalid hex encoding: {0}")]
    InvalidEncoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let sk = SigningKey::generate();
        let sig = sk.sign(b"imp-1|5");
        assert!(Ed25519::verify(&sk.public_key(), b"imp-1|5", &sig).is_ok());
    }

    #[test]
    fn verify_fails_on_wrong_message() {
        let sk = SigningKey::generate();
        let sig = sk.sign(b"imp-1|5");
        assert_eq!(
            Ed25519::verify(&sk.public_key(), b"imp-1|6", &sig),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let sk1 = SigningKey::generate();
        let sk2 = SigningKey::generate();
        let sig = sk1.sign(b"message");
        assert!(Ed25519::verify(&sk2.public_key(), b"message", &sig).is_err());
    }

    #[test]
    fn truncated_key_is_invalid() {
        let sk = SigningKey::generate();
        let sig = sk.sign(b"message");
        let short = PublicKey::from_bytes(vec![1u8; 16]);
        assert_eq!(
            Ed25519::verify(&short, b"message", &sig),
            Err(SignatureError::InvalidKey)
        );
    }

    #[test]
    fn truncated_signature_is_invalid() {
        let sk = SigningKey::generate();
        let sig = sk.sign(b"message");
        let short = Signature::from_bytes(sig.as_bytes()[..10].to_vec());
        assert_eq!(
            Ed25519::verify(&sk.public_key(), b"message", &short),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn from_bytes_roundtrip() {
        let sk = SigningKey::generate();
        let sk2 = SigningKey::from_bytes(*sk.as_bytes());
        assert_eq!(sk.verifying_key(), sk2.verifying_key());
    }

    #[test]
    fn shared_signer_signs_like_owner() {
        let sk = Arc::new(SigningKey::generate());
        let sig = sk.sign(b"shared");
        assert_eq!(Signer::public_key(&sk), sk.verifying_key().to_public_key());
        assert!(sk.verifying_key().verify(b"shared", &sig).is_ok());
    }

    #[test]
    fn wire_form_is_hex() {
        let sk = SigningKey::generate();
        let key = sk.public_key();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.to_hex()));
        assert_eq!(key.to_hex().len(), 64);
        let sig_json = serde_json::to_string(&sk.sign(b"x")).unwrap();
        assert_eq!(sig_json.len(), 128 + 2);
    }

    #[test]
    fn non_hex_wire_form_is_rejected() {
        assert!(serde_json::from_str::<PublicKey>("\"not hex\"").is_err());
        assert!(serde_json::from_str::<Signature>("\"zz\"").is_err());
    }

    #[test]
    fn debug_redacts_signing_key() {
        let sk = SigningKey::generate();
        let debug = format!("{sk:?}");
        assert!(debug.contains("redacted"));
    }
}
