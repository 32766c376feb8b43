use anyhow::{anyhow, Result};
use bip39::{Language, Mnemonic};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

const KEYSTORE_FILE: &str = "coupon_wallet.json";

/// Local keystore. Holds the signing key for the single account this
/// wallet controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub name: String,
    pub address: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    pub created_at: String,
}

impl Wallet {
    /// Generate a new wallet with a BIP39 mnemonic
    pub fn generate(name: String) -> Result<(Self, String)> {
        // 128 bits of entropy for a 12-word mnemonic
        let mut entropy = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut entropy);

        let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
            .map_err(|e| anyhow!("Failed to generate mnemonic: {}", e))?;

        let wallet = Self::from_seed(&mnemonic.to_seed(""), name)?;
        Ok((wallet, mnemonic.to_string()))
    }

    /// Import wallet from a mnemonic phrase
    pub fn from_mnemonic(mnemonic_phrase: &str, name: String) -> Result<Self> {
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, mnemonic_phrase)
            .map_err(|e| anyhow!("Invalid mnemonic: {}", e))?;

        Self::from_seed(&mnemonic.to_seed(""), name)
    }

    /// Import wallet from a 32-byte private key in hex
    pub fn from_private_key(private_key_hex: &str, name: String) -> Result<Self> {
        let key_bytes = hex::decode(private_key_hex)
            .map_err(|_| anyhow!("Invalid hex private key"))?;

        let secret: [u8; SECRET_KEY_LENGTH] = key_bytes
            .try_into()
            .map_err(|_| anyhow!("Private key must be 32 bytes"))?;

        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret), name))
    }

    fn from_seed(seed: &[u8], name: String) -> Result<Self> {
        let secret: [u8; SECRET_KEY_LENGTH] = seed[..SECRET_KEY_LENGTH]
            .try_into()
            .map_err(|_| anyhow!("Failed to derive private key"))?;

        Ok(Self::from_signing_key(SigningKey::from_bytes(&secret), name))
    }

    fn from_signing_key(signing_key: SigningKey, name: String) -> Self {
        let verifying_key = signing_key.verifying_key();

        Wallet {
            name,
            address: Self::encode_address(&verifying_key),
            public_key: hex::encode(verifying_key.to_bytes()),
            private_key: Some(hex::encode(signing_key.to_bytes())),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Address is the sha256 of the public key, hex with a 0x prefix
    fn encode_address(verifying_key: &VerifyingKey) -> String {
        let digest = Sha256::digest(verifying_key.to_bytes());
        format!("0x{}", hex::encode(digest))
    }

    /// Sign arbitrary bytes, returning the signature in hex
    pub fn sign(&self, message: &[u8]) -> Result<String> {
        let signing_key = self.signing_key()?;
        let signature = signing_key.sign(message);
        Ok(hex::encode(signature.to_bytes()))
    }

    fn signing_key(&self) -> Result<SigningKey> {
        let private_key_hex = self
            .private_key
            .as_ref()
            .ok_or_else(|| anyhow!("No private key available"))?;

        let key_bytes = hex::decode(private_key_hex)
            .map_err(|_| anyhow!("Invalid hex private key"))?;

        let secret: [u8; SECRET_KEY_LENGTH] = key_bytes
            .try_into()
            .map_err(|_| anyhow!("Private key must be 32 bytes"))?;

        Ok(SigningKey::from_bytes(&secret))
    }

    /// Save wallet to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load wallet from file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow!(
                "No wallet found. Create one with 'coupon-wallet create'"
            ));
        }

        let json = fs::read_to_string(path)?;
        let wallet: Wallet = serde_json::from_str(&json)?;
        Ok(wallet)
    }

    /// Default keystore path in the home directory
    pub fn keystore_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(KEYSTORE_FILE))
    }

    /// Check if a keystore exists at the default path
    pub fn exists() -> bool {
        Self::keystore_path().map(|p| p.exists()).unwrap_or(false)
    }
}
