//! Key and alias resource types returned by the control plane.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProtoError;

/// Lifecycle state of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyState {
    /// Usable for cryptographic operations.
    Enabled,
    /// Disabled by an operator; can be re-enabled.
    Disabled,
    /// Scheduled for deletion; can still be restored.
    PendingDeletion,
    /// Waiting for key material to be imported.
    PendingImport,
    /// Being created.
    Creating,
    /// The backing key store is unreachable.
    Unavailable,
}

impl KeyState {
    /// Returns the wire name of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
            Self::PendingDeletion => "PendingDeletion",
            Self::PendingImport => "PendingImport",
            Self::Creating => "Creating",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a key may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyUsage {
    /// Symmetric or asymmetric encryption.
    EncryptDecrypt,
    /// Digital signatures.
    SignVerify,
    /// HMAC generation and verification.
    GenerateVerifyMac,
    /// Key agreement (ECDH).
    KeyAgreement,
}

impl KeyUsage {
    /// Every key usage, in wire order.
    pub const ALL: &'static [Self] = &[
        Self::EncryptDecrypt,
        Self::SignVerify,
        Self::GenerateVerifyMac,
        Self::KeyAgreement,
    ];

    /// Wire tokens accepted for key usage.
    pub const TOKENS: &'static [&'static str] = &[
        "ENCRYPT_DECRYPT",
        "SIGN_VERIFY",
        "GENERATE_VERIFY_MAC",
        "KEY_AGREEMENT",
    ];

    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EncryptDecrypt => "ENCRYPT_DECRYPT",
            Self::SignVerify => "SIGN_VERIFY",
            Self::GenerateVerifyMac => "GENERATE_VERIFY_MAC",
            Self::KeyAgreement => "KEY_AGREEMENT",
        }
    }
}

impl FromStr for KeyUsage {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|usage| usage.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownToken {
                kind: "key usage",
                token: s.to_string(),
            })
    }
}

/// Key material type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeySpec {
    /// 256-bit AES-GCM key.
    #[serde(rename = "SYMMETRIC_DEFAULT")]
    SymmetricDefault,
    /// RSA 2048-bit key pair.
    #[serde(rename = "RSA_2048")]
    Rsa2048,
    /// RSA 3072-bit key pair.
    #[serde(rename = "RSA_3072")]
    Rsa3072,
    /// RSA 4096-bit key pair.
    #[serde(rename = "RSA_4096")]
    Rsa4096,
    /// NIST P-256 key pair.
    #[serde(rename = "ECC_NIST_P256")]
    EccNistP256,
    /// NIST P-384 key pair.
    #[serde(rename = "ECC_NIST_P384")]
    EccNistP384,
    /// NIST P-521 key pair.
    #[serde(rename = "ECC_NIST_P521")]
    EccNistP521,
    /// secp256k1 key pair.
    #[serde(rename = "ECC_SECG_P256K1")]
    EccSecgP256k1,
    /// HMAC key with a 224-bit digest.
    #[serde(rename = "HMAC_224")]
    Hmac224,
    /// HMAC key with a 256-bit digest.
    #[serde(rename = "HMAC_256")]
    Hmac256,
    /// HMAC key with a 384-bit digest.
    #[serde(rename = "HMAC_384")]
    Hmac384,
    /// HMAC key with a 512-bit digest.
    #[serde(rename = "HMAC_512")]
    Hmac512,
}

impl KeySpec {
    /// Every key spec, in wire order.
    pub const ALL: &'static [Self] = &[
        Self::SymmetricDefault,
        Self::Rsa2048,
        Self::Rsa3072,
        Self::Rsa4096,
        Self::EccNistP256,
        Self::EccNistP384,
        Self::EccNistP521,
        Self::EccSecgP256k1,
        Self::Hmac224,
        Self::Hmac256,
        Self::Hmac384,
        Self::Hmac512,
    ];

    /// Wire tokens accepted for key specs.
    pub const TOKENS: &'static [&'static str] = &[
        "SYMMETRIC_DEFAULT",
        "RSA_2048",
        "RSA_3072",
        "RSA_4096",
        "ECC_NIST_P256",
        "ECC_NIST_P384",
        "ECC_NIST_P521",
        "ECC_SECG_P256K1",
        "HMAC_224",
        "HMAC_256",
        "HMAC_384",
        "HMAC_512",
    ];

    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SymmetricDefault => "SYMMETRIC_DEFAULT",
            Self::Rsa2048 => "RSA_2048",
            Self::Rsa3072 => "RSA_3072",
            Self::Rsa4096 => "RSA_4096",
            Self::EccNistP256 => "ECC_NIST_P256",
            Self::EccNistP384 => "ECC_NIST_P384",
            Self::EccNistP521 => "ECC_NIST_P521",
            Self::EccSecgP256k1 => "ECC_SECG_P256K1",
            Self::Hmac224 => "HMAC_224",
            Self::Hmac256 => "HMAC_256",
            Self::Hmac384 => "HMAC_384",
            Self::Hmac512 => "HMAC_512",
        }
    }
}

impl FromStr for KeySpec {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|spec| spec.as_str() == s)
            .ok_or_else(|| ProtoError::UnknownToken {
                kind: "key spec",
                token: s.to_string(),
            })
    }
}

/// Full description of a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyMetadata {
    /// Globally unique key identifier.
    pub key_id: String,
    /// Resource name of the key.
    pub arn: String,
    /// When the key was created.
    pub creation_date: DateTime<Utc>,
    /// Whether the key can be used.
    pub enabled: bool,
    /// Operator supplied description.
    #[serde(default)]
    pub description: String,
    /// Permitted usage.
    pub key_usage: KeyUsage,
    /// Key material type.
    pub key_spec: KeySpec,
    /// Lifecycle state.
    pub key_state: KeyState,
    /// Scheduled deletion time, when pending deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_date: Option<DateTime<Utc>>,
    /// Waiting period before deletion, when pending deletion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_deletion_window_in_days: Option<u32>,
}

/// Entry in a key listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyListEntry {
    /// Key identifier.
    pub key_id: String,
    /// Resource name of the key.
    pub key_arn: String,
}

/// Entry in an alias listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasListEntry {
    /// Alias name, always prefixed with `alias/`.
    pub alias_name: String,
    /// Resource name of the alias.
    pub alias_arn: String,
    /// Key the alias points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_key_id: Option<String>,
    /// When the alias was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
    /// When the alias was last retargeted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_date: Option<DateTime<Utc>>,
}
