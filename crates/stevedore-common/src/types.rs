//! Domain primitive types used across the Stevedore workspace.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A build specification: the immutable input to one render.
///
/// Required fields are modelled as `Option` so that absence survives
/// deserialization and is reported by the resolver with the field's name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Specification {
    /// Base image reference, e.g. `debian:12`.
    pub base_image: Option<String>,
    /// OS user the service runs as.
    pub user: Option<String>,
    /// Numeric user id.
    pub uid: Option<u32>,
    /// Numeric group id. Defaults to `uid`.
    pub gid: Option<u32>,
    /// Absolute installation path of the application payload.
    pub install_path: Option<String>,
    /// Absolute home directory of the service user.
    pub home_dir: Option<String>,
    /// Environment declarations, in output order.
    pub envs: Vec<EnvDeclaration>,
    /// Shell commands run before dependency installation.
    pub pre_install: Vec<String>,
    /// Shell commands run after dependency installation.
    pub post_install: Vec<String>,
    /// Packages installed best-effort ahead of the dependency manifest.
    pub preheat: Vec<String>,
    /// OS packages installed before the runtime environment is created.
    pub system_packages: Vec<String>,
    /// Image labels.
    pub labels: BTreeMap<String, String>,
    /// Python version the runtime environment is pinned to.
    pub python_version: Option<String>,
    /// Service port.
    pub port: Option<u16>,
    /// Metrics port.
    pub metrics_port: Option<u16>,
    /// Whether cache-mount syntax may be used.
    pub enable_buildkit: Option<bool>,
    /// Whether the generated-file banner is emitted.
    pub emit_header: Option<bool>,
    /// Build-frontend identifier for the directive line.
    pub frontend: Option<String>,
}

/// One environment variable declared as both build argument and runtime env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvDeclaration {
    /// Variable name.
    pub name: String,
    /// Literal default. `None` declares the argument without a default.
    #[serde(default)]
    pub value: Option<String>,
}

impl EnvDeclaration {
    /// Declares a variable with a literal default.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Declares a variable without a default.
    #[must_use]
    pub fn unset(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// SHA-256 digest of rendered manifest text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Creates a hash from a hex-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a valid 64-character hex string.
    pub fn from_hex(hex: impl Into<String>) -> crate::error::Result<Self> {
        let hex = hex.into();
        if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(crate::error::StevedoreError::invalid(
                "digest",
                format!("invalid SHA-256 hex string: {hex}"),
            ));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// Encodes a raw 32-byte digest.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Returns the hex-encoded hash string.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sha256:{}", self.0)
    }
}

impl FromStr for Sha256Hash {
    type Err = crate::error::StevedoreError;

    /// Accepts bare hex or the `sha256:`-prefixed display form.
    fn from_str(s: &str) -> crate::error::Result<Self> {
        let trimmed = s.trim();
        Self::from_hex(trimmed.strip_prefix("sha256:").unwrap_or(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specification_defaults_are_empty() {
        let spec = Specification::default();
        assert!(spec.base_image.is_none());
        assert!(spec.envs.is_empty());
        assert!(spec.enable_buildkit.is_none());
    }

    #[test]
    fn env_declaration_without_value_deserializes() {
        let decl: EnvDeclaration = serde_json::from_str(r#"{"name":"TOKEN"}"#).expect("parse");
        assert_eq!(decl, EnvDeclaration::unset("TOKEN"));
    }

    #[test]
    fn unknown_specification_fields_are_rejected() {
        let result: Result<Specification, _> = serde_json::from_str(r#"{"bogus": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sha256_rejects_short_input() {
        assert!(Sha256Hash::from_hex("abc").is_err());
    }

    #[test]
    fn sha256_from_bytes_is_lowercase_hex() {
        let hash = Sha256Hash::from_bytes([0xab; 32]);
        assert_eq!(hash.as_hex(), "ab".repeat(32));
    }

    #[test]
    fn sha256_parses_display_form() {
        let hex = "0f".repeat(32);
        let parsed: Sha256Hash = format!("sha256:{hex}").parse().expect("parse");
        assert_eq!(parsed, Sha256Hash::from_bytes([0x0f; 32]));
        assert_eq!(hex.parse::<Sha256Hash>().expect("parse"), parsed);
        assert!("sha256:xyz".parse::<Sha256Hash>().is_err());
    }

    #[test]
    fn sha256_display_has_prefix() {
        let hash = Sha256Hash::from_hex("A".repeat(64)).expect("valid");
        assert_eq!(hash.to_string(), format!("sha256:{}", "a".repeat(64)));
    }
}
