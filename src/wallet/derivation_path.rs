//! Key Derivation Paths
//!
//! Parses the `derivedPath` strings found on signing obligations:
//! - `m` root, then `/`-separated indices
//! - `'`, `h` or `H` suffix marks a hardened index
//! - indices are below 2^31 (the hardened bit is carried separately)

use std::str::FromStr;

use thiserror::Error;

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x80000000;

/// Why a path string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("derivation path must start with 'm'")]
    MissingRoot,
    #[error("empty path component")]
    EmptyComponent,
    #[error("invalid path component '{0}'")]
    InvalidIndex(String),
    #[error("path component {0} exceeds maximum value")]
    IndexOutOfRange(u64),
}

/// Parsed derivation path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath {
    pub components: Vec<DerivationComponent>,
}

/// Single component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationComponent {
    pub index: u32,
    pub hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> Self {
        Self { index, hardened }
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }
}

impl DerivationPath {
    /// Number of levels below the root
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    pub fn is_master(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl std::fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim();

        let rest = trimmed
            .strip_prefix('m')
            .or_else(|| trimmed.strip_prefix('M'))
            .ok_or(PathError::MissingRoot)?;

        // `m` alone is the master key
        if rest.is_empty() {
            return Ok(Self::default());
        }

        let rest = rest.strip_prefix('/').ok_or(PathError::MissingRoot)?;

        let components = rest
            .split('/')
            .map(parse_component)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }
}

/// Parse a single path component
fn parse_component(s: &str) -> Result<DerivationComponent, PathError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(PathError::EmptyComponent);
    }

    // Check for hardened indicator
    let (number_str, hardened) = match trimmed.strip_suffix(['\'', 'h', 'H']) {
        Some(number) => (number, true),
        None => (trimmed, false),
    };

    if number_str.is_empty() || !number_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::InvalidIndex(s.to_string()));
    }

    let index: u64 = number_str
        .parse()
        .map_err(|_| PathError::InvalidIndex(s.to_string()))?;

    // Check for overflow (excluding hardened bit)
    if index >= u64::from(HARDENED) {
        return Err(PathError::IndexOutOfRange(index));
    }

    Ok(DerivationComponent::new(index as u32, hardened))
}
