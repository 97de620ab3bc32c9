// src/error.rs
use std::fmt;

#[derive(Debug)]
pub enum RegistryError {
    InvalidInput(String),
    InvalidAsset(u64),
    Unauthorized,
    ComplianceCheckFailed,
    TransferFailed,
    Storage(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::InvalidAsset(id) => write!(f, "Asset not found: {}", id),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::ComplianceCheckFailed => write!(f, "Compliance check failed"),
            Self::TransferFailed => write!(f, "Transfer failed"),
            Self::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}
