// src/validation.rs
use crate::error::RegistryError;
use uuid::Uuid;

pub const MAX_METADATA_URI_LEN: usize = 256;

pub fn validate_supply(total_supply: u64) -> Result<(), RegistryError> {
    if total_supply == 0 {
        return Err(RegistryError::InvalidInput(
            "total supply must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_shares(fractional_shares: u64) -> Result<(), RegistryError> {
    if fractional_shares == 0 {
        return Err(RegistryError::InvalidInput(
            "fractional shares must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_metadata_uri(uri: &str) -> Result<(), RegistryError> {
    if uri.is_empty() {
        return Err(RegistryError::InvalidInput(
            "metadata uri must not be empty".to_string(),
        ));
    }
    if uri.chars().count() > MAX_METADATA_URI_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "metadata uri exceeds {} characters",
            MAX_METADATA_URI_LEN
        )));
    }
    Ok(())
}

pub fn validate_asset_id(asset_id: u64) -> Result<(), RegistryError> {
    if asset_id == 0 {
        return Err(RegistryError::InvalidInput(
            "asset id must be positive".to_string(),
        ));
    }
    Ok(())
}

/// The administrator identity is never a valid transfer or approval target.
pub fn validate_counterparty(account: Uuid, admin: Uuid) -> Result<(), RegistryError> {
    if account == admin {
        return Err(RegistryError::InvalidInput(
            "administrator cannot be a counterparty".to_string(),
        ));
    }
    Ok(())
}
