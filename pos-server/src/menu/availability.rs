//! Platform gating rules
//!
//! The in-house `restaurant` channel gates the delivery channels: a dish
//! cannot go live on Zomato/Swiggy/other while it is off the restaurant
//! menu, and taking it off the restaurant menu takes it off everywhere.

use shared::{Platform, PlatformAvailability};

use crate::utils::AppError;

/// Apply a single platform toggle to the current flags
pub fn apply_platform_change(
    current: PlatformAvailability,
    platform: Platform,
    enabled: bool,
) -> Result<PlatformAvailability, AppError> {
    if enabled && platform != Platform::Restaurant && !current.restaurant {
        return Err(AppError::BusinessRule(format!(
            "Cannot enable {platform} while the restaurant channel is off"
        )));
    }

    let mut next = current;
    next.set(platform, enabled);

    if platform == Platform::Restaurant && !enabled {
        next.zomato = false;
        next.swiggy = false;
        next.other = false;
    }

    Ok(next)
}

/// Reject a wholesale availability replacement that violates the gating rule
pub fn validate_shape(next: PlatformAvailability) -> Result<(), AppError> {
    if !next.restaurant && (next.zomato || next.swiggy || next.other) {
        return Err(AppError::BusinessRule(
            "Delivery channels cannot be enabled while the restaurant channel is off".to_string(),
        ));
    }
    Ok(())
}
