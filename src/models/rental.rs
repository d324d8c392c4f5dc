//! Short-term vehicle rental request.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A bike-rental request as submitted from the rental screen.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RentalRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Requested rental duration in minutes
    #[validate(range(min = 1))]
    pub duration: u32,
    /// Offered price for the rental period
    #[validate(range(min = 0.0))]
    pub price: f64,
}
