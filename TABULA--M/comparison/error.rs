use thiserror::Error;

/// Errors raised while building detectors or table data.
///
/// Detection and rendering themselves never fail; only construction does.
#[derive(Debug, Error, PartialEq)]
pub enum TabulaError {
    /// Threshold outside `[0, 1]` or not a number.
    #[error("invalid confidence threshold: {0}")]
    InvalidThreshold(f32),
    /// The same item name appears twice in a comparison table.
    #[error("duplicate comparison item: {0}")]
    DuplicateItem(String),
    /// The same attribute name appears twice in a comparison table.
    #[error("duplicate comparison attribute: {0}")]
    DuplicateAttribute(String),
    /// An item name was blank.
    #[error("comparison item names cannot be empty")]
    EmptyItem,
}
