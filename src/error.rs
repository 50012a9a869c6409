//! Error types for address range validation.

use std::net::IpAddr;

use thiserror::Error;

/// Error returned when an address range fails validation.
///
/// Ranges are validated once, at construction; nothing after that point
/// can fail. A malformed range is a caller bug and is reported rather
/// than silently tolerated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IpShuffleError {
    /// The range endpoints belong to different address families.
    #[error("mixed address families in range: {start} and {end}")]
    MixedAddressFamilies {
        /// Start of the rejected range.
        start: IpAddr,
        /// End of the rejected range.
        end: IpAddr,
    },

    /// The range start is numerically above its end.
    #[error("inverted range: {start} is above {end}")]
    InvertedRange {
        /// Start of the rejected range.
        start: IpAddr,
        /// End of the rejected range.
        end: IpAddr,
    },
}
