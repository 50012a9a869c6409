#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces)]
//! # ipshuffle
//!
//! This library yields every address in a contiguous IPv4 or IPv6 range
//! exactly once, in a uniformly random order, without ever materializing
//! the range. It exists for address-allocation engines (DHCP lease
//! allocators and the like) that want to offer pool addresses in an
//! unpredictable order: sequential allocation is guessable, and
//! concurrent allocators hammering the same pool from the same end
//! collide constantly.
//!
//! The obvious approach of building the address list and shuffling it
//! is a non-starter for IPv6 pools, which can hold up to 2^128
//! addresses.
//! [`RangePermutation`] instead runs a Fisher–Yates shuffle lazily: it
//! only records positions that have been displaced from their natural
//! spot, so memory grows with the number of displacements rather than
//! the size of the range.
//!
//! ## Quick Start
//!
//! ```rust
//! use ipshuffle::{AddressRange, RangePermutation};
//!
//! fn main() -> Result<(), ipshuffle::IpShuffleError> {
//!     let range = AddressRange::new(
//!         "192.0.2.1".parse().unwrap(),
//!         "192.0.2.10".parse().unwrap(),
//!     )?;
//!
//!     let mut permutation = RangePermutation::new(range);
//!     loop {
//!         let (address, done) = permutation.next();
//!         println!("offering {address}");
//!         if done {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Or drain a pool as an iterator:
//!
//! ```rust
//! use ipshuffle::{AddressRange, RangePermutation};
//!
//! let pool = AddressRange::from_network("192.0.2.0/29".parse().unwrap());
//! let addresses: Vec<_> = RangePermutation::new(pool).into_iter().collect();
//! assert_eq!(addresses.len(), 8);
//! ```
//!
//! ## Determinism
//!
//! Every permutation seeds its own random generator from OS entropy, so
//! two engines over the same pool produce independent orders. Tests that
//! need a reproducible order can inject a seeded generator with
//! [`RangePermutation::with_rng`].
//!
//! ## Thread Safety
//!
//! A `RangePermutation` is a single-threaded mutable object: `next` is
//! synchronous, never blocks, and must not be invoked concurrently on
//! one instance. Share a pool's permutation across workers by putting it
//! behind a lock, or give each worker its own disjoint range.

mod error;
mod permutation;
mod range;

// Re-export public types
pub use error::IpShuffleError;
pub use permutation::{IntoIter, RangePermutation};
pub use range::AddressRange;
