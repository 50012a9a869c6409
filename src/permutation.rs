//! Random address permutation based on the Fisher–Yates shuffle.

use std::collections::HashMap;
use std::net::IpAddr;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::range::{AddressRange, IpInt};

/// Yields every address in an [`AddressRange`] exactly once, in a
/// uniformly random order.
///
/// This is a Fisher–Yates shuffle run lazily and in reverse output
/// order. Imagine the range's addresses laid out in an array indexed
/// from 0, address at position `i` being `start + i`. A classic shuffle
/// walks a cursor down from the top, swaps the cursor element with a
/// randomly picked lower element, and leaves the shuffled suffix behind.
/// Here the array never exists: a position's occupant is computed from
/// its index unless a swap displaced it, and only displaced positions
/// are recorded. Positions the cursor has passed are never looked at
/// again, so their records are dropped as they are consumed. Memory is
/// therefore proportional to the number of displaced, not-yet-returned
/// positions, far below the range size in practice, and workable even
/// for IPv6 ranges that could never be materialized.
///
/// Each call to [`next`](RangePermutation::next) draws uniformly from
/// the addresses not yet returned, so the output is an unbiased random
/// permutation of the whole range. After the last address the engine
/// stays exhausted: further calls report the family's zero address with
/// the `done` flag set, and have no side effects.
///
/// Every engine seeds its own generator from OS entropy, so concurrent
/// pools iterated by separate engines produce uncorrelated orders.
///
/// # Example
///
/// ```
/// use ipshuffle::{AddressRange, RangePermutation};
///
/// let pool = AddressRange::new(
///     "192.0.2.1".parse().unwrap(),
///     "192.0.2.5".parse().unwrap(),
/// ).unwrap();
///
/// let mut permutation = RangePermutation::new(pool);
/// loop {
///     let (address, done) = permutation.next();
///     assert!(pool.contains(address));
///     if done {
///         break;
///     }
/// }
/// assert!(permutation.exhausted());
/// ```
#[derive(Debug)]
pub struct RangePermutation<R = StdRng> {
    /// Range start, the basis for natural-position addresses.
    start: IpInt,
    state: State,
    /// Swap records: position index to the address currently occupying
    /// it. Absent positions still hold their natural address
    /// `start + position`.
    swaps: HashMap<u128, IpInt>,
    rng: R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active { cursor: u128 },
    Exhausted,
}

impl RangePermutation<StdRng> {
    /// Creates a permutation over `range`, seeded from OS entropy.
    ///
    /// The seed is drawn once per instance and never shared, so two
    /// engines over the same range produce independent orders.
    #[must_use]
    pub fn new(range: AddressRange) -> RangePermutation<StdRng> {
        RangePermutation::with_rng(range, StdRng::from_os_rng())
    }
}

impl<R: Rng> RangePermutation<R> {
    /// Creates a permutation over `range` with a caller-supplied
    /// generator.
    ///
    /// A seeded generator makes the order reproducible:
    ///
    /// ```
    /// use ipshuffle::{AddressRange, RangePermutation};
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let pool = AddressRange::from_network("192.0.2.0/28".parse().unwrap());
    /// let a: Vec<_> = RangePermutation::with_rng(pool, StdRng::seed_from_u64(7))
    ///     .into_iter()
    ///     .collect();
    /// let b: Vec<_> = RangePermutation::with_rng(pool, StdRng::seed_from_u64(7))
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(a, b);
    /// ```
    #[must_use]
    pub fn with_rng(range: AddressRange, rng: R) -> RangePermutation<R> {
        debug!("new permutation over {range}");
        RangePermutation {
            start: IpInt::new(range.start()),
            state: State::Active {
                cursor: range.span(),
            },
            swaps: HashMap::new(),
            rng,
        }
    }

    /// Returns the next address of the permutation, and whether the
    /// range is exhausted as of this call.
    ///
    /// The `done` flag is `false` until the call that returns the last
    /// remaining address, which reports `true`. Once exhausted, every
    /// further call returns the family's zero address (`0.0.0.0` or
    /// `::`) with `done` still `true`; polling past the end is harmless.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> (IpAddr, bool) {
        let cursor = match self.state {
            State::Exhausted => return (self.start.zero().into(), true),
            State::Active { cursor } => cursor,
        };

        if cursor == 0 {
            // Position 0 is the only one left. It may never have been
            // displaced, in which case it still holds the range start.
            self.state = State::Exhausted;
            trace!("permutation exhausted");
            let last = self.swaps.remove(&0).unwrap_or(self.start);
            return (last.into(), true);
        }

        // Positions above the cursor have already been returned, and the
        // cursor's own occupant moves down this call, so draw from the
        // positions strictly below it.
        let pick = self.rng.random_range(0..cursor);

        // A position's occupant is its swap record if one exists,
        // otherwise the natural address at that position. The cursor
        // position is never revisited, so its record can go.
        let at_cursor = self
            .swaps
            .remove(&cursor)
            .unwrap_or_else(|| self.start.offset(cursor));
        let picked = self
            .swaps
            .insert(pick, at_cursor)
            .unwrap_or_else(|| self.start.offset(pick));

        self.state = State::Active { cursor: cursor - 1 };
        (picked.into(), false)
    }

    /// Whether every address in the range has been returned.
    pub fn exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }
}

/// Iterator over the remaining addresses of a [`RangePermutation`].
///
/// Yields each address once and then `None`; the zero-address sentinel
/// that [`RangePermutation::next`] reports after exhaustion is not part
/// of the iteration.
#[derive(Debug)]
pub struct IntoIter<R = StdRng> {
    permutation: RangePermutation<R>,
}

impl<R: Rng> Iterator for IntoIter<R> {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        if self.permutation.exhausted() {
            return None;
        }
        let (address, _) = self.permutation.next();
        Some(address)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.permutation.state {
            State::Active { cursor } => cursor.saturating_add(1),
            State::Exhausted => 0,
        };
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<R: Rng> IntoIterator for RangePermutation<R> {
    type Item = IpAddr;
    type IntoIter = IntoIter<R>;

    fn into_iter(self) -> IntoIter<R> {
        IntoIter { permutation: self }
    }
}
