//! Address range value type and integer address arithmetic.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::IpNetwork;

use crate::error::IpShuffleError;

/// A contiguous, inclusive span of IP addresses of one family.
///
/// Both endpoints must belong to the same family and `start` must not be
/// above `end`; [`AddressRange::new`] rejects anything else. The range is
/// immutable once built, and cheap to copy.
///
/// # Example
///
/// ```
/// use ipshuffle::AddressRange;
///
/// let range = AddressRange::new(
///     "192.0.2.1".parse().unwrap(),
///     "192.0.2.5".parse().unwrap(),
/// ).unwrap();
///
/// assert_eq!(range.size(), 5);
/// assert!(range.contains("192.0.2.3".parse().unwrap()));
/// assert!(!range.contains("192.0.2.6".parse().unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawAddressRange"))]
pub struct AddressRange {
    start: IpAddr,
    end: IpAddr,
}

impl AddressRange {
    /// Builds a range from its inclusive endpoints.
    ///
    /// Fails with [`IpShuffleError::MixedAddressFamilies`] if the
    /// endpoints are not of the same family, and with
    /// [`IpShuffleError::InvertedRange`] if `start` is numerically above
    /// `end`. A single-address range (`start == end`) is valid.
    pub fn new(start: IpAddr, end: IpAddr) -> Result<AddressRange, IpShuffleError> {
        if start.is_ipv4() != end.is_ipv4() {
            return Err(IpShuffleError::MixedAddressFamilies { start, end });
        }
        if numeric(start) > numeric(end) {
            return Err(IpShuffleError::InvertedRange { start, end });
        }
        Ok(AddressRange { start, end })
    }

    /// Builds the full span of a CIDR block, network address through last
    /// address.
    ///
    /// # Example
    ///
    /// ```
    /// use ipshuffle::AddressRange;
    ///
    /// let range = AddressRange::from_network("192.0.2.0/24".parse().unwrap());
    /// assert_eq!(range.start(), "192.0.2.0".parse::<std::net::IpAddr>().unwrap());
    /// assert_eq!(range.end(), "192.0.2.255".parse::<std::net::IpAddr>().unwrap());
    /// ```
    pub fn from_network(network: IpNetwork) -> AddressRange {
        match network {
            IpNetwork::V4(net) => AddressRange {
                start: IpAddr::V4(net.network()),
                end: IpAddr::V4(net.broadcast()),
            },
            IpNetwork::V6(net) => {
                let first = u128::from(net.network());
                let host_bits = u128::MAX
                    .checked_shr(u32::from(net.prefix()))
                    .unwrap_or(0);
                AddressRange {
                    start: IpAddr::V6(net.network()),
                    end: IpAddr::V6(Ipv6Addr::from(first | host_bits)),
                }
            }
        }
    }

    /// First address of the range.
    pub fn start(&self) -> IpAddr {
        self.start
    }

    /// Last address of the range.
    pub fn end(&self) -> IpAddr {
        self.end
    }

    /// Whether `address` falls within the range. Addresses of the other
    /// family are never contained.
    pub fn contains(&self, address: IpAddr) -> bool {
        address.is_ipv4() == self.start.is_ipv4()
            && numeric(self.start) <= numeric(address)
            && numeric(address) <= numeric(self.end)
    }

    /// Number of addresses in the range.
    ///
    /// Saturates at `u128::MAX` for the one range it cannot represent,
    /// the full IPv6 address space (`::` through
    /// `ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff`), whose true count is
    /// 2^128.
    pub fn size(&self) -> u128 {
        self.span().saturating_add(1)
    }

    /// Distance between the endpoints, i.e. `size - 1`. Unlike the size
    /// this always fits in `u128`.
    pub(crate) fn span(&self) -> u128 {
        numeric(self.end) - numeric(self.start)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawAddressRange {
    start: IpAddr,
    end: IpAddr,
}

#[cfg(feature = "serde")]
impl TryFrom<RawAddressRange> for AddressRange {
    type Error = IpShuffleError;

    fn try_from(raw: RawAddressRange) -> Result<AddressRange, IpShuffleError> {
        AddressRange::new(raw.start, raw.end)
    }
}

/// An address as an unsigned integer of its family's width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum IpInt {
    V4(u32),
    V6(u128),
}

impl IpInt {
    pub(crate) fn new(address: IpAddr) -> Self {
        match address {
            IpAddr::V4(v4) => IpInt::V4(v4.into()),
            IpAddr::V6(v6) => IpInt::V6(v6.into()),
        }
    }

    /// The natural address `position` steps above this one.
    ///
    /// Callers only pass positions inside the range this address starts,
    /// so the addition stays within the family's width.
    pub(crate) fn offset(self, position: u128) -> IpInt {
        match self {
            IpInt::V4(ip) => IpInt::V4(ip + position as u32),
            IpInt::V6(ip) => IpInt::V6(ip + position),
        }
    }

    /// The all-zero address of the same family.
    pub(crate) fn zero(self) -> IpInt {
        match self {
            IpInt::V4(_) => IpInt::V4(0),
            IpInt::V6(_) => IpInt::V6(0),
        }
    }
}

impl From<IpInt> for IpAddr {
    fn from(ip: IpInt) -> IpAddr {
        match ip {
            IpInt::V4(ip) => IpAddr::V4(Ipv4Addr::from(ip)),
            IpInt::V6(ip) => IpAddr::V6(Ipv6Addr::from(ip)),
        }
    }
}

fn numeric(address: IpAddr) -> u128 {
    match address {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_mixed_families() {
        let err = AddressRange::new(addr("192.0.2.1"), addr("2001:db8::1")).unwrap_err();
        assert!(matches!(err, IpShuffleError::MixedAddressFamilies { .. }));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = AddressRange::new(addr("192.0.2.9"), addr("192.0.2.1")).unwrap_err();
        assert!(matches!(err, IpShuffleError::InvertedRange { .. }));

        let err = AddressRange::new(addr("2001:db8::2"), addr("2001:db8::1")).unwrap_err();
        assert!(matches!(err, IpShuffleError::InvertedRange { .. }));
    }

    #[test]
    fn test_single_address_range_is_valid() {
        let range = AddressRange::new(addr("192.0.2.7"), addr("192.0.2.7")).unwrap();
        assert_eq!(range.size(), 1);
        assert!(range.contains(addr("192.0.2.7")));
    }

    #[test]
    fn test_from_network() {
        let range = AddressRange::from_network("10.1.2.0/29".parse().unwrap());
        assert_eq!(range.start(), addr("10.1.2.0"));
        assert_eq!(range.end(), addr("10.1.2.7"));
        assert_eq!(range.size(), 8);

        let range = AddressRange::from_network("10.1.2.3/32".parse().unwrap());
        assert_eq!(range.start(), addr("10.1.2.3"));
        assert_eq!(range.end(), addr("10.1.2.3"));

        let range = AddressRange::from_network("2001:db8::/126".parse().unwrap());
        assert_eq!(range.start(), addr("2001:db8::"));
        assert_eq!(range.end(), addr("2001:db8::3"));

        let range = AddressRange::from_network("::/0".parse().unwrap());
        assert_eq!(range.size(), u128::MAX); // saturated, true count is 2^128
    }

    #[test]
    fn test_contains() {
        let range = AddressRange::new(addr("192.0.2.10"), addr("192.0.2.20")).unwrap();
        assert!(range.contains(addr("192.0.2.10")));
        assert!(range.contains(addr("192.0.2.20")));
        assert!(!range.contains(addr("192.0.2.9")));
        assert!(!range.contains(addr("192.0.2.21")));
        assert!(!range.contains(addr("::ffff:c000:20f"))); // v6-mapped, wrong family
    }

    #[test]
    fn test_display() {
        let range = AddressRange::new(addr("192.0.2.1"), addr("192.0.2.5")).unwrap();
        assert_eq!(range.to_string(), "192.0.2.1-192.0.2.5");
    }

    #[test]
    fn test_offset_reaches_family_top() {
        let start = IpInt::new(addr("255.255.255.253"));
        assert_eq!(IpAddr::from(start.offset(2)), addr("255.255.255.255"));

        let start = IpInt::new(addr("ffff:ffff:ffff:ffff::"));
        assert_eq!(
            IpAddr::from(start.offset(u128::from(u64::MAX))),
            addr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"),
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_round_trip() {
        let range = AddressRange::new(addr("192.0.2.1"), addr("192.0.2.5")).unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":"192.0.2.1","end":"192.0.2.5"}"#);

        let back: AddressRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_invalid_range() {
        let json = r#"{"start":"192.0.2.9","end":"192.0.2.1"}"#;
        assert!(serde_json::from_str::<AddressRange>(json).is_err());
    }
}
