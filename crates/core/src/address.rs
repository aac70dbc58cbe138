//! BTLE hardware address of a wearable device.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Stable identifier naming the target wearable on the wireless transport.
///
/// Normalized to uppercase colon-separated octets on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress(String);

impl DeviceAddress {
	/// Returns the normalized address string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DeviceAddress {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for DeviceAddress {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let octets: Vec<&str> = s.split(':').collect();
		let well_formed = octets.len() == 6
			&& octets
				.iter()
				.all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()));

		if well_formed {
			Ok(DeviceAddress(s.to_ascii_uppercase()))
		} else {
			Err(Error::InvalidAddress(s.to_string()))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_and_normalizes_valid_address() {
		let address: DeviceAddress = "2c:11:65:5a:6f:33".parse().unwrap();
		assert_eq!(address.as_str(), "2C:11:65:5A:6F:33");
	}

	#[test]
	fn rejects_malformed_addresses() {
		assert!("".parse::<DeviceAddress>().is_err());
		assert!("2C:11:65:5A:6F".parse::<DeviceAddress>().is_err());
		assert!("2C:11:65:5A:6F:3".parse::<DeviceAddress>().is_err());
		assert!("2C:11:65:5A:6F:ZZ".parse::<DeviceAddress>().is_err());
		assert!("2C-11-65-5A-6F-33".parse::<DeviceAddress>().is_err());
	}
}
