//! Telemetry channels produced by the wristband.

use std::fmt;

/// One telemetry channel kind.
///
/// The set is fixed by the device; [`Channel::ALL`] lists every channel in
/// subscription order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
	/// Three-axis accelerometer.
	Acc,
	/// Blood volume pulse.
	Bvp,
	/// Galvanic skin response.
	Gsr,
	/// Inter-beat interval.
	Ibi,
	/// Skin temperature.
	Tmp,
	/// Battery level.
	Bat,
	/// Tag button presses.
	Tag,
}

impl Channel {
	/// Every known channel, in subscription order.
	pub const ALL: [Channel; 7] = [
		Channel::Acc,
		Channel::Bvp,
		Channel::Gsr,
		Channel::Ibi,
		Channel::Tmp,
		Channel::Bat,
		Channel::Tag,
	];

	/// Wire code used in subscribe commands.
	pub fn code(self) -> &'static str {
		match self {
			Channel::Acc => "acc",
			Channel::Bvp => "bvp",
			Channel::Gsr => "gsr",
			Channel::Ibi => "ibi",
			Channel::Tmp => "tmp",
			Channel::Bat => "bat",
			Channel::Tag => "tag",
		}
	}

	/// Prefix carried by pushed sample lines for this channel.
	pub fn stream_prefix(self) -> &'static str {
		match self {
			Channel::Acc => "E4_Acc",
			Channel::Bvp => "E4_Bvp",
			Channel::Gsr => "E4_Gsr",
			Channel::Ibi => "E4_Ibi",
			Channel::Tmp => "E4_Temperature",
			Channel::Bat => "E4_Battery",
			Channel::Tag => "E4_Tag",
		}
	}

	/// Maps a pushed sample-line prefix back to its channel.
	pub fn from_stream_prefix(prefix: &str) -> Option<Channel> {
		Channel::ALL.into_iter().find(|channel| channel.stream_prefix() == prefix)
	}
}

impl fmt::Display for Channel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn all_channels_have_distinct_codes() {
		for (i, a) in Channel::ALL.iter().enumerate() {
			for b in &Channel::ALL[i + 1..] {
				assert_ne!(a.code(), b.code());
				assert_ne!(a.stream_prefix(), b.stream_prefix());
			}
		}
	}

	#[test]
	fn stream_prefix_round_trips() {
		for channel in Channel::ALL {
			assert_eq!(Channel::from_stream_prefix(channel.stream_prefix()), Some(channel));
		}
		assert_eq!(Channel::from_stream_prefix("E4_Wrist"), None);
	}
}
