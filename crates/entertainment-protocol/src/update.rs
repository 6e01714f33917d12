//! Per-message channel updates.

use crate::color::LightColor;

/// Maximum number of channels one streaming message may carry.
pub const MAX_CHANNELS: usize = 20;

/// Highest channel id addressable within an entertainment area.
pub const MAX_CHANNEL_ID: u8 = 19;

/// A set of channel color assignments for one streaming message.
///
/// Entries keep insertion order; assigning a channel that is already
/// present replaces its color in place. The bridge only addresses ids
/// `0..=`[`MAX_CHANNEL_ID`] and ignores anything else, so ids are not
/// re-validated here.
///
/// Updates are transient: built by the caller, consumed by the codec,
/// not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUpdate {
    entries: Vec<(u8, LightColor)>,
}

impl ChannelUpdate {
    /// Create an empty update.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Assign a color to a channel.
    pub fn set(&mut self, channel: u8, color: LightColor) -> &mut Self {
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == channel) {
            entry.1 = color;
        } else {
            self.entries.push((channel, color));
        }
        self
    }

    /// Number of channels in this update.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the update carries no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(channel, color)` records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, LightColor)> + '_ {
        self.entries.iter().copied()
    }
}

impl FromIterator<(u8, LightColor)> for ChannelUpdate {
    fn from_iter<I: IntoIterator<Item = (u8, LightColor)>>(iter: I) -> Self {
        let mut update = Self::new();
        for (channel, color) in iter {
            update.set(channel, color);
        }
        update
    }
}
