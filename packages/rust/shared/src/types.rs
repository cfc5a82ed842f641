//! Record types produced by each pipeline stage.
//!
//! Every stage persists its records as a JSON array with camelCase keys.
//! Records are created once by their owning stage and never mutated after
//! being written; later stages build new values from them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BasicRecord
// ---------------------------------------------------------------------------

/// Identity record collected from the listing pages.
///
/// `url` and `image` are mandatory; entries without them are skipped by the
/// listing parser. `url` identifies the record within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicRecord {
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Detail page URL.
    pub url: String,
    /// Avatar image URL.
    pub image: String,
    /// Agency or group the persona belongs to.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub affiliation: String,
}

// ---------------------------------------------------------------------------
// DetailRecord
// ---------------------------------------------------------------------------

/// A [`BasicRecord`] extended with the fields scraped from its detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    #[serde(flatten)]
    pub basic: BasicRecord,

    /// YouTube channel id; empty when no channel was found.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub youtube: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nicknames: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debut_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zodiac_sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oshi_mark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Hashtag used for live streams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_tag: Option<String>,
    /// Hashtag used for fan art.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_tag: Option<String>,
    /// Hashtag used for the fan community.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_tag: Option<String>,
    /// Every other hashtag, including duplicates of the three kinds above.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_tags: Vec<String>,

    /// Twitter/X handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl DetailRecord {
    /// Start a detail record with no scraped fields yet.
    pub fn from_basic(basic: BasicRecord) -> Self {
        Self {
            basic,
            ..Default::default()
        }
    }

    /// The channel join key, or `None` when no channel was found.
    pub fn channel_key(&self) -> Option<&str> {
        if self.youtube.is_empty() {
            None
        } else {
            Some(&self.youtube)
        }
    }
}

// ---------------------------------------------------------------------------
// ChannelMetadata / EnrichedRecord
// ---------------------------------------------------------------------------

/// Channel details attached by the youtube stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMetadata {
    /// Channel display name.
    #[serde(rename = "youtubeName")]
    pub display_name: String,
    /// High-resolution channel thumbnail URL.
    #[serde(rename = "youtubeThumbnail")]
    pub thumbnail_url: String,
    /// Channel handle (e.g. `@example`).
    #[serde(rename = "youtubeHandle")]
    pub handle: String,
}

/// A [`DetailRecord`] with channel metadata merged on when a match exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub detail: DetailRecord,
    #[serde(flatten)]
    pub channel: Option<ChannelMetadata>,
}
