//! Typed shape of the aggregated hashtag report.
//!
//! The model is instructed to emit this structure, but it owns the actual
//! text, so the runner returns raw JSON and these types are a best-effort
//! view over it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated research report, keyed by hashtag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagReport {
    pub results: BTreeMap<String, HashtagEntry>,
    /// Hashtag list recovered from the generation task, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
}

impl HashtagReport {
    /// Try to read a parsed pipeline value as a typed report.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Total number of videos across all hashtags.
    pub fn video_count(&self) -> usize {
        self.results.values().map(|entry| entry.videos.len()).sum()
    }
}

/// Videos collected for one hashtag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagEntry {
    pub videos: Vec<VideoReport>,
}

/// One summarized TikTok video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoReport {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub likes: Option<u64>,
    pub creator: CreatorInfo,
    /// 1-2 sentence summary distilled from title, description and captions.
    pub summary: String,
}

/// Creator details attached to a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorInfo {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub followers: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_from_value() {
        let value = json!({
            "results": {
                "cats": {
                    "videos": [{
                        "id": "724",
                        "url": "https://www.tiktok.com/@cat/video/724",
                        "hashtags": ["cats", "funny"],
                        "views": 120000,
                        "likes": 9000,
                        "creator": {
                            "username": "cat",
                            "nickname": null,
                            "followers": null
                        },
                        "summary": "A cat knocks a cup off a table."
                    }]
                },
                "dogs": {"videos": []}
            }
        });

        let report = HashtagReport::from_value(&value).unwrap();
        assert_eq!(report.video_count(), 1);
        let video = &report.results["cats"].videos[0];
        assert_eq!(video.creator.username, "cat");
        assert!(video.creator.nickname.is_none());
        assert_eq!(video.likes, Some(9000));
    }

    #[test]
    fn test_partial_value_is_not_a_report() {
        let value = json!({"hashtags": ["cats"]});
        assert!(HashtagReport::from_value(&value).is_none());

        let value = json!({"error": "Could not parse crew output"});
        assert!(HashtagReport::from_value(&value).is_none());
    }
}
