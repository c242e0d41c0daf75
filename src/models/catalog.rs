use serde::{Deserialize, Serialize};

/// Stream quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "SD")]
    Sd,
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "4K")]
    FourK,
}

impl Default for Quality {
    fn default() -> Self {
        Self::Sd
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Sd => write!(f, "SD"),
            Quality::Hd => write!(f, "HD"),
            Quality::FourK => write!(f, "4K"),
        }
    }
}

/// Parse a quality string from the database (constrained by CHECK)
pub fn parse_quality(raw: &str) -> Quality {
    match raw {
        "4K" => Quality::FourK,
        "HD" => Quality::Hd,
        _ => Quality::Sd,
    }
}

/// Kind of catalog content a favorite or history row points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Channel,
    Movie,
    Series,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Channel => write!(f, "channel"),
            ContentKind::Movie => write!(f, "movie"),
            ContentKind::Series => write!(f, "series"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "channel" => Ok(ContentKind::Channel),
            "movie" => Ok(ContentKind::Movie),
            "series" => Ok(ContentKind::Series),
            _ => Err(()),
        }
    }
}

/// Live channel as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub stream_url: String,
    pub quality: Quality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// VOD content (movie or series) as served to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VodItem {
    pub id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub stream_url: String,
    pub content_type: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Minutes; movies only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
}

/// Category used as a filter dimension and display label
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_quality_serde_names() {
        assert_eq!(serde_json::to_string(&Quality::FourK).unwrap(), "\"4K\"");
        assert_eq!(serde_json::to_string(&Quality::Hd).unwrap(), "\"HD\"");
        assert_eq!(parse_quality("4K"), Quality::FourK);
        assert_eq!(parse_quality("SD"), Quality::Sd);
    }

    #[test]
    fn test_content_kind_roundtrip() {
        assert_eq!(ContentKind::from_str("movie").unwrap(), ContentKind::Movie);
        assert_eq!(ContentKind::Series.to_string(), "series");
        assert!(ContentKind::from_str("album").is_err());
    }
}
