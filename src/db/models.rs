//! Database row types for PostgreSQL
//!
//! These types map directly to database rows and convert into the API
//! response types in models/.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::catalog::{parse_quality, Category, Channel, VodItem};
use crate::models::epg::EpgProgram;

/// Channel row, with the category name joined in for display
#[derive(Debug, Clone, FromRow)]
pub struct ChannelRow {
    pub id: i32,
    pub name: String,
    pub logo_url: Option<String>,
    pub stream_url: String,
    pub quality: String,
    pub language: Option<String>,
    pub country: Option<String>,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<ChannelRow> for Channel {
    fn from(row: ChannelRow) -> Self {
        Channel {
            id: row.id,
            name: row.name,
            logo_url: row.logo_url,
            stream_url: row.stream_url,
            quality: parse_quality(&row.quality),
            language: row.language,
            country: row.country,
            category_id: row.category_id,
            category_name: row.category_name,
            is_active: row.is_active,
            sort_order: row.sort_order,
        }
    }
}

/// VOD content row (movie or series)
#[derive(Debug, Clone, FromRow)]
pub struct VodRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub stream_url: String,
    pub content_type: String,
    pub year: Option<i32>,
    pub duration_minutes: Option<i32>,
    pub genre: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
}

impl From<VodRow> for VodItem {
    fn from(row: VodRow) -> Self {
        use crate::models::catalog::ContentKind;

        VodItem {
            id: row.id,
            title: row.title,
            description: row.description,
            cover_url: row.cover_url,
            stream_url: row.stream_url,
            // constrained by CHECK (content_type IN ('movie', 'series'))
            content_type: match row.content_type.as_str() {
                "series" => ContentKind::Series,
                _ => ContentKind::Movie,
            },
            year: row.year,
            duration_minutes: row.duration_minutes,
            genre: row.genre,
            is_featured: row.is_featured,
            is_active: row.is_active,
        }
    }
}

/// Category row
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            sort_order: row.sort_order,
            is_active: row.is_active,
        }
    }
}

/// EPG program row, with the channel name joined in
#[derive(Debug, Clone, FromRow)]
pub struct EpgProgramRow {
    pub id: i32,
    pub channel_id: i32,
    pub channel_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub classification: Option<String>,
}

impl From<EpgProgramRow> for EpgProgram {
    fn from(row: EpgProgramRow) -> Self {
        EpgProgram {
            id: row.id,
            channel_id: row.channel_id,
            channel_name: row.channel_name,
            title: row.title,
            description: row.description,
            category: row.category,
            start_time: row.start_time,
            end_time: row.end_time,
            classification: row.classification,
        }
    }
}

/// Resolved stream origin for the proxy gateway
#[derive(Debug, Clone, FromRow)]
pub struct StreamSourceRow {
    pub stream_url: String,
    pub is_active: bool,
}
