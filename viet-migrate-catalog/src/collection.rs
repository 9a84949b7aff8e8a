//! Collection identifiers and their per-collection migration rules.
//!
//! This enum centralizes everything that differs between collections (source
//! file, destination table, write strategy, record reshaping) so the migrator
//! itself stays collection-agnostic.

use serde_json::{Value, json};

use crate::normalize::{Record, is_unset, normalize};

/// A named set of like-shaped records stored as one JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Announcements,
    News,
    Ticker,
    Events,
    TransportRoutes,
    Carousel,
    PlacementCarousel,
    HeroVideos,
    Departments,
    Faculty,
    Hods,
    Gallery,
    PlacementSection,
    Recruiters,
    HomeGallery,
    VibeAtViet,
    Pages,
    DepartmentPages,
    IntroVideo,
}

/// All collections in migration order.
const ALL_COLLECTIONS: &[Collection] = &[
    Collection::Users,
    Collection::Announcements,
    Collection::News,
    Collection::Ticker,
    Collection::Events,
    Collection::TransportRoutes,
    Collection::Carousel,
    Collection::PlacementCarousel,
    Collection::HeroVideos,
    Collection::Departments,
    Collection::Faculty,
    Collection::Hods,
    Collection::Gallery,
    Collection::PlacementSection,
    Collection::Recruiters,
    Collection::HomeGallery,
    Collection::VibeAtViet,
    Collection::Pages,
    Collection::DepartmentPages,
    Collection::IntroVideo,
];

/// How records of a collection are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Every record becomes a new row. Re-running duplicates rows.
    Insert,
    /// Write-or-replace keyed on a business field.
    Upsert { key: &'static str },
    /// At most one row: update the existing row, otherwise insert.
    Singleton,
}

/// Top-level layout of a collection's JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// An array of records.
    List,
    /// A single object.
    Object,
    /// An object mapping slug to page content.
    SlugMap,
}

/// Columns kept for the pages collection, with the raw field consulted when
/// the normalized one is missing. Everything else is legacy.
const PAGE_FIELDS: &[(&str, &str)] = &[
    ("slug", "slug"),
    ("title", "title"),
    ("route", "route"),
    ("category", "category"),
    ("content", "content"),
    ("created_at", "createdAt"),
    ("updated_at", "updatedAt"),
];

/// Transport columns re-derived from the raw camelCase field when missing.
const TRANSPORT_FALLBACKS: &[(&str, &str)] = &[
    ("bus_no", "busNo"),
    ("driver_name", "driverName"),
    ("driver_contact_no", "driverContactNo"),
    ("seating_capacity", "seatingCapacity"),
];

const DEFAULT_BUTTON_TEXT: &str = "Apply Now";

impl Collection {
    /// Source name, also the JSON file stem and CLI identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Announcements => "announcements",
            Self::News => "news",
            Self::Ticker => "ticker",
            Self::Events => "events",
            Self::TransportRoutes => "transport-routes",
            Self::Carousel => "carousel",
            Self::PlacementCarousel => "placement-carousel",
            Self::HeroVideos => "hero-videos",
            Self::Departments => "departments",
            Self::Faculty => "faculty",
            Self::Hods => "hods",
            Self::Gallery => "gallery",
            Self::PlacementSection => "placement-section",
            Self::Recruiters => "recruiters",
            Self::HomeGallery => "home-gallery",
            Self::VibeAtViet => "vibe-at-viet",
            Self::Pages => "pages",
            Self::DepartmentPages => "department-pages",
            Self::IntroVideo => "intro-video",
        }
    }

    /// Human-readable name used in log lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Announcements => "Announcements",
            Self::News => "News",
            Self::Ticker => "Ticker items",
            Self::Events => "Events",
            Self::TransportRoutes => "Transport routes",
            Self::Carousel => "Carousel images",
            Self::PlacementCarousel => "Placement carousel images",
            Self::HeroVideos => "Hero videos",
            Self::Departments => "Departments",
            Self::Faculty => "Faculty",
            Self::Hods => "HODs",
            Self::Gallery => "Gallery images",
            Self::PlacementSection => "Placement section",
            Self::Recruiters => "Recruiters",
            Self::HomeGallery => "Home gallery images",
            Self::VibeAtViet => "Vibe at VIET",
            Self::Pages => "Pages",
            Self::DepartmentPages => "Department pages",
            Self::IntroVideo => "Intro video settings",
        }
    }

    /// Source file name inside the data directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Destination table.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Announcements => "announcements",
            Self::News => "news",
            Self::Ticker => "ticker_items",
            Self::Events => "events",
            Self::TransportRoutes => "transport_routes",
            Self::Carousel => "carousel_images",
            Self::PlacementCarousel => "placement_carousel_images",
            Self::HeroVideos => "hero_videos",
            Self::Departments => "departments",
            Self::Faculty => "faculty",
            Self::Hods => "hods",
            Self::Gallery => "gallery_images",
            Self::PlacementSection => "placement_section",
            Self::Recruiters => "recruiters",
            Self::HomeGallery => "home_gallery_images",
            Self::VibeAtViet => "vibe_at_viet",
            Self::Pages => "pages",
            Self::DepartmentPages => "department_pages",
            Self::IntroVideo => "intro_video_settings",
        }
    }

    pub fn strategy(&self) -> WriteStrategy {
        match self {
            Self::Users => WriteStrategy::Upsert { key: "email" },
            Self::Pages | Self::DepartmentPages => WriteStrategy::Upsert { key: "slug" },
            Self::PlacementSection | Self::IntroVideo => WriteStrategy::Singleton,
            _ => WriteStrategy::Insert,
        }
    }

    pub fn shape(&self) -> SourceShape {
        match self {
            Self::PlacementSection | Self::IntroVideo => SourceShape::Object,
            Self::DepartmentPages => SourceShape::SlugMap,
            _ => SourceShape::List,
        }
    }

    /// Turn one source record into the row handed to the destination.
    ///
    /// `index` is the record's position in the source array (0 for singletons).
    /// The source-local `id` never survives.
    pub fn prepare(&self, index: usize, original: &Record) -> Record {
        let mut row = normalize(original);
        row.remove("id");

        match self {
            Self::TransportRoutes => {
                for (column, raw) in TRANSPORT_FALLBACKS {
                    if let Some(value) = fallback(&row, original, column, raw) {
                        row.insert(column.to_string(), value);
                    }
                }
            }
            Self::HeroVideos => {
                set_default(&mut row, "button_text", Value::from(DEFAULT_BUTTON_TEXT));
                set_default(&mut row, "order", Value::from(0));
            }
            Self::HomeGallery => {
                set_default(&mut row, "order", Value::from(index));
            }
            Self::Pages => {
                row = PAGE_FIELDS
                    .iter()
                    .filter_map(|(column, raw)| {
                        fallback(&row, original, column, raw)
                            .map(|value| (column.to_string(), value))
                    })
                    .collect();
            }
            _ => {}
        }

        row
    }

    /// All collections in the order the driver migrates them.
    pub fn all() -> &'static [Collection] {
        ALL_COLLECTIONS
    }
}

/// Insert `value` under `column` when the row has no value there or holds `null`.
fn set_default(row: &mut Record, column: &str, value: Value) {
    if is_unset(row.get(column)) {
        row.insert(column.to_string(), value);
    }
}

/// The normalized value of `column`, else the raw source field `raw`.
///
/// A raw value only replaces a missing or `null` column; an explicit `null`
/// with no raw replacement is kept.
fn fallback(row: &Record, original: &Record, column: &str, raw: &str) -> Option<Value> {
    let normalized = row.get(column);
    normalized
        .filter(|v| !v.is_null())
        .or_else(|| original.get(raw).filter(|v| !v.is_null()))
        .or(normalized)
        .cloned()
}

/// Build a department-page row from one entry of the slug map.
///
/// The nested structures are stored verbatim, with structural defaults when
/// the entry lacks them or holds `null`.
pub fn department_page_record(slug: &str, entry: &Record) -> Record {
    let field = |name: &str, default: Value| {
        entry
            .get(name)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or(default)
    };

    let mut row = Record::new();
    row.insert("slug".to_string(), Value::from(slug));
    row.insert("sections".to_string(), field("sections", json!({})));
    row.insert(
        "curriculum".to_string(),
        field("curriculum", json!({ "programs": [] })),
    );
    row
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string does not name a collection.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown collection: '{0}'")]
pub struct CollectionParseError(pub String);

impl std::str::FromStr for Collection {
    type Err = CollectionParseError;

    /// Parse a collection from its source name (case-insensitive).
    ///
    /// Underscores are accepted in place of dashes, so table-style names work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ALL_COLLECTIONS
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| CollectionParseError(s.to_string()))
    }
}
