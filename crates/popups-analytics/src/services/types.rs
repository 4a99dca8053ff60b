use std::fmt;
use std::str::FromStr;

use popups_entities::{popup_variants, popups, DeviceType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AnalyticsError;

/// Counter bumped by an analytics event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsEventKind {
    View,
    Click,
    Conversion,
}

impl AnalyticsEventKind {
    pub const ALL: [AnalyticsEventKind; 3] = [
        AnalyticsEventKind::View,
        AnalyticsEventKind::Click,
        AnalyticsEventKind::Conversion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsEventKind::View => "view",
            AnalyticsEventKind::Click => "click",
            AnalyticsEventKind::Conversion => "conversion",
        }
    }
}

impl FromStr for AnalyticsEventKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(AnalyticsEventKind::View),
            "click" => Ok(AnalyticsEventKind::Click),
            "conversion" => Ok(AnalyticsEventKind::Conversion),
            other => Err(AnalyticsError::UnsupportedEvent(other.to_string())),
        }
    }
}

impl fmt::Display for AnalyticsEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping key for top-N rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsDimension {
    Devices,
    Pages,
    Variants,
}

impl AnalyticsDimension {
    pub const ALL: [AnalyticsDimension; 3] = [
        AnalyticsDimension::Devices,
        AnalyticsDimension::Pages,
        AnalyticsDimension::Variants,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsDimension::Devices => "devices",
            AnalyticsDimension::Pages => "pages",
            AnalyticsDimension::Variants => "variants",
        }
    }
}

impl FromStr for AnalyticsDimension {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devices" => Ok(AnalyticsDimension::Devices),
            "pages" => Ok(AnalyticsDimension::Pages),
            "variants" => Ok(AnalyticsDimension::Variants),
            other => Err(AnalyticsError::UnsupportedDimension(other.to_string())),
        }
    }
}

impl fmt::Display for AnalyticsDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an event happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsEvent {
    pub variant_id: i32,
    pub page_url: String,
    pub device_type: DeviceType,
}

/// One row of a top-N ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TopEntry {
    /// Device type, page URL or variant id depending on the dimension
    pub key: String,
    pub total_views: i64,
    pub total_clicks: i64,
    pub total_conversions: i64,
    /// views + clicks + conversions
    pub total_engagement: i64,
}

impl TopEntry {
    pub fn new(key: String, total_views: i64, total_clicks: i64, total_conversions: i64) -> Self {
        Self {
            key,
            total_views,
            total_clicks,
            total_conversions,
            total_engagement: total_views + total_clicks + total_conversions,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CounterTotals {
    pub views: i64,
    pub clicks: i64,
    pub conversions: i64,
}

impl CounterTotals {
    pub fn add(&mut self, views: i64, clicks: i64, conversions: i64) {
        self.views += views;
        self.clicks += clicks;
        self.conversions += conversions;
    }

    pub fn conversion_rate(&self) -> f64 {
        percentage(self.conversions, self.views)
    }

    pub fn click_through_rate(&self) -> f64 {
        percentage(self.clicks, self.views)
    }

    /// Every view that did not convert counts as a bounce; clicks are ignored.
    pub fn bounce_rate(&self) -> f64 {
        let bounces = self.views - self.conversions.min(self.views);
        percentage(bounces, self.views)
    }
}

/// `part / whole * 100` clamped to `[0, 100]`, 0 when `whole` is 0
fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 * 100.0 / whole as f64).clamp(0.0, 100.0)
}

/// Rates of one variant within a popup report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRate {
    pub popup: popups::Model,
    pub variant: popup_variants::Model,
    pub conversion_rate: f64,
    pub click_through_rate: f64,
    pub bounce_rate: f64,
    pub totals: CounterTotals,
}

impl VariantRate {
    pub fn new(popup: popups::Model, variant: popup_variants::Model, totals: CounterTotals) -> Self {
        Self {
            popup,
            variant,
            conversion_rate: totals.conversion_rate(),
            click_through_rate: totals.click_through_rate(),
            bounce_rate: totals.bounce_rate(),
            totals,
        }
    }
}
