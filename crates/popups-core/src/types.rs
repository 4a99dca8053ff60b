//! Shared datetime aliases

use chrono::{DateTime, Utc};

/// Database DateTime type used for every `TIMESTAMPTZ` column
pub type DBDateTime = DateTime<Utc>;

