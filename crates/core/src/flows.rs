//! Tracking Flows
//!
//! A flow snapshot merges the QC, outbound and order records that share a
//! tracking number. The QC family is the anchor: it decides which tracking
//! numbers exist, while the other two stages are optional.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::UserUuid,
    errors::FailureKind,
    orders::{model::OrderUuid, status::ProcessingStatus},
};

/// Largest page a listing may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Which QC family anchors the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Ribbon line, anchored on ribbon QC records.
    Ribbon,
    /// Online line, anchored on online QC records.
    Online,
}

impl FlowKind {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ribbon => "ribbon",
            Self::Online => "online",
        }
    }
}

impl Display for FlowKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ribbon" => Ok(Self::Ribbon),
            "online" => Ok(Self::Online),
            other => Err(FlowError::UnknownKind(other.to_string())),
        }
    }
}

/// Operator who handled a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInfo {
    /// User id.
    pub uuid: UserUuid,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
}

/// Quality-control stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcStage {
    /// QC operator, when the user still exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorInfo>,
    /// When QC happened.
    pub created_at: Timestamp,
}

/// Outbound stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundStage {
    /// Outbound operator, when the user still exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorInfo>,
    /// Carrier label.
    pub expedition: String,
    /// Carrier colour code.
    pub expedition_color: String,
    /// When the parcel was handed over.
    pub created_at: Timestamp,
}

/// Order stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStage {
    /// Order id.
    pub uuid: OrderUuid,
    /// Marketplace reference.
    pub external_id: String,
    /// Current fulfilment stage.
    pub processing_status: ProcessingStatus,
    /// Complaint flag.
    pub complained: bool,
    /// When the order was received.
    pub created_at: Timestamp,
}

/// One section of a snapshot, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage<'a> {
    /// QC section.
    Qc(&'a QcStage),
    /// Outbound section.
    Outbound(&'a OutboundStage),
    /// Order section.
    Order(&'a OrderStage),
}

/// Merged view of one tracking number's journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSnapshot {
    /// Shared tracking number.
    pub tracking: String,

    /// QC section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qc: Option<QcStage>,

    /// Outbound section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound: Option<OutboundStage>,

    /// Order section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderStage>,
}

impl FlowSnapshot {
    /// Assemble a snapshot anchored on a QC record.
    pub fn new(
        tracking: impl Into<String>,
        qc: QcStage,
        outbound: Option<OutboundStage>,
        order: Option<OrderStage>,
    ) -> Self {
        Self {
            tracking: tracking.into(),
            qc: Some(qc),
            outbound,
            order,
        }
    }

    /// Present sections in fixed order: QC, outbound, order.
    pub fn stages(&self) -> impl Iterator<Item = FlowStage<'_>> {
        [
            self.qc.as_ref().map(FlowStage::Qc),
            self.outbound.as_ref().map(FlowStage::Outbound),
            self.order.as_ref().map(FlowStage::Order),
        ]
        .into_iter()
        .flatten()
    }
}

/// Inclusive range of calendar days, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: Option<Date>,
    /// Last day included.
    pub end: Option<Date>,
}

impl DateRange {
    /// Half-open instant bounds: `start 00:00` inclusive, `end + 1 day 00:00`
    /// exclusive.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidDateRange`] if start is after end, or a
    /// bound cannot be represented.
    pub fn bounds(self) -> Result<(Option<Timestamp>, Option<Timestamp>), FlowError> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(FlowError::InvalidDateRange { start, end });
        }

        let lower = self.start.map(start_of_day).transpose()?;

        let upper = self
            .end
            .map(|end| {
                end.tomorrow()
                    .ok()
                    .ok_or(FlowError::DateOutOfRange(end))
                    .and_then(start_of_day)
            })
            .transpose()?;

        Ok((lower, upper))
    }

    /// Whether an instant falls inside the range.
    ///
    /// # Errors
    ///
    /// Same as [`DateRange::bounds`].
    pub fn contains(self, instant: Timestamp) -> Result<bool, FlowError> {
        let (lower, upper) = self.bounds()?;

        Ok(lower.is_none_or(|lower| instant >= lower) && upper.is_none_or(|upper| instant < upper))
    }
}

fn start_of_day(date: Date) -> Result<Timestamp, FlowError> {
    date.to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
        .ok_or(FlowError::DateOutOfRange(date))
}

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Items per page.
    pub size: u32,
}

impl Page {
    /// Validate a page request.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidPage`] for page 0, or
    /// [`FlowError::InvalidPageSize`] outside `1..=100`.
    pub fn new(number: u32, size: u32) -> Result<Self, FlowError> {
        if number == 0 {
            return Err(FlowError::InvalidPage);
        }

        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(FlowError::InvalidPageSize(size));
        }

        Ok(Self { number, size })
    }

    /// Rows to skip.
    pub fn offset(self) -> i64 {
        (i64::from(self.number) - 1) * i64::from(self.size)
    }

    /// Rows to take.
    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Filters applied to the anchor family of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowFilter {
    /// Anchor creation date range.
    #[serde(default)]
    pub dates: DateRange,
    /// Case-insensitive tracking substring.
    #[serde(default)]
    pub search: Option<String>,
}

impl FlowFilter {
    /// `ILIKE` pattern for the search text, with `%`, `_` and `\` escaped so
    /// they match literally. `None` when there is no search text.
    pub fn search_pattern(&self) -> Option<String> {
        let search = self.search.as_deref().map(str::trim)?;

        if search.is_empty() {
            return None;
        }

        let mut pattern = String::with_capacity(search.len() + 2);

        pattern.push('%');

        for ch in search.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }

            pattern.push(ch);
        }

        pattern.push('%');

        Some(pattern)
    }
}

/// One page of reconstructed flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPage {
    /// Snapshots in tracking order.
    pub flows: Vec<FlowSnapshot>,
    /// Distinct anchor tracking numbers matching the filter.
    pub total: u64,
    /// Page that was served.
    pub page: Page,
}

impl FlowPage {
    /// Number of pages needed for `total` items.
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page.size))
    }
}

/// Flow request failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Unknown flow family name.
    #[error("unknown flow kind '{0}', expected 'ribbon' or 'online'")]
    UnknownKind(String),

    /// Page number 0.
    #[error("page must be at least 1")]
    InvalidPage,

    /// Page size outside the allowed range.
    #[error("page size {0} must be between 1 and {MAX_PAGE_SIZE}")]
    InvalidPageSize(u32),

    /// Start date after end date.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        /// Requested start.
        start: Date,
        /// Requested end.
        end: Date,
    },

    /// A date bound cannot be represented as an instant.
    #[error("date {0} is out of range")]
    DateOutOfRange(Date),
}

impl FlowError {
    /// Failure classification.
    pub const fn kind(&self) -> FailureKind {
        FailureKind::ValidationFailed
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    fn qc(created_at: Timestamp) -> QcStage {
        QcStage {
            operator: None,
            created_at,
        }
    }

    #[test]
    fn stages_follow_pipeline_order_and_skip_missing() {
        let snapshot = FlowSnapshot::new(
            "JNE1",
            qc(Timestamp::UNIX_EPOCH),
            None,
            Some(OrderStage {
                uuid: OrderUuid::new(),
                external_id: "G-1".to_string(),
                processing_status: ProcessingStatus::Completed,
                complained: false,
                created_at: Timestamp::UNIX_EPOCH,
            }),
        );

        let stages: Vec<&str> = snapshot
            .stages()
            .map(|stage| match stage {
                FlowStage::Qc(_) => "qc",
                FlowStage::Outbound(_) => "outbound",
                FlowStage::Order(_) => "order",
            })
            .collect();

        assert_eq!(stages, vec!["qc", "order"]);
    }

    #[test]
    fn missing_sections_are_omitted_from_json() -> TestResult {
        let snapshot = FlowSnapshot::new("JNE1", qc(Timestamp::UNIX_EPOCH), None, None);

        let json = serde_json::to_value(&snapshot)?;

        assert!(json.get("qc").is_some(), "anchor section is present");
        assert!(json.get("outbound").is_none(), "absent stages are omitted");
        assert!(json.get("order").is_none(), "absent stages are omitted");

        Ok(())
    }

    #[test]
    fn date_range_covers_whole_end_day() -> TestResult {
        let range = DateRange {
            start: Some(date(2025, 9, 1)),
            end: Some(date(2025, 9, 2)),
        };

        let inside: Timestamp = "2025-09-02T23:59:59Z".parse()?;
        let before: Timestamp = "2025-08-31T23:59:59Z".parse()?;
        let after: Timestamp = "2025-09-03T00:00:00Z".parse()?;

        assert!(range.contains(inside)?, "end day is inclusive");
        assert!(!range.contains(before)?, "days before start are excluded");
        assert!(!range.contains(after)?, "next day is excluded");

        Ok(())
    }

    #[test]
    fn open_range_contains_everything() -> TestResult {
        assert!(DateRange::default().contains(Timestamp::UNIX_EPOCH)?);

        Ok(())
    }

    #[test]
    fn inverted_range_is_rejected() {
        let range = DateRange {
            start: Some(date(2025, 9, 3)),
            end: Some(date(2025, 9, 1)),
        };

        let result = range.bounds();

        assert!(
            matches!(result, Err(FlowError::InvalidDateRange { .. })),
            "expected InvalidDateRange, got {result:?}"
        );
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        let filter = FlowFilter {
            search: Some("50%_a\\b".to_string()),
            ..FlowFilter::default()
        };

        assert_eq!(filter.search_pattern().as_deref(), Some("%50\\%\\_a\\\\b%"));
    }

    #[test]
    fn blank_search_has_no_pattern() {
        let filter = FlowFilter {
            search: Some("   ".to_string()),
            ..FlowFilter::default()
        };

        assert_eq!(filter.search_pattern(), None);
    }

    #[test]
    fn page_bounds() -> TestResult {
        let page = Page::new(3, 20)?;

        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
        assert_eq!(Page::new(0, 10), Err(FlowError::InvalidPage));
        assert_eq!(Page::new(1, 0), Err(FlowError::InvalidPageSize(0)));
        assert_eq!(Page::new(1, 101), Err(FlowError::InvalidPageSize(101)));

        Ok(())
    }

    #[test]
    fn total_pages_rounds_up() -> TestResult {
        let page = FlowPage {
            flows: Vec::new(),
            total: 21,
            page: Page::new(1, 10)?,
        };

        assert_eq!(page.total_pages(), 3);

        Ok(())
    }

    #[test]
    fn kind_parses_lowercase_names() -> TestResult {
        assert_eq!("ribbon".parse::<FlowKind>()?, FlowKind::Ribbon);
        assert_eq!("online".parse::<FlowKind>()?, FlowKind::Online);
        assert!("Ribbon".parse::<FlowKind>().is_err());

        Ok(())
    }
}
