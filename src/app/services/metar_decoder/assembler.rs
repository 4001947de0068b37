//! Record assembly
//!
//! Runs the extractors over every group of a report and merges the results
//! into one [`DecodedReport`]. Decoding never fails: groups that cannot be used
//! are reported as [`GroupDiagnostic`]s and the affected field stays unknown.

use super::extractors::{self, FieldKind, Group, TimeGroup};
use super::tokenizer::{self, Token};
use crate::app::models::{
    CloudLayer, DecodedReport, Phenomenon, ReportKind, StationId, Visibility, Wind, WindVariation,
};
use crate::constants::{IGNORED_GROUPS, MAX_CLOUD_LAYERS, TERMINATING_GROUPS};
use crate::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// =============================================================================
// Decode Context
// =============================================================================

/// Caller-supplied context for resolving what a report leaves implicit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    /// Date used to resolve the report's day-of-month into a full date
    pub reference_date: NaiveDate,

    /// Station assumed when the report carries no identifier
    pub station_hint: Option<StationId>,
}

impl DecodeContext {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            station_hint: None,
        }
    }

    /// Set the station hint
    pub fn with_station_hint(mut self, station: StationId) -> Self {
        self.station_hint = Some(station);
        self
    }

    /// Parse and set the station hint; an invalid identifier is a usage error
    pub fn with_station(self, station: &str) -> Result<Self> {
        Ok(self.with_station_hint(StationId::parse(station)?))
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Why a group did not contribute to the decoded record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupIssue {
    /// Matches no known grammar
    Unrecognized,

    /// Shaped like a field's grammar but invalid; that field stays unknown
    Malformed(FieldKind),

    /// A second group for a single-valued field; the first one is kept
    Duplicate(FieldKind),

    /// A cloud layer beyond the three-layer limit
    Truncated,

    /// A cloud layer in a report that also reports CAVOK
    AfterCavok,
}

impl fmt::Display for GroupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrecognized => f.write_str("unrecognized group"),
            Self::Malformed(field) => write!(f, "malformed {} group", field),
            Self::Duplicate(field) => write!(f, "duplicate {} group", field),
            Self::Truncated => write!(f, "cloud layer beyond the first {}", MAX_CLOUD_LAYERS),
            Self::AfterCavok => f.write_str("cloud layer with CAVOK"),
        }
    }
}

/// A note about one group of the decoded report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDiagnostic {
    pub position: usize,
    pub token: String,
    pub issue: GroupIssue,
}

/// A decoded report together with the notes produced while decoding it
#[derive(Debug, Clone, PartialEq)]
pub struct Decoding {
    pub report: DecodedReport,
    pub diagnostics: Vec<GroupDiagnostic>,
}

// =============================================================================
// Decoder
// =============================================================================

/// METAR/SPECI report decoder
///
/// Holds no state; one decoder can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a report, discarding diagnostics
    pub fn decode(&self, raw: &str, context: &DecodeContext) -> DecodedReport {
        self.decode_with_diagnostics(raw, context).report
    }

    /// Decode a report and return the diagnostics for groups that were not used
    pub fn decode_with_diagnostics(&self, raw: &str, context: &DecodeContext) -> Decoding {
        let tokens = tokenizer::tokenize(raw);
        let mut assembly = Assembly::new(context);

        let mut index = assembly.read_header(&tokens);
        while index < tokens.len() {
            let token = tokens[index];
            let group = token.group();

            if TERMINATING_GROUPS.contains(&group) {
                break;
            }

            if group.is_empty() || IGNORED_GROUPS.contains(&group) {
                index += 1;
                continue;
            }

            if let Some(time) = extractors::extract_time_group(group) {
                assembly.apply_time(token, time);
                index += 1;
                continue;
            }

            // Mixed-number visibility spans two groups ("1 1/2SM")
            if let Some(next) = tokens.get(index + 1) {
                if let Some(visibility) = extractors::extract_mixed_visibility(group, next.group())
                {
                    assembly.apply(token, Group::Visibility(visibility));
                    index += 2;
                    continue;
                }
            }

            match extractors::classify_group(group) {
                Some(recognized) => assembly.apply(token, recognized),
                None => {
                    let issue = extractors::malformed_field(group)
                        .map(GroupIssue::Malformed)
                        .unwrap_or(GroupIssue::Unrecognized);
                    assembly.note(token, issue);
                }
            }
            index += 1;
        }

        let decoding = assembly.finish(raw);
        for diagnostic in &decoding.diagnostics {
            debug!(
                "Group {} '{}' not used: {}",
                diagnostic.position, diagnostic.token, diagnostic.issue
            );
        }
        decoding
    }
}

/// Resolve a report's day/hour/minute against a reference date
///
/// The result is the latest date with that day-of-month that is not more
/// than one day after the reference date, looking back at most two months.
/// Out-of-range values resolve to `None`.
pub fn resolve_report_time(reference: NaiveDate, time: TimeGroup) -> Option<NaiveDateTime> {
    let time_of_day = NaiveTime::from_hms_opt(time.hour, time.minute, 0)?;
    let latest = reference.succ_opt().unwrap_or(reference);

    let (mut year, mut month) = (reference.year(), reference.month());
    for _ in 0..3 {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, time.day) {
            if date <= latest {
                return Some(date.and_time(time_of_day));
            }
        }
        (year, month) = if month == 1 {
            (year - 1, 12)
        } else {
            (year, month - 1)
        };
    }

    None
}

// =============================================================================
// Assembly State
// =============================================================================

/// Fields collected so far for one report
struct Assembly<'c> {
    context: &'c DecodeContext,
    kind: ReportKind,
    station_id: Option<StationId>,
    report_time: Option<NaiveDateTime>,
    time_seen: bool,
    wind: Option<Wind>,
    variation: Option<(usize, String, WindVariation)>,
    visibility: Option<Visibility>,
    temperature_seen: bool,
    temperature: Option<i16>,
    dewpoint: Option<i16>,
    phenomena: Vec<Phenomenon>,
    cloud_layers: Vec<(usize, String, CloudLayer)>,
    cavok: bool,
    diagnostics: Vec<GroupDiagnostic>,
}

impl<'c> Assembly<'c> {
    fn new(context: &'c DecodeContext) -> Self {
        Self {
            context,
            kind: ReportKind::Routine,
            station_id: None,
            report_time: None,
            time_seen: false,
            wind: None,
            variation: None,
            visibility: None,
            temperature_seen: false,
            temperature: None,
            dewpoint: None,
            phenomena: Vec::new(),
            cloud_layers: Vec::new(),
            cavok: false,
            diagnostics: Vec::new(),
        }
    }

    /// Read the report type marker and station identifier; returns the index
    /// of the first body group
    fn read_header(&mut self, tokens: &[Token<'_>]) -> usize {
        let mut index = 0;
        let mut marked = false;
        while let Some(kind) = tokens
            .get(index)
            .and_then(|t| ReportKind::from_marker(t.group()))
        {
            self.kind = kind;
            marked = true;
            index += 1;
        }

        // "METAR COR VVCS ..."
        while tokens
            .get(index)
            .is_some_and(|t| IGNORED_GROUPS.contains(&t.group()))
        {
            index += 1;
        }

        if let Some(token) = tokens.get(index) {
            let group = token.group();
            // Identifiers such as SNBR or SADZ also match the weather grammar;
            // in the leading slot they are stations when a marker precedes
            // them or the time group follows.
            let followed_by_time = tokens
                .get(index + 1)
                .is_some_and(|next| extractors::extract_time_group(next.group()).is_some());
            let is_station = StationId::is_valid(group)
                && (marked
                    || followed_by_time
                    || extractors::classify_group(group).is_none())
                && !TERMINATING_GROUPS.contains(&group)
                && !IGNORED_GROUPS.contains(&group);
            if is_station {
                self.station_id = StationId::parse(group).ok();
                index += 1;
            }
        }

        index
    }

    fn note(&mut self, token: Token<'_>, issue: GroupIssue) {
        self.diagnostics.push(GroupDiagnostic {
            position: token.position,
            token: token.text.to_string(),
            issue,
        });
    }

    fn apply_time(&mut self, token: Token<'_>, time: TimeGroup) {
        if self.time_seen {
            self.note(token, GroupIssue::Duplicate(FieldKind::Time));
            return;
        }

        self.time_seen = true;
        self.report_time = resolve_report_time(self.context.reference_date, time);
        if self.report_time.is_none() {
            self.note(token, GroupIssue::Malformed(FieldKind::Time));
        }
    }

    fn apply(&mut self, token: Token<'_>, group: Group) {
        let field = group.field();
        match group {
            Group::Wind(wind) => {
                if self.wind.is_some() {
                    self.note(token, GroupIssue::Duplicate(field));
                } else {
                    self.wind = Some(wind);
                }
            }
            Group::WindVariation(variation) => {
                if self.variation.is_some() {
                    self.note(token, GroupIssue::Duplicate(field));
                } else {
                    self.variation = Some((token.position, token.text.to_string(), variation));
                }
            }
            Group::Visibility(visibility) => {
                if self.visibility.is_some() {
                    self.note(token, GroupIssue::Duplicate(field));
                    return;
                }
                self.visibility = Some(visibility);
                if visibility == Visibility::Unlimited {
                    self.cavok = true;
                    for (position, text, _) in std::mem::take(&mut self.cloud_layers) {
                        self.diagnostics.push(GroupDiagnostic {
                            position,
                            token: text,
                            issue: GroupIssue::AfterCavok,
                        });
                    }
                }
            }
            Group::Temperature {
                temperature,
                dewpoint,
            } => {
                if self.temperature_seen {
                    self.note(token, GroupIssue::Duplicate(field));
                } else {
                    self.temperature_seen = true;
                    self.temperature = temperature;
                    self.dewpoint = dewpoint;
                }
            }
            Group::Cloud(layer) => {
                if self.cavok {
                    self.note(token, GroupIssue::AfterCavok);
                } else if self.cloud_layers.len() >= MAX_CLOUD_LAYERS {
                    self.note(token, GroupIssue::Truncated);
                } else {
                    self.cloud_layers
                        .push((token.position, token.text.to_string(), layer));
                }
            }
            Group::Weather(phenomenon) => self.phenomena.push(phenomenon),
        }
    }

    fn finish(mut self, raw: &str) -> Decoding {
        let mut wind = self.wind;
        match (wind.as_mut(), self.variation.take()) {
            (Some(wind), Some((_, _, variation))) => wind.variation = Some(variation),
            (None, Some((position, token, _))) => self.diagnostics.push(GroupDiagnostic {
                position,
                token,
                issue: GroupIssue::Malformed(FieldKind::WindVariation),
            }),
            _ => {}
        }

        self.diagnostics.sort_by_key(|d| d.position);

        let report = DecodedReport {
            kind: self.kind,
            report_time: self.report_time,
            station_id: self
                .station_id
                .or_else(|| self.context.station_hint.clone()),
            raw_text: raw.to_string(),
            wind,
            visibility: self.visibility,
            temperature: self.temperature,
            dewpoint: self.dewpoint,
            present_weather: self.phenomena,
            cloud_layers: self
                .cloud_layers
                .into_iter()
                .map(|(_, _, layer)| layer)
                .collect(),
        };

        Decoding {
            report,
            diagnostics: self.diagnostics,
        }
    }
}
