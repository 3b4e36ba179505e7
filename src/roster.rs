//! Staff roster
//!
//! Operator records, search/group/site filtering and date-ranged
//! unavailability with a reason code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A staff member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: String,
    pub name: String,
    /// Grade (e.g. "CSE", "VF")
    pub rank: String,
    pub qualification: String,
    /// Driving license class, if any
    #[serde(default, rename = "tipoPatente")]
    pub license_type: Option<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
    /// Station the operator belongs to
    #[serde(default, rename = "sede")]
    pub site: Option<String>,
    /// Shift group ("A".."D")
    pub group: String,
    /// Subgroup code within the group (e.g. "A1")
    #[serde(default)]
    pub subgroup: Option<String>,
    #[serde(default)]
    pub assigned_hours: Option<u32>,
    pub available: bool,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl Operator {
    /// Subgroup if set, else the group
    pub fn group_label(&self) -> &str {
        self.subgroup.as_deref().unwrap_or(&self.group)
    }

    /// Status tooltip text
    pub fn status_label(&self) -> &str {
        if self.available {
            "Disponibile"
        } else {
            self.status_message.as_deref().unwrap_or("Indisponibile")
        }
    }

    /// Assigned hours as shown in the roster table ("06h", "00h")
    pub fn hours_label(&self) -> String {
        format!("{:02}h", self.assigned_hours.unwrap_or(0))
    }
}

/// Why an operator is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UnavailabilityReason {
    /// Sick leave
    Indisposizione,
    /// Holiday
    #[default]
    Ferie,
    /// Statutory leave
    Articoli,
}

impl UnavailabilityReason {
    pub const ALL: [UnavailabilityReason; 3] = [
        UnavailabilityReason::Indisposizione,
        UnavailabilityReason::Ferie,
        UnavailabilityReason::Articoli,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailabilityReason::Indisposizione => "Indisposizione",
            UnavailabilityReason::Ferie => "Ferie",
            UnavailabilityReason::Articoli => "Articoli",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_str().eq_ignore_ascii_case(s))
    }
}

/// Unavailability over an inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailability {
    pub reason: UnavailabilityReason,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Unavailability {
    pub fn new(reason: UnavailabilityReason, start: NaiveDate, end: NaiveDate) -> Self {
        Self { reason, start, end }
    }

    /// Single-day unavailability (the form's initial state)
    pub fn on(reason: UnavailabilityReason, day: NaiveDate) -> Self {
        Self::new(reason, day, day)
    }

    /// `"FERIE (01/05/2024 - 03/05/2024)"`
    pub fn status_message(&self) -> String {
        format!(
            "{} ({} - {})",
            self.reason.as_str().to_uppercase(),
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Group selector; `All` matches everyone
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupFilter {
    #[default]
    All,
    /// Matches operators whose subgroup equals the code
    Code(String),
}

/// Site selector; `All` matches everyone
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteFilter {
    #[default]
    All,
    Name(String),
}

/// Roster table filters. An operator must match all three.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterFilter {
    /// Case-insensitive substring of name or id; empty matches everyone
    pub search: String,
    pub group: GroupFilter,
    pub site: SiteFilter,
}

impl RosterFilter {
    pub fn matches(&self, op: &Operator) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = op.name.to_lowercase().contains(&needle)
            || op.id.to_lowercase().contains(&needle);

        let matches_group = match &self.group {
            GroupFilter::All => true,
            GroupFilter::Code(code) => op.subgroup.as_deref() == Some(code.as_str()),
        };

        let matches_site = match &self.site {
            SiteFilter::All => true,
            SiteFilter::Name(name) => op.site.as_deref() == Some(name.as_str()),
        };

        matches_search && matches_group && matches_site
    }
}

/// All operators, in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub operators: Vec<Operator>,
}

impl Roster {
    pub fn new(operators: Vec<Operator>) -> Self {
        Self { operators }
    }

    pub fn get(&self, id: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id == id)
    }

    /// Operators passing `filter`, keeping roster order
    pub fn filtered(&self, filter: &RosterFilter) -> Vec<&Operator> {
        self.operators.iter().filter(|op| filter.matches(op)).collect()
    }

    /// Mark operator `id` unavailable: clears assigned hours and sets the
    /// status message. Returns false if no such operator.
    pub fn mark_unavailable(&mut self, id: &str, unavailability: &Unavailability) -> bool {
        let Some(op) = self.operators.iter_mut().find(|op| op.id == id) else {
            log::warn!("Operator {id} not found");
            return false;
        };

        op.available = false;
        op.assigned_hours = Some(0);
        op.status_message = Some(unavailability.status_message());
        log::info!("Operator {} marked unavailable: {}", op.id, unavailability.status_message());
        true
    }

    /// Distinct sites, sorted
    pub fn sites(&self) -> Vec<&str> {
        let mut sites: Vec<&str> = self
            .operators
            .iter()
            .filter_map(|op| op.site.as_deref())
            .collect();
        sites.sort_unstable();
        sites.dedup();
        sites
    }

    pub fn available_count(&self) -> usize {
        self.operators.iter().filter(|op| op.available).count()
    }
}
