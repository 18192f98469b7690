//! Status filters for contract listings.
//!
//! Filtering is a pure projection over statuses. It never mutates and has
//! no error path.

use crate::{Contract, ContractStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Anything that carries a contract status and can therefore be filtered.
pub trait HasStatus {
    fn status(&self) -> ContractStatus;
}

impl HasStatus for Contract {
    fn status(&self) -> ContractStatus {
        Contract::status(self)
    }
}

impl<T: HasStatus + ?Sized> HasStatus for &T {
    fn status(&self) -> ContractStatus {
        (**self).status()
    }
}

/// Which statuses a listing should keep.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Keep everything
    #[default]
    All,
    /// Keep only members of the set
    Only(BTreeSet<ContractStatus>),
}

impl StatusFilter {
    /// Build a set filter from any collection of statuses.
    pub fn only(statuses: impl IntoIterator<Item = ContractStatus>) -> Self {
        StatusFilter::Only(statuses.into_iter().collect())
    }

    /// Check whether `status` passes the filter.
    pub fn matches(&self, status: ContractStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(set) => set.contains(&status),
        }
    }
}

/// Keep the items whose status passes `filter`, in their original order.
///
/// `StatusFilter::All` returns the input unchanged.
pub fn filter_by_status_set<T, I>(items: I, filter: &StatusFilter) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: HasStatus,
{
    items
        .into_iter()
        .filter(|item| filter.matches(item.status()))
        .collect()
}

/// The four named filters offered to list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterPreset {
    #[default]
    All,
    /// CREATED, APPROVED, SENT
    Active,
    /// CREATED, APPROVED
    Pending,
    /// SIGNED
    Signed,
}

impl FilterPreset {
    /// All presets in display order.
    pub const ALL: [FilterPreset; 4] = [
        FilterPreset::All,
        FilterPreset::Active,
        FilterPreset::Pending,
        FilterPreset::Signed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPreset::All => "ALL",
            FilterPreset::Active => "ACTIVE",
            FilterPreset::Pending => "PENDING",
            FilterPreset::Signed => "SIGNED",
        }
    }

    /// The status filter this preset stands for.
    pub fn to_filter(self) -> StatusFilter {
        match self {
            FilterPreset::All => StatusFilter::All,
            FilterPreset::Active => StatusFilter::only([
                ContractStatus::Created,
                ContractStatus::Approved,
                ContractStatus::Sent,
            ]),
            FilterPreset::Pending => {
                StatusFilter::only([ContractStatus::Created, ContractStatus::Approved])
            }
            FilterPreset::Signed => StatusFilter::only([ContractStatus::Signed]),
        }
    }
}

impl From<FilterPreset> for StatusFilter {
    fn from(preset: FilterPreset) -> Self {
        preset.to_filter()
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterPreset {
    type Err = FilterPresetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterPreset::All),
            "active" => Ok(FilterPreset::Active),
            "pending" => Ok(FilterPreset::Pending),
            "signed" => Ok(FilterPreset::Signed),
            _ => Err(FilterPresetParseError(s.to_string())),
        }
    }
}

/// Error when parsing an invalid filter preset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPresetParseError(pub String);

impl fmt::Display for FilterPresetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid filter preset: {}", self.0)
    }
}

impl std::error::Error for FilterPresetParseError {}
