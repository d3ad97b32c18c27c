use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RankError, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_REGION: u32 = 225;
pub const DEFAULT_SORT_BY: &str = "rlv";
pub const DEFAULT_MAX_PASSAGES: u32 = 1;
pub const DEFAULT_GROUPS_ON_PAGE: u32 = 10;
pub const DEFAULT_DOCS_IN_GROUP: u32 = 1;

const FLAT_GROUP_BY: &str = "attr=d.mode=flat";

/// Whether the API folds results into content groups or returns them flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    Deep,
    Flat,
}

impl FromStr for GroupingMode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deep" => Ok(Self::Deep),
            "flat" => Ok(Self::Flat),
            other => Err(RankError::InvalidConfiguration {
                message: format!("unknown grouping mode '{}', expected 'deep' or 'flat'", other),
            }),
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deep => write!(f, "deep"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Validated parameters of one query's API calls. `group_by` is derived once
/// at construction and the struct is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParameters {
    query: String,
    sort_by: String,
    region: u32,
    mode: GroupingMode,
    groups_on_page: Option<u32>,
    docs_in_group: Option<u32>,
    max_passages: u32,
    group_by: String,
}

impl RequestParameters {
    /// Builds parameters with the default sort mode and passage count.
    ///
    /// Absent (or zero) group limits fall back to 10 groups per page and one
    /// document per group in `deep` mode; they are ignored in `flat` mode.
    pub fn build(
        query: impl Into<String>,
        region: u32,
        mode: &str,
        groups_on_page: Option<u32>,
        docs_in_group: Option<u32>,
    ) -> Result<Self> {
        let mode: GroupingMode = mode.parse()?;

        let group_by = match mode {
            GroupingMode::Flat => FLAT_GROUP_BY.to_string(),
            GroupingMode::Deep => format!(
                "attr=d.mode=deep.groups-on-page={}.docs-in-group={}",
                groups_on_page
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_GROUPS_ON_PAGE),
                docs_in_group
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_DOCS_IN_GROUP),
            ),
        };

        Ok(Self {
            query: query.into(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            region,
            mode,
            groups_on_page,
            docs_in_group,
            max_passages: DEFAULT_MAX_PASSAGES,
            group_by,
        })
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    pub fn with_max_passages(mut self, max_passages: u32) -> Self {
        self.max_passages = max_passages;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    pub fn region(&self) -> u32 {
        self.region
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    pub fn groups_on_page(&self) -> Option<u32> {
        self.groups_on_page
    }

    pub fn docs_in_group(&self) -> Option<u32> {
        self.docs_in_group
    }

    pub fn max_passages(&self) -> u32 {
        self.max_passages
    }

    pub fn group_by(&self) -> &str {
        &self.group_by
    }

    /// Query-string pairs for one page request, excluding credentials.
    pub fn page_pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("sortby", self.sort_by.clone()),
            ("lr", self.region.to_string()),
            ("groupby", self.group_by.clone()),
            ("maxpassages", self.max_passages.to_string()),
            ("page", page.to_string()),
        ]
    }
}

/// Shared settings from which every query's `RequestParameters` is built.
///
/// The grouping mode is kept as given and validated per query by
/// `RequestParameters::build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamsTemplate {
    pub region: u32,
    pub mode: String,
    pub groups_on_page: Option<u32>,
    pub docs_in_group: Option<u32>,
    pub sort_by: String,
    pub max_passages: u32,
}

impl ParamsTemplate {
    pub fn new(region: u32, mode: impl Into<String>) -> Self {
        Self {
            region,
            mode: mode.into(),
            groups_on_page: None,
            docs_in_group: None,
            sort_by: DEFAULT_SORT_BY.to_string(),
            max_passages: DEFAULT_MAX_PASSAGES,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            region: config.region(),
            mode: config.grouping_mode().to_string(),
            groups_on_page: config.groups_on_page(),
            docs_in_group: config.docs_in_group(),
            sort_by: config.sort_by().to_string(),
            max_passages: config.max_passages(),
        }
    }

    pub fn with_groups(mut self, groups_on_page: Option<u32>, docs_in_group: Option<u32>) -> Self {
        self.groups_on_page = groups_on_page;
        self.docs_in_group = docs_in_group;
        self
    }

    pub fn params_for(&self, query: &str) -> Result<RequestParameters> {
        Ok(RequestParameters::build(
            query,
            self.region,
            &self.mode,
            self.groups_on_page,
            self.docs_in_group,
        )?
        .with_sort_by(self.sort_by.as_str())
        .with_max_passages(self.max_passages))
    }
}

impl Default for ParamsTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_REGION, GroupingMode::Deep.to_string())
    }
}
