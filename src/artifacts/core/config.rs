//! Environment-driven configuration
//!
//! | Variable | Effect |
//! |---|---|
//! | `TWIG_COMMIT_DATE` | Fixed timestamp for new commits (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) |
//! | `TWIG_MERGE_BASE` | Split point strategy: `first-found` (default) or `best` |
//! | `NO_PAGER` | Print history directly instead of paging it |

use crate::artifacts::merge::split_point::SplitPointStrategy;
use crate::errors::TwigError;
use chrono::{DateTime, FixedOffset};

pub const COMMIT_DATE_VAR: &str = "TWIG_COMMIT_DATE";
pub const MERGE_BASE_VAR: &str = "TWIG_MERGE_BASE";
pub const NO_PAGER_VAR: &str = "NO_PAGER";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    commit_date: Option<DateTime<FixedOffset>>,
    merge_base: SplitPointStrategy,
    no_pager: bool,
}

impl Config {
    pub fn load_from_env() -> anyhow::Result<Self> {
        Self::load_from(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let commit_date = lookup(COMMIT_DATE_VAR)
            .map(|date| parse_commit_date(&date))
            .transpose()?;

        let merge_base = lookup(MERGE_BASE_VAR)
            .map(|strategy| SplitPointStrategy::try_from(strategy.as_str()))
            .transpose()?
            .unwrap_or_default();

        let no_pager = lookup(NO_PAGER_VAR).is_some();

        Ok(Config {
            commit_date,
            merge_base,
            no_pager,
        })
    }

    /// Timestamp for a commit created now
    pub fn commit_timestamp(&self) -> DateTime<FixedOffset> {
        self.commit_date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn merge_base(&self) -> SplitPointStrategy {
        self.merge_base
    }

    pub fn no_pager(&self) -> bool {
        self.no_pager
    }
}

fn parse_commit_date(date: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
        .map_err(|_| TwigError::Usage(format!("invalid {COMMIT_DATE_VAR}: {date:?}")).into())
}
