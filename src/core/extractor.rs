use crate::utils::error::Result;
use regex::Regex;

pub const DEFAULT_DOMAIN_PATTERN: &str = r"<domain>(.*?)</domain>";

/// Pulls domain names out of a raw result page, in document order.
///
/// When the pattern has a capture group, the first group is taken as the
/// domain, and is empty if the group did not take part in the match.
/// A pattern without groups yields the whole match.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    pattern: Regex,
}

impl PageExtractor {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// An empty result is not an error here: it tells the caller the page is exhausted.
    pub fn extract(&self, page: &str) -> Vec<String> {
        let group = if self.pattern.captures_len() > 1 { 1 } else { 0 };
        self.pattern
            .captures_iter(page)
            .map(|caps| caps.get(group).map_or("", |m| m.as_str()).to_string())
            .collect()
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_DOMAIN_PATTERN).expect("default domain pattern is valid"),
        }
    }
}
