//! Robots.txt parser implementation
//!
//! This module provides functionality for parsing robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// User agent the policy is evaluated for: the rules that apply to any crawler
pub const GENERIC_AGENT: &str = "*";

/// What a robots.txt fetch told us about a site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    /// Evaluate the rules in the content
    Rules,
    /// Everything is allowed (e.g. robots.txt does not exist)
    AllowAll,
    /// Nothing is allowed (e.g. robots.txt is access-controlled)
    DisallowAll,
}

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher, providing a simplified
/// interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    policy: Policy,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            policy: Policy::Rules,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            policy: Policy::AllowAll,
        }
    }

    /// Creates a ParsedRobots that denies everything
    pub fn disallow_all() -> Self {
        Self {
            content: String::new(),
            policy: Policy::DisallowAll,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The full URL to check
    /// * `user_agent` - The user agent string
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self.policy {
            Policy::AllowAll => true,
            Policy::DisallowAll => false,
            Policy::Rules if self.content.trim().is_empty() => true,
            Policy::Rules => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
            }
        }
    }

    /// Checks a URL against the rules for any crawler
    pub fn allows(&self, url: &str) -> bool {
        self.is_allowed(url, GENERIC_AGENT)
    }
}
