//! Running tallies of the languages, countries and domains sampled so far

use std::collections::HashMap;

/// Placeholder recorded when a language or country could not be determined
pub const UNKNOWN: &str = "NA";

/// The three attributes the novelty scorer compares against the rarity counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProfile {
    /// Language code of the page title (or [`UNKNOWN`])
    pub language: String,

    /// Country code of the hosting server (or [`UNKNOWN`])
    pub country: String,

    /// Registrable domain key
    pub domain: String,
}

/// Counters of previously sampled attribute values
///
/// Only confirmed samples are recorded here; scoring probes read the counters
/// but never write them.
#[derive(Debug, Clone, Default)]
pub struct RarityStats {
    languages: HashMap<String, u64>,
    countries: HashMap<String, u64>,
    domains: HashMap<String, u64>,
}

impl RarityStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sampled page
    pub fn observe(&mut self, profile: &PageProfile) {
        *self.languages.entry(profile.language.clone()).or_insert(0) += 1;
        *self.countries.entry(profile.country.clone()).or_insert(0) += 1;
        *self.domains.entry(profile.domain.clone()).or_insert(0) += 1;
    }

    pub fn language_count(&self, language: &str) -> u64 {
        self.languages.get(language).copied().unwrap_or(0)
    }

    pub fn country_count(&self, country: &str) -> u64 {
        self.countries.get(country).copied().unwrap_or(0)
    }

    /// Number of sampled pages from a registrable domain
    pub fn domain_count(&self, domain: &str) -> u64 {
        self.domains.get(domain).copied().unwrap_or(0)
    }

    pub fn languages(&self) -> &HashMap<String, u64> {
        &self.languages
    }

    pub fn countries(&self) -> &HashMap<String, u64> {
        &self.countries
    }

    pub fn domains(&self) -> &HashMap<String, u64> {
        &self.domains
    }
}
