//! Pass/fail limits on run counters

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::statistic::ClaimStatistic;
use super::DocumentType;
use crate::error::ConfigError;

/// A run counter that can carry a limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Documents,
    Approved,
    Unapproved,
    Unknown,
    Generated,
    Standards,
    Notices,
    Archives,
    Binaries,
    Failed,
    LicenseCategories,
    LicenseNames,
}

impl Counter {
    pub const ALL: [Counter; 12] = [
        Counter::Documents,
        Counter::Approved,
        Counter::Unapproved,
        Counter::Unknown,
        Counter::Generated,
        Counter::Standards,
        Counter::Notices,
        Counter::Archives,
        Counter::Binaries,
        Counter::Failed,
        Counter::LicenseCategories,
        Counter::LicenseNames,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Counter::Documents => "documents",
            Counter::Approved => "approved",
            Counter::Unapproved => "unapproved",
            Counter::Unknown => "unknown",
            Counter::Generated => "generated",
            Counter::Standards => "standards",
            Counter::Notices => "notices",
            Counter::Archives => "archives",
            Counter::Binaries => "binaries",
            Counter::Failed => "failed",
            Counter::LicenseCategories => "license_categories",
            Counter::LicenseNames => "license_names",
        }
    }

    /// Upper bound applied when none is configured
    pub fn default_max(self) -> Option<usize> {
        match self {
            Counter::Unapproved => Some(0),
            _ => None,
        }
    }

    /// Value of this counter in `statistic`
    pub fn value(self, statistic: &ClaimStatistic) -> usize {
        match self {
            Counter::Documents => statistic.documents,
            Counter::Approved => statistic.approved,
            Counter::Unapproved => statistic.unapproved,
            Counter::Unknown => statistic.unknown,
            Counter::Generated => statistic.generated,
            Counter::Standards => statistic.count(DocumentType::Standard),
            Counter::Notices => statistic.count(DocumentType::Notice),
            Counter::Archives => statistic.count(DocumentType::Archive),
            Counter::Binaries => statistic.count(DocumentType::Binary),
            Counter::Failed => statistic.failed,
            Counter::LicenseCategories => statistic.license_categories(),
            Counter::LicenseNames => statistic.by_family_name.len(),
        }
    }

    fn expected() -> String {
        Self::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Counter {
    type Err = ConfigError;

    /// Case-insensitive; `-` and `_` are interchangeable
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|counter| counter.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownCounter {
                name: s.to_string(),
                expected: Self::expected(),
            })
    }
}

/// Which side of a limit was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    Max(usize),
    Min(usize),
}

/// A counter outside its limits at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitViolation {
    pub counter: Counter,
    pub count: usize,
    pub limit: Bound,
}

impl fmt::Display for LimitViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit {
            Bound::Max(max) => write!(f, "{} is {}, maximum is {}", self.counter, self.count, max),
            Bound::Min(min) => write!(f, "{} is {}, minimum is {}", self.counter, self.count, min),
        }
    }
}

/// Maximum and minimum values per counter.
///
/// Counters without an explicit maximum use [`Counter::default_max`]; a negative
/// maximum removes the limit. Minimums default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterLimits {
    max: BTreeMap<Counter, i64>,
    min: BTreeMap<Counter, usize>,
}

impl CounterLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum of a counter; negative means unlimited
    pub fn set_max(&mut self, counter: Counter, value: i64) {
        self.max.insert(counter, value);
    }

    pub fn set_min(&mut self, counter: Counter, value: usize) {
        self.min.insert(counter, value);
    }

    /// Effective maximum of a counter
    pub fn max(&self, counter: Counter) -> Option<usize> {
        match self.max.get(&counter) {
            Some(value) => usize::try_from(*value).ok(),
            None => counter.default_max(),
        }
    }

    /// Effective minimum of a counter
    pub fn min(&self, counter: Counter) -> usize {
        self.min.get(&counter).copied().unwrap_or(0)
    }

    /// Counters of `statistic` outside their limits, in counter order
    pub fn violations(&self, statistic: &ClaimStatistic) -> Vec<LimitViolation> {
        let mut violations = Vec::new();
        for counter in Counter::ALL {
            let count = counter.value(statistic);
            if let Some(max) = self.max(counter) {
                if count > max {
                    violations.push(LimitViolation {
                        counter,
                        count,
                        limit: Bound::Max(max),
                    });
                }
            }
            let min = self.min(counter);
            if count < min {
                violations.push(LimitViolation {
                    counter,
                    count,
                    limit: Bound::Min(min),
                });
            }
        }
        violations
    }
}

/// Parse `NAME:N` as given to `--counter-max` and `--counter-min`
pub fn parse_counter_value<T: FromStr>(value: &str) -> Result<(Counter, T), String> {
    let (name, count) = value
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:COUNT, got '{}'", value))?;
    let counter = name.parse::<Counter>().map_err(|e| e.to_string())?;
    let count = count
        .trim()
        .parse::<T>()
        .map_err(|_| format!("invalid count '{}' for {}", count, counter))?;
    Ok((counter, count))
}

/// Parse the `[limits]` tables of a configuration file
pub fn limits_from_names(
    max: &BTreeMap<String, i64>,
    min: &BTreeMap<String, usize>,
) -> Result<CounterLimits, ConfigError> {
    let mut limits = CounterLimits::new();
    for (name, value) in max {
        limits.set_max(name.parse()?, *value);
    }
    for (name, value) in min {
        limits.set_min(name.parse()?, *value);
    }
    Ok(limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Claim;
    use pretty_assertions::assert_eq;

    fn statistic(unapproved: usize, approved: usize) -> ClaimStatistic {
        let mut statistic = ClaimStatistic::new();
        for i in 0..unapproved {
            statistic.record(&Claim::unknown(format!("u{}.rs", i), "fn main() {}"));
        }
        statistic.approved = approved;
        statistic
    }

    #[test]
    fn test_default_limits_only_bound_unapproved() {
        let limits = CounterLimits::new();
        assert_eq!(limits.max(Counter::Unapproved), Some(0));
        assert_eq!(limits.max(Counter::Unknown), None);
        assert_eq!(limits.min(Counter::Approved), 0);

        assert!(limits.violations(&statistic(0, 3)).is_empty());
        let violations = limits.violations(&statistic(2, 3));
        assert_eq!(
            violations,
            vec![LimitViolation {
                counter: Counter::Unapproved,
                count: 2,
                limit: Bound::Max(0),
            }]
        );
        assert_eq!(violations[0].to_string(), "unapproved is 2, maximum is 0");
    }

    #[test]
    fn test_raised_and_removed_maximum() {
        let mut limits = CounterLimits::new();
        limits.set_max(Counter::Unapproved, 2);
        assert!(limits.violations(&statistic(2, 0)).is_empty());
        assert_eq!(limits.violations(&statistic(3, 0)).len(), 1);

        limits.set_max(Counter::Unapproved, -1);
        assert_eq!(limits.max(Counter::Unapproved), None);
        assert!(limits.violations(&statistic(50, 0)).is_empty());
    }

    #[test]
    fn test_minimum() {
        let mut limits = CounterLimits::new();
        limits.set_min(Counter::Approved, 1);
        let violations = limits.violations(&statistic(0, 0));
        assert_eq!(violations[0].limit, Bound::Min(1));
        assert!(limits.violations(&statistic(0, 1)).is_empty());
    }

    #[test]
    fn test_counter_names() {
        assert_eq!("UNAPPROVED".parse::<Counter>().unwrap(), Counter::Unapproved);
        assert_eq!("license-names".parse::<Counter>().unwrap(), Counter::LicenseNames);
        let err = "unaproved".parse::<Counter>().unwrap_err();
        assert!(err.to_string().contains("license_categories"));
    }

    #[test]
    fn test_parse_counter_value() {
        assert_eq!(parse_counter_value::<i64>("unapproved:5").unwrap(), (Counter::Unapproved, 5));
        assert_eq!(parse_counter_value::<i64>("unknown:-1").unwrap(), (Counter::Unknown, -1));
        assert!(parse_counter_value::<usize>("approved:-1").is_err());
        assert!(parse_counter_value::<i64>("unapproved").is_err());
        assert!(parse_counter_value::<i64>("bogus:1").unwrap_err().contains("bogus"));
    }

    #[test]
    fn test_limits_from_names() {
        let max = BTreeMap::from([("unknown".to_string(), 3)]);
        let min = BTreeMap::from([("approved".to_string(), 1)]);
        let limits = limits_from_names(&max, &min).unwrap();
        assert_eq!(limits.max(Counter::Unknown), Some(3));
        assert_eq!(limits.max(Counter::Unapproved), Some(0));
        assert_eq!(limits.min(Counter::Approved), 1);

        let bad = BTreeMap::from([("nope".to_string(), 1)]);
        assert!(matches!(
            limits_from_names(&bad, &BTreeMap::new()).unwrap_err(),
            ConfigError::UnknownCounter { .. }
        ));
    }
}
