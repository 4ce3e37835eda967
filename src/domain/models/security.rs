use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
}

impl ThreatLevel {
    pub fn from_issue_count(count: usize) -> Self {
        match count {
            0 => ThreatLevel::Low,
            1 | 2 => ThreatLevel::Medium,
            _ => ThreatLevel::High,
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// Outcome of sanitizing one untrusted filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityFinding {
    #[serde(rename = "sanitizedName")]
    pub sanitized_name: String,
    pub issues: Vec<String>,
}

impl SecurityFinding {
    pub fn threat_level(&self) -> ThreatLevel {
        ThreatLevel::from_issue_count(self.issues.len())
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_level_follows_issue_count() {
        assert_eq!(ThreatLevel::from_issue_count(0), ThreatLevel::Low);
        assert_eq!(ThreatLevel::from_issue_count(1), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_issue_count(2), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_issue_count(3), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_issue_count(12), ThreatLevel::High);
    }

    #[test]
    fn threat_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ThreatLevel::High).unwrap(), "\"HIGH\"");
        assert_eq!(ThreatLevel::Medium.to_string(), "MEDIUM");
    }
}
