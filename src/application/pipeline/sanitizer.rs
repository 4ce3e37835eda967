use chrono::Utc;

use crate::domain::models::security::SecurityFinding;

const DISALLOWED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Extensions longer than this are not worth preserving when a name is truncated.
const MAX_PRESERVED_EXTENSION: usize = 16;

/// Normalizes untrusted filenames into names that are safe to store and display.
#[derive(Debug, Clone)]
pub struct SecuritySanitizer {
    max_length: usize,
}

impl SecuritySanitizer {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(1),
        }
    }

    pub fn sanitize(&self, raw_file_name: &str) -> SecurityFinding {
        let mut issues = Vec::new();

        let mut name = raw_file_name.to_string();
        let length = name.chars().count();
        if length > self.max_length {
            name = truncate_keeping_extension(&name, self.max_length);
            issues.push(format!(
                "Name truncated from {} to {} characters",
                length, self.max_length
            ));
        }

        let mut replaced = 0usize;
        name = name
            .chars()
            .map(|c| {
                if DISALLOWED_CHARS.contains(&c) || (c as u32) < 0x20 {
                    replaced += 1;
                    '_'
                } else {
                    c
                }
            })
            .collect();
        if replaced > 0 {
            issues.push(format!("{} disallowed character(s) replaced", replaced));
        }

        // Every parent-directory hop counts on its own, so deep traversal scores higher.
        let traversals = name.matches("..").count();
        if traversals > 0 {
            name = name.replace("..", "_");
            for hop in 1..=traversals {
                issues.push(format!("Parent directory reference #{} neutralized", hop));
            }
        }

        let separators = name.chars().filter(|c| *c == '/' || *c == '\\').count();
        if separators > 0 {
            name = name.replace(['/', '\\'], "_");
            issues.push(format!("{} path separator(s) replaced", separators));
        }

        let trimmed = name.trim();
        if trimmed.is_empty() {
            name = self.fallback_name();
            issues.push("Empty name replaced with a generated one".to_string());
        } else if trimmed.len() != name.len() {
            name = trimmed.to_string();
        }

        SecurityFinding {
            sanitized_name: name,
            issues,
        }
    }

    fn fallback_name(&self) -> String {
        let generated = format!("file_{}", Utc::now().timestamp_millis());
        generated.chars().take(self.max_length).collect()
    }
}

fn truncate_keeping_extension(name: &str, max_length: usize) -> String {
    if let Some((stem, extension)) = name.rsplit_once('.') {
        let extension_len = extension.chars().count();
        if !stem.is_empty()
            && extension_len > 0
            && extension_len <= MAX_PRESERVED_EXTENSION
            && extension_len + 1 < max_length
        {
            let stem_budget = max_length - extension_len - 1;
            let stem: String = stem.chars().take(stem_budget).collect();
            return format!("{}.{}", stem, extension);
        }
    }
    name.chars().take(max_length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::security::ThreatLevel;

    fn sanitizer() -> SecuritySanitizer {
        SecuritySanitizer::new(255)
    }

    #[test]
    fn clean_name_passes_untouched() {
        let finding = sanitizer().sanitize("quarterly report.pdf");
        assert_eq!(finding.sanitized_name, "quarterly report.pdf");
        assert!(finding.is_clean());
        assert_eq!(finding.threat_level(), ThreatLevel::Low);
    }

    #[test]
    fn path_traversal_is_neutralized_and_high_threat() {
        let finding = sanitizer().sanitize("../../etc/passwd");
        assert!(!finding.sanitized_name.contains('/'));
        assert!(!finding.sanitized_name.contains(".."));
        assert_eq!(finding.sanitized_name, "____etc_passwd");
        assert_eq!(finding.threat_level(), ThreatLevel::High);
    }

    #[test]
    fn backslash_traversal_is_neutralized() {
        let finding = sanitizer().sanitize("..\\windows\\system32\\config");
        assert!(!finding.sanitized_name.contains('\\'));
        assert!(!finding.sanitized_name.contains(".."));
        assert_eq!(finding.threat_level(), ThreatLevel::Medium);
    }

    #[test]
    fn disallowed_and_control_characters_are_replaced() {
        let finding = sanitizer().sanitize("inv<oice>:\"2024\"|?*\u{0}\u{1f}.png");
        assert_eq!(finding.sanitized_name, "inv_oice___2024______.png");
        assert_eq!(finding.issues.len(), 1);
        assert_eq!(finding.threat_level(), ThreatLevel::Medium);
    }

    #[test]
    fn long_names_are_truncated_keeping_extension() {
        let raw = format!("{}.jpeg", "a".repeat(300));
        let finding = SecuritySanitizer::new(40).sanitize(&raw);
        assert_eq!(finding.sanitized_name.chars().count(), 40);
        assert!(finding.sanitized_name.ends_with(".jpeg"));
        assert_eq!(finding.issues.len(), 1);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let raw = "é".repeat(20);
        let finding = SecuritySanitizer::new(10).sanitize(&raw);
        assert_eq!(finding.sanitized_name, "é".repeat(10));
    }

    #[test]
    fn empty_and_blank_names_get_generated_fallback() {
        for raw in ["", "   "] {
            let finding = sanitizer().sanitize(raw);
            assert!(finding.sanitized_name.starts_with("file_"), "{raw:?}");
            assert!(!finding.issues.is_empty());
        }
    }

    #[test]
    fn fallback_respects_max_length() {
        let finding = SecuritySanitizer::new(4).sanitize("");
        assert_eq!(finding.sanitized_name, "file");
    }

    #[test]
    fn sanitizing_twice_is_a_no_op() {
        let sanitizer = SecuritySanitizer::new(24);
        let mut inputs: Vec<String> = [
            "../../etc/passwd",
            "....//....//x",
            "...",
            ".....",
            "a..b..c",
            " ../ leading",
            "trail /",
            "C:\\Users\\me\\..\\secret.txt",
            "<script>alert(1)</script>.html",
            "name\u{7}with\u{1b}escapes.txt",
            "ünïcødé-ファイル.png",
            "",
            "  ",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // Deterministic mix of hostile characters.
        let alphabet: Vec<char> = "a./\\:<>|?* \u{0}é".chars().collect();
        let mut seed: u32 = 7;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let mut s = String::new();
            for _ in 0..((seed >> 16) % 40) {
                seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                s.push(alphabet[(seed >> 16) as usize % alphabet.len()]);
            }
            inputs.push(s);
        }

        for raw in inputs {
            let once = sanitizer.sanitize(&raw);
            let twice = sanitizer.sanitize(&once.sanitized_name);
            assert_eq!(twice.sanitized_name, once.sanitized_name, "input {raw:?}");
            assert!(twice.is_clean(), "input {raw:?} -> {:?}", twice.issues);
            assert!(once.sanitized_name.chars().count() <= 24);
        }
    }
}
