use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub batch_id: Uuid,
    pub succeeded: usize,
    pub total: usize,
    pub errors: Vec<String>,
    pub elapsed_ms: u64,
}

impl BatchResult {
    /// Only a batch with every file delivered and no recorded errors counts as a success.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.succeeded == self.total
    }

    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && !self.errors.is_empty()
    }

    /// De-duplicated, truncated error strings suitable for showing to end users.
    pub fn user_facing_errors(&self, max_entries: usize, max_chars: usize) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for error in &self.errors {
            let short = truncate_chars(error, max_chars);
            if !seen.contains(&short) {
                seen.push(short);
            }
            if seen.len() == max_entries {
                break;
            }
        }
        seen
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}
