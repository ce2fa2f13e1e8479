//! Merge-gate (bors) configuration
//!
//! Accumulates the job names that must pass before a change is admitted
//! and renders them into `bors.toml`. The status list grows append-only
//! during assembly; duplicates are kept as-is, preserving call order.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct BorsConfig {
    #[serde(rename = "delete-merged-branches")]
    pub delete_merged_branches: bool,

    #[serde(rename = "timeout-seconds")]
    pub timeout_sec: u64,

    pub status: Vec<String>,
}

impl BorsConfig {
    pub fn apply_defaults(&mut self) {
        self.delete_merged_branches = true;
    }

    pub fn add_job(&mut self, job_name: &str) {
        self.status.push(job_name.to_string());
    }

    pub fn serialize(&self) -> Result<Vec<u8>, toml::ser::Error> {
        toml::to_string(self).map(String::into_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_defaults() {
        let mut bors = BorsConfig::default();
        assert!(!bors.delete_merged_branches);
        bors.apply_defaults();
        assert!(bors.delete_merged_branches);
    }

    #[test]
    fn test_add_job_preserves_order_and_duplicates() {
        let mut bors = BorsConfig::default();
        bors.add_job("rustfmt");
        bors.add_job("misspell");
        bors.add_job("rustfmt");
        assert_eq!(bors.status, vec!["rustfmt", "misspell", "rustfmt"]);
    }

    #[test]
    fn test_serialize_toml_keys() {
        let mut bors = BorsConfig {
            timeout_sec: 600,
            ..Default::default()
        };
        bors.apply_defaults();
        bors.add_job("check-ci-config");

        let out = String::from_utf8(bors.serialize().unwrap()).unwrap();
        assert!(out.contains("delete-merged-branches = true"));
        assert!(out.contains("timeout-seconds = 600"));
        // the key bors reads, not an abbreviation of it
        assert!(!out.contains("timeout-sec ="));
        assert!(out.contains("\"check-ci-config\""));
    }
}
