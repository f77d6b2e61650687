// Local threat-intelligence database for file hash lookups

use crate::api::ThreatIntelligence;
use crate::core::errors::ShieldError;
use crate::core::models::{Severity, ThreatInfo, ThreatType};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-process hash → threat table
///
/// Keys are lower-case hex digests. No remote provider is consulted.
pub struct LocalThreatDatabase {
    entries: HashMap<String, ThreatInfo>,
}

impl LocalThreatDatabase {
    /// Empty database
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Database seeded with the EICAR anti-malware test signature digests
    pub fn with_known_signatures() -> Self {
        let eicar = ThreatInfo {
            threat_type: ThreatType::Malware,
            severity: Severity::Critical,
            name: "EICAR-Test-File".to_string(),
            description: "Anti-malware test file signature".to_string(),
        };

        let mut db = Self::new();
        // MD5, SHA-1, SHA-256
        db.insert("44d88612fea8a8f36de82e1278abb02f", eicar.clone());
        db.insert("3395856ce81f2b7382dee72602f798b642f14140", eicar.clone());
        db.insert(
            "275a021bbfb6489e54d471899f7db9d1663fc695ec2fe2a2c4538aabf651fd0f",
            eicar,
        );
        db
    }

    pub fn insert(&mut self, hash: &str, threat: ThreatInfo) {
        self.entries.insert(hash.to_ascii_lowercase(), threat);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LocalThreatDatabase {
    fn default() -> Self {
        Self::with_known_signatures()
    }
}

#[async_trait]
impl ThreatIntelligence for LocalThreatDatabase {
    async fn lookup_hash(&self, hash: &str) -> Result<Option<ThreatInfo>, ShieldError> {
        Ok(self.entries.get(&hash.to_ascii_lowercase()).cloned())
    }
}
