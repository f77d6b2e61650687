// Local threat database

use sentinel_shield::api::ThreatIntelligence;
use sentinel_shield::core::models::{Severity, ThreatInfo, ThreatType};
use sentinel_shield::engine::threat_intel::LocalThreatDatabase;

#[tokio::test]
async fn test_seeded_signatures_cover_all_digest_lengths() {
    let db = LocalThreatDatabase::default();
    assert_eq!(db.len(), 3);

    for hash in [
        "44d88612fea8a8f36de82e1278abb02f",
        "3395856ce81f2b7382dee72602f798b642f14140",
        "275A021BBFB6489E54D471899F7DB9D1663FC695EC2FE2A2C4538AABF651FD0F",
    ] {
        let info = db.lookup_hash(hash).await.unwrap().unwrap();
        assert_eq!(info.threat_type, ThreatType::Malware);
    }
}

#[tokio::test]
async fn test_custom_entries() {
    let mut db = LocalThreatDatabase::new();
    assert!(db.is_empty());

    db.insert(
        "ABCDEF0123456789ABCDEF0123456789",
        ThreatInfo {
            threat_type: ThreatType::Spyware,
            severity: Severity::High,
            name: "Test.Spy".to_string(),
            description: "Unit test entry".to_string(),
        },
    );

    let info = db
        .lookup_hash("abcdef0123456789abcdef0123456789")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(info.severity, Severity::High);
    assert!(db
        .lookup_hash("00000000000000000000000000000000")
        .await
        .unwrap()
        .is_none());
}
