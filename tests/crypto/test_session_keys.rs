//! Tests for per-query ephemeral key material

use ota_update_client::crypto::{EphemeralSession, SESSION_IV_LEN, SESSION_KEY_LEN};
use std::collections::HashSet;

#[test]
fn test_key_and_iv_lengths() {
    let session = EphemeralSession::generate();
    assert_eq!(session.key().len(), SESSION_KEY_LEN);
    assert_eq!(session.iv().len(), SESSION_IV_LEN);
}

#[test]
fn test_no_repeats_across_sessions() {
    let mut keys = HashSet::new();
    let mut ivs = HashSet::new();
    for _ in 0..100 {
        let session = EphemeralSession::generate();
        assert!(keys.insert(*session.key()), "key repeated");
        assert!(ivs.insert(*session.iv()), "iv repeated");
    }
}

#[test]
fn test_generate_from_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| *EphemeralSession::generate().key()))
        .collect();
    let keys: HashSet<[u8; 32]> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(keys.len(), 4);
}
