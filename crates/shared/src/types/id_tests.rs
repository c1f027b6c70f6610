use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_roundtrips_through_uuid() {
    let uuid = Uuid::new_v4();
    let id = SessionId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(Uuid::from(id), uuid);
}

#[test]
fn test_typed_id_display_matches_uuid() {
    let uuid = Uuid::new_v4();
    assert_eq!(UserId::from(uuid).to_string(), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(UserId::from_str("not-a-uuid").is_err());
}

#[test]
fn test_typed_id_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&SessionId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
