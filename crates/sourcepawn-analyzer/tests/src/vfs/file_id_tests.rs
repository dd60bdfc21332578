use super::*;

#[test]
fn builtin_placeholder_is_not_a_path() {
    let id = FileId::builtin("sdktools.inc");
    assert!(id.is_builtin());
    assert_eq!(id.as_str(), "builtin://sdktools.inc");
    assert!(id.to_path().is_none());
    assert_eq!(id.file_name(), "sdktools.inc");
    assert_eq!(id.stem(), "sdktools");
}

#[test]
fn path_backed_id_round_trips_through_url() {
    let path = std::env::temp_dir().join("file_id_round_trip.sp");
    let id = FileId::from_path(&path);
    assert!(!id.is_builtin());
    let url = id.to_url().expect("file url");
    assert_eq!(FileId::from_url(&url), id);
    assert_eq!(id.file_name(), "file_id_round_trip.sp");
    assert_eq!(id.stem(), "file_id_round_trip");
}

#[test]
fn nested_builtin_keeps_last_component_as_name() {
    let id = FileId::builtin("left4dhooks/natives.inc");
    assert_eq!(id.file_name(), "natives.inc");
    assert_eq!(id.stem(), "natives");
}
