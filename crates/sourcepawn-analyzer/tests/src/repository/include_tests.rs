use std::path::PathBuf;

use super::*;
use crate::parser::IncludeKind;

fn workspace(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("sourcepawn-include-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("include")).expect("create temp workspace");
    root
}

fn request<'r>(
    path: &'r str,
    kind: IncludeKind,
    from: &'r FileId,
) -> IncludeRequest<'r> {
    IncludeRequest {
        path,
        kind,
        from,
        builtin: false,
    }
}

#[test]
fn include_extension_is_added_when_missing() {
    assert_eq!(with_include_extension("sourcemod"), "sourcemod.inc");
    assert_eq!(with_include_extension("sdktools.inc"), "sdktools.inc");
    assert_eq!(with_include_extension("module.sp"), "module.sp");
    assert_eq!(with_include_extension("left4dhooks/natives"), "left4dhooks/natives.inc");
}

#[test]
fn quoted_include_checks_the_include_subfolder() {
    let root = workspace("quoted");
    std::fs::write(root.join("include/colors.inc"), "").expect("write include");
    let repository = ItemsRepository::new();
    let config = RepositoryConfig::default();
    let resolver = RepositoryResolver {
        repository: &repository,
        config: &config,
    };
    let from = FileId::from_path(&root.join("plugin.sp"));

    let include = resolver.resolve_include(&request("colors", IncludeKind::Quoted, &from)).expect("resolved");
    assert_eq!(include.target, FileId::from_path(&root.join("include/colors.inc")));
    assert!(!include.builtin);
}

#[test]
fn quoted_include_falls_back_to_sibling_plugin() {
    let root = workspace("sibling");
    std::fs::write(root.join("module.sp"), "").expect("write module");
    let repository = ItemsRepository::new();
    let config = RepositoryConfig::default();
    let resolver = RepositoryResolver {
        repository: &repository,
        config: &config,
    };
    let from = FileId::from_path(&root.join("plugin.sp"));

    let include = resolver.resolve_include(&request("module", IncludeKind::Quoted, &from)).expect("resolved");
    assert_eq!(include.target.file_name(), "module.sp");
}

#[test]
fn angle_include_in_sdk_is_builtin() {
    let root = workspace("angle");
    std::fs::write(root.join("include/sdktools.inc"), "").expect("write sdk include");
    let repository = ItemsRepository::new();
    let config = RepositoryConfig {
        sdk_root: Some(root.clone()),
        ..RepositoryConfig::default()
    };
    let resolver = RepositoryResolver {
        repository: &repository,
        config: &config,
    };
    let from = FileId::from_path(&root.join("plugin.sp"));

    let include = resolver.resolve_include(&request("sdktools", IncludeKind::Angle, &from)).expect("resolved");
    assert_eq!(include.target, FileId::from_path(&root.join("include/sdktools.inc")));
    assert!(include.builtin);
}

#[test]
fn unresolved_include_becomes_placeholder() {
    let repository = ItemsRepository::new();
    let config = RepositoryConfig::default();
    let resolver = RepositoryResolver {
        repository: &repository,
        config: &config,
    };
    let from = FileId::from_path(std::path::Path::new("/nonexistent/plugin.sp"));

    let include = resolver.resolve_include(&request("missing", IncludeKind::Angle, &from)).expect("placeholder");
    assert_eq!(include.target.as_str(), "builtin://missing.inc");
    assert!(include.builtin);

    let include = resolver.resolve_include(&request("local", IncludeKind::Quoted, &from)).expect("placeholder");
    assert_eq!(include.target.as_str(), "builtin://local.inc");
    assert!(!include.builtin);
}

#[test]
fn known_documents_resolve_without_touching_disk() {
    let repository = ItemsRepository::new();
    let known = FileId::from_path(std::path::Path::new("/nonexistent/project/include/virtual.inc"));
    repository.add_document(known.clone());
    let config = RepositoryConfig::default();
    let resolver = RepositoryResolver {
        repository: &repository,
        config: &config,
    };
    let from = FileId::from_path(std::path::Path::new("/nonexistent/project/plugin.sp"));

    let include = resolver.resolve_include(&request("virtual", IncludeKind::Quoted, &from)).expect("resolved");
    assert_eq!(include.target, known);
}

#[test]
fn self_include_is_ignored() {
    let repository = ItemsRepository::new();
    let config = RepositoryConfig::default();
    let resolver = RepositoryResolver {
        repository: &repository,
        config: &config,
    };
    let from = FileId::from_path(std::path::Path::new("/nonexistent/helpers.inc"));
    assert!(resolver.resolve_include(&request("helpers", IncludeKind::Quoted, &from)).is_none());
    assert!(resolver.resolve_include(&request("helpers.inc", IncludeKind::Angle, &from)).is_none());
}

#[test]
fn include_folders_are_ordered_nearest_first() {
    let config = RepositoryConfig {
        sdk_root: Some(PathBuf::from("/sdk")),
        include_dirs: vec![PathBuf::from("/extra")],
        main_path: None,
    };
    let file = FileId::from_path(std::path::Path::new("/nonexistent/project/plugin.sp"));
    let folders = include_folders(&config, &file);
    assert_eq!(
        folders,
        vec![
            PathBuf::from("/nonexistent/project/include"),
            PathBuf::from("/nonexistent/project"),
            PathBuf::from("/sdk/include"),
            PathBuf::from("/extra"),
        ]
    );
}
