//! `$merge`: deep-merge other files into the declaring mapping.
//!
//! Sources are applied in list order, so later files win. Merged values
//! also override the mapping's own keys and any `$ref` results.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::trace;

use super::{source_path, Resolver};
use crate::directive::{Directive, DirectiveKind};
use crate::error::{Error, Result};
use crate::format::FormatAdapter;
use crate::tree::{merge_mappings, Mapping, Tree};

/// Fail if `tree` uses `$merge` anywhere but `adapter` cannot express it.
///
/// Runs right after parsing, before any directive triggers file I/O.
pub(super) fn check_supported(tree: &Tree, adapter: &dyn FormatAdapter) -> Result<()> {
    if adapter.supports_merge() || !declares_merge(tree) {
        return Ok(());
    }
    Err(Error::UnsupportedDirective {
        format: adapter.name(),
        directive: DirectiveKind::Merge,
    })
}

/// `$ref` values are target-to-path pairs, not document content, so they are skipped.
fn declares_merge(tree: &Tree) -> bool {
    match tree {
        Value::Object(map) => {
            Directive::peek(map, DirectiveKind::Merge)
                || map
                    .iter()
                    .filter(|(key, _)| key.as_str() != DirectiveKind::Ref.key())
                    .any(|(_, value)| declares_merge(value))
        }
        Value::Array(items) => items.iter().any(declares_merge),
        _ => false,
    }
}

pub(super) fn apply<'r>(
    resolver: &Resolver<'r>,
    map: &mut Mapping,
    sources: Vec<String>,
    origin: &Path,
    adapter: &'r dyn FormatAdapter,
    stack: &mut Vec<PathBuf>,
) -> Result<()> {
    for source in sources {
        let path = source_path(origin, &source);
        trace!(source = %path.display(), "applying $merge");
        match resolver.load(&path, stack, Some(adapter))? {
            Value::Object(incoming) => {
                merge_mappings(map, incoming, resolver.options.list_merge)
            }
            _ => {
                return Err(Error::InvalidDirective {
                    path: origin.to_path_buf(),
                    directive: DirectiveKind::Merge,
                    message: format!("{} is not a mapping", path.display()),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatRegistry, IniFormat, YamlFormat};
    use crate::resolve::ResolveOptions;
    use crate::tree::ListMerge;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn load_with(path: &Path, list_merge: ListMerge) -> Result<Tree> {
        let registry = FormatRegistry::builtin();
        Resolver::new(&registry, ResolveOptions { list_merge }).load(path, &mut Vec::new(), None)
    }

    #[test]
    fn test_merge_sources_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base.yaml"),
            "db:\n  host: localhost\n  port: 5432\ntags: [a, b]\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("prod.yaml"),
            "db:\n  host: db.prod\ntags: [c]\n",
        )
        .unwrap();
        let root = dir.path().join("app.yaml");
        fs::write(&root, "name: app\n$merge:\n  - base.yaml\n  - prod.yaml\n").unwrap();

        assert_eq!(
            load_with(&root, ListMerge::Replace).unwrap(),
            json!({"name": "app", "db": {"host": "db.prod", "port": 5432}, "tags": ["c"]})
        );
        assert_eq!(
            load_with(&root, ListMerge::Concat).unwrap()["tags"],
            json!(["a", "b", "c"])
        );
    }

    #[test]
    fn test_merge_overrides_local_keys_and_refs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ref.json"), r#"{"from": "ref"}"#).unwrap();
        fs::write(
            dir.path().join("over.json"),
            r#"{"level": "merged", "section": {"from": "merge"}}"#,
        )
        .unwrap();
        let root = dir.path().join("root.json");
        fs::write(
            &root,
            r#"{"level": "local", "$merge": ["over.json"], "$ref": {"section": "ref.json"}}"#,
        )
        .unwrap();

        assert_eq!(
            load_with(&root, ListMerge::Replace).unwrap(),
            json!({"level": "merged", "section": {"from": "merge"}})
        );
    }

    #[test]
    fn test_merge_source_must_be_mapping() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("list.json"), "[1, 2]").unwrap();
        let root = dir.path().join("root.json");
        fs::write(&root, r#"{"$merge": "list.json"}"#).unwrap();

        assert!(matches!(
            load_with(&root, ListMerge::Replace).unwrap_err(),
            Error::InvalidDirective {
                directive: DirectiveKind::Merge,
                ..
            }
        ));
    }

    #[test]
    fn test_ini_merge_fails_before_io() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("file-merge.ini");
        fs::write(
            &root,
            "$merge[]=does-not-exist.ini\n\n[$ref]\nother=also-missing.ini\n",
        )
        .unwrap();

        let err = load_with(&root, ListMerge::Replace).unwrap_err();
        assert_eq!(err.to_string(), "INI config does not support $merge settings.");
    }

    #[test]
    fn test_reference_target_named_merge_is_invalid_not_unsupported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.ini"), "a=1\n").unwrap();
        let root = dir.path().join("root.ini");
        fs::write(&root, "[$ref]\n$merge=x.ini\n").unwrap();

        assert!(check_supported(&json!({"$ref": {"$merge": "x.ini"}}), &IniFormat).is_ok());
        assert!(matches!(
            load_with(&root, ListMerge::Replace).unwrap_err(),
            Error::InvalidDirective {
                directive: DirectiveKind::Ref,
                ..
            }
        ));
    }

    #[test]
    fn test_reference_target_cannot_reintroduce_directive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.json"), r#"{"a": 1}"#).unwrap();
        let root = dir.path().join("root.json");
        fs::write(&root, r#"{"$ref": {"$merge": "x.json"}}"#).unwrap();

        assert!(matches!(
            load_with(&root, ListMerge::Replace).unwrap_err(),
            Error::InvalidDirective {
                directive: DirectiveKind::Ref,
                ..
            }
        ));
    }

    #[test]
    fn test_check_supported_scans_nested_mappings() {
        let tree = json!({"a": [{"b": {"$merge": ["x.ini"]}}]});
        assert!(check_supported(&tree, &IniFormat).is_err());
        assert!(check_supported(&tree, &YamlFormat).is_ok());
        assert!(check_supported(&json!({"a": 1}), &IniFormat).is_ok());
    }
}
