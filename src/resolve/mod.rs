//! Directive resolution.
//!
//! A [`Resolver`] loads one file, parses it with the adapter picked for its
//! extension, and eliminates every `$ref` and `$merge` directive by loading
//! the files they name. Each nested load goes through the same pipeline, so
//! the spliced sub-trees are already fully resolved.
//!
//! The set of files currently being loaded is an explicit stack passed down
//! the recursion; finding a file on it again is a cycle.

mod merge;
mod reference;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::directive::{Directive, DirectiveKind};
use crate::error::{AdapterError, Error, Result};
use crate::format::{FormatAdapter, FormatRegistry};
use crate::tree::{ListMerge, Mapping, Tree};

/// Tunables for a resolution pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pub list_merge: ListMerge,
}

pub struct Resolver<'r> {
    registry: &'r FormatRegistry,
    options: ResolveOptions,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r FormatRegistry, options: ResolveOptions) -> Self {
        Self { registry, options }
    }

    /// Load `path` and resolve every directive it contains.
    ///
    /// `stack` holds the canonical paths of the files being loaded above
    /// this one. `inherited` is the adapter of the referencing file, used
    /// when `path` has no recognised extension.
    pub fn load(
        &self,
        path: &Path,
        stack: &mut Vec<PathBuf>,
        inherited: Option<&'r dyn FormatAdapter>,
    ) -> Result<Tree> {
        let adapter = self
            .registry
            .for_path(path)
            .or(inherited)
            .ok_or_else(|| Error::UnsupportedFormat {
                path: path.to_path_buf(),
            })?;

        let canonical = fs::canonicalize(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if stack.contains(&canonical) {
            let mut chain = stack.clone();
            chain.push(canonical);
            return Err(Error::CyclicReference { chain });
        }

        debug!(
            path = %path.display(),
            format = adapter.name(),
            depth = stack.len(),
            "loading config file"
        );
        let mut tree = read_tree(path, &canonical, adapter)?;
        merge::check_supported(&tree, adapter)?;

        stack.push(canonical);
        let resolved = self.resolve_tree(&mut tree, path, adapter, stack);
        stack.pop();
        resolved?;

        Ok(tree)
    }

    fn resolve_tree(
        &self,
        tree: &mut Tree,
        origin: &Path,
        adapter: &'r dyn FormatAdapter,
        stack: &mut Vec<PathBuf>,
    ) -> Result<()> {
        match tree {
            Value::Object(map) => self.resolve_mapping(map, origin, adapter, stack),
            Value::Array(items) => items
                .iter_mut()
                .try_for_each(|item| self.resolve_tree(item, origin, adapter, stack)),
            _ => Ok(()),
        }
    }

    /// Resolve nested mappings first, then apply this mapping's own
    /// directives: every `$ref` before any `$merge`.
    fn resolve_mapping(
        &self,
        map: &mut Mapping,
        origin: &Path,
        adapter: &'r dyn FormatAdapter,
        stack: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let mut directives = Vec::new();
        for kind in DirectiveKind::ALL {
            if let Some(directive) = Directive::take(map, kind, origin)? {
                directives.push(directive);
            }
        }

        for value in map.values_mut() {
            self.resolve_tree(value, origin, adapter, stack)?;
        }

        for directive in directives {
            match directive {
                Directive::Reference(entries) => {
                    reference::apply(self, map, entries, origin, adapter, stack)?
                }
                Directive::Merge(sources) => {
                    merge::apply(self, map, sources, origin, adapter, stack)?
                }
            }
        }
        Ok(())
    }
}

/// Resolve a directive path against the directory of the declaring file.
fn source_path(origin: &Path, source: &str) -> PathBuf {
    match origin.parent() {
        Some(dir) => dir.join(source),
        None => PathBuf::from(source),
    }
}

fn read_tree(path: &Path, canonical: &Path, adapter: &dyn FormatAdapter) -> Result<Tree> {
    let bytes = fs::read(canonical).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| Error::Parse {
        path: path.to_path_buf(),
        format: adapter.name(),
        message,
    };
    let text = String::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;

    adapter.parse(&text).map_err(|e| match e {
        AdapterError::Empty => Error::EmptyInput {
            path: path.to_path_buf(),
        },
        AdapterError::Parse(message) | AdapterError::Serialize(message) => parse_error(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn load(path: &Path) -> Result<Tree> {
        let registry = FormatRegistry::builtin();
        let resolver = Resolver::new(&registry, ResolveOptions::default());
        resolver.load(path, &mut Vec::new(), None)
    }

    #[test]
    fn test_load_without_directives() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.ini");
        fs::write(&file, "test=true\n").unwrap();

        assert_eq!(load(&file).unwrap(), json!({"test": true}));
    }

    #[test]
    fn test_reference_splices_resolved_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.ini");
        fs::write(&file, "test=true\n").unwrap();
        let refs = dir.path().join("file-refmerge.ini");
        fs::write(&refs, format!("[$ref]\nanother={}\n", file.display())).unwrap();

        assert_eq!(load(&refs).unwrap(), json!({"another": {"test": true}}));
    }

    #[test]
    fn test_reference_relative_to_declaring_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/db.yaml"), "host: localhost\n").unwrap();
        fs::write(
            dir.path().join("nested/app.yaml"),
            "$ref:\n  database: db.yaml\n",
        )
        .unwrap();
        let root = dir.path().join("root.yaml");
        fs::write(&root, "name: demo\n$ref:\n  app: nested/app.yaml\n").unwrap();

        assert_eq!(
            load(&root).unwrap(),
            json!({"name": "demo", "app": {"database": {"host": "localhost"}}})
        );
    }

    #[test]
    fn test_nested_mapping_directives() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("creds.json"), r#"{"user": "admin"}"#).unwrap();
        let root = dir.path().join("root.json");
        fs::write(
            &root,
            r#"{"services": [{"name": "db", "$ref": {"auth": "creds.json"}}]}"#,
        )
        .unwrap();

        assert_eq!(
            load(&root).unwrap(),
            json!({"services": [{"name": "db", "auth": {"user": "admin"}}]})
        );
    }

    #[test]
    fn test_reference_to_empty_file_fails() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.ini");
        fs::write(&empty, "").unwrap();
        let root = dir.path().join("root.ini");
        fs::write(&root, "[$ref]\nother=empty.ini\n").unwrap();

        let err = load(&root).unwrap_err();
        assert!(matches!(err, Error::EmptyInput { ref path } if path == &empty));
    }

    #[test]
    fn test_missing_reference_fails() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root.yaml");
        fs::write(&root, "$ref:\n  other: missing.yaml\n").unwrap();

        assert!(matches!(load(&root).unwrap_err(), Error::Read { .. }));
    }

    #[test]
    fn test_cycle_detected() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.yaml");
        let b = dir.path().join("b.yaml");
        fs::write(&a, "$ref:\n  b: b.yaml\n").unwrap();
        fs::write(&b, "$ref:\n  a: a.yaml\n").unwrap();

        match load(&a).unwrap_err() {
            Error::CyclicReference { chain } => {
                assert_eq!(chain.len(), 3);
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_detected() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.json");
        fs::write(&a, r#"{"$ref": {"me": "./a.json"}}"#).unwrap();

        assert!(matches!(
            load(&a).unwrap_err(),
            Error::CyclicReference { .. }
        ));
    }

    #[test]
    fn test_same_file_twice_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("shared.yaml"), "x: 1\n").unwrap();
        let root = dir.path().join("root.yaml");
        fs::write(&root, "$ref:\n  a: shared.yaml\n  b: shared.yaml\n").unwrap();

        assert_eq!(load(&root).unwrap(), json!({"a": {"x": 1}, "b": {"x": 1}}));
    }

    #[test]
    fn test_unknown_extension_inherits_parent_format() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("extra"), "k: v\n").unwrap();
        let root = dir.path().join("root.yaml");
        fs::write(&root, "$ref:\n  extra: extra\n").unwrap();

        assert_eq!(load(&root).unwrap(), json!({"extra": {"k": "v"}}));
    }

    #[test]
    fn test_unknown_extension_at_root_fails() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("settings.txt");
        fs::write(&root, "a=1\n").unwrap();

        assert!(matches!(
            load(&root).unwrap_err(),
            Error::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("broken.json");
        fs::write(&root, "{\"a\": ").unwrap();

        match load(&root).unwrap_err() {
            Error::Parse { path, format, .. } => {
                assert_eq!(path, root);
                assert_eq!(format, "JSON");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
