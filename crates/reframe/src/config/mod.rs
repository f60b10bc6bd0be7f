use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

const DEFAULT_OUT_SEGMENTS: [&str; 2] = [".reframe", "output"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    pub home_dir: PathBuf,
    pub cwd: PathBuf,
    pub out_dir: PathBuf,
}

/// Resolves the artifact output root from the global CLI flags.
///
/// Absolute overrides are taken as-is, `~`-prefixed ones expand
/// against the home directory, and relative ones resolve against the
/// working directory; all three are lexically cleaned. Without an
/// override the artifacts land under `<home>/.reframe/output`.
pub fn resolve_runtime_paths(
    home_dir: &Path,
    cwd: &Path,
    out_dir_override: Option<&Path>,
) -> Result<RuntimePaths> {
    if !home_dir.is_absolute() {
        bail!("home dir must be an absolute path: {}", home_dir.display());
    }
    if !cwd.is_absolute() {
        bail!("working dir must be an absolute path: {}", cwd.display());
    }

    let home_dir = lexical_clean(home_dir);
    let cwd = lexical_clean(cwd);

    let out_dir = match out_dir_override {
        None => DEFAULT_OUT_SEGMENTS
            .iter()
            .fold(home_dir.clone(), |dir, segment| dir.join(segment)),
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => match strip_home_prefix(path)? {
            Some(under_home) => home_dir.join(under_home),
            None => cwd.join(path),
        },
    };

    Ok(RuntimePaths {
        home_dir,
        cwd,
        out_dir: lexical_clean(&out_dir),
    })
}

/// Splits a `~`-prefixed path into its home-relative remainder.
/// Only bare `~` and `~/...` are supported; `~user` syntax is not.
fn strip_home_prefix(path: &Path) -> Result<Option<PathBuf>> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            Ok(Some(components.as_path().to_path_buf()))
        }
        Some(Component::Normal(first))
            if first
                .to_str()
                .is_some_and(|segment| segment.starts_with('~')) =>
        {
            bail!(
                "`~user` expansion is not supported (use `~` or `~/...`): {}",
                path.display()
            )
        }
        _ => Ok(None),
    }
}

/// Removes `.` segments and folds `..` against preceding segments
/// without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(component.as_os_str());
                }
            }
            _ => cleaned.push(component.as_os_str()),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::resolve_runtime_paths;

    #[test]
    fn defaults_artifacts_under_home_reframe_output() {
        let paths =
            resolve_runtime_paths(Path::new("/home/casework"), Path::new("/srv/app"), None)
                .expect("paths should resolve");

        assert_eq!(paths.out_dir, Path::new("/home/casework/.reframe/output"));
    }

    #[test]
    fn expands_tilde_overrides_against_home() {
        let paths = resolve_runtime_paths(
            Path::new("/home/casework"),
            Path::new("/srv/app"),
            Some(Path::new("~/exports/reframe")),
        )
        .expect("tilde override should resolve");

        assert_eq!(paths.out_dir, Path::new("/home/casework/exports/reframe"));
    }

    #[test]
    fn resolves_relative_overrides_against_cwd_with_cleanup() {
        let paths = resolve_runtime_paths(
            Path::new("/home/casework"),
            Path::new("/srv/app"),
            Some(Path::new("./out/../out/runs")),
        )
        .expect("relative override should resolve");

        assert_eq!(paths.out_dir, Path::new("/srv/app/out/runs"));
    }

    #[test]
    fn rejects_relative_home_and_tilde_user_syntax() {
        let err = resolve_runtime_paths(Path::new("home"), Path::new("/srv/app"), None)
            .expect_err("relative home must fail");
        assert!(err.to_string().contains("absolute path"), "unexpected error: {err}");

        let err = resolve_runtime_paths(
            Path::new("/home/casework"),
            Path::new("/srv/app"),
            Some(Path::new("~alice/out")),
        )
        .expect_err("~user syntax must fail");
        assert!(
            err.to_string().contains("`~user` expansion is not supported"),
            "unexpected error: {err}"
        );
    }
}
