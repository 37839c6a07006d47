use crate::tests::{FakeSpawner, FixedResolver, LAUNCHER, fake_launcher};
use crate::{
    BundledResolver, CompanionPackageResolver, LauncherLocator, LauncherResolver,
    SearchPathResolver, SupervisorError,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq};
use tempfile::TempDir;

fn touch_launcher(bin_dir: &Path) -> PathBuf {
    std::fs::create_dir_all(bin_dir).unwrap();
    let path = bin_dir.join(LAUNCHER);
    std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    path
}

// =========================================================================
// Locator
// =========================================================================

#[test]
fn test_locator_returns_first_resolver_hit() {
    let locator = LauncherLocator::new(
        LAUNCHER,
        vec![
            Box::new(FixedResolver {
                name: "first",
                path: None,
            }),
            Box::new(FixedResolver {
                name: "second",
                path: Some(PathBuf::from("/opt/pmxt/bin/pmxt-ensure-server")),
            }),
            Box::new(FixedResolver {
                name: "third",
                path: Some(PathBuf::from("/usr/bin/pmxt-ensure-server")),
            }),
        ],
    );

    let path = locator.locate().unwrap();

    assert_eq!(path, PathBuf::from("/opt/pmxt/bin/pmxt-ensure-server"));
}

#[test]
fn test_locator_with_no_hit_reports_every_strategy() {
    let locator = LauncherLocator::new(
        LAUNCHER,
        vec![
            Box::new(FixedResolver {
                name: "companion package",
                path: None,
            }),
            Box::new(FixedResolver {
                name: "PATH",
                path: None,
            }),
        ],
    );

    let err = locator.locate().unwrap_err();

    assert!(matches!(err, SupervisorError::LauncherNotFound { .. }));
    assert!(err.is_launch_failure());
    let msg = err.to_string();
    assert_that!(msg, contains_substring(LAUNCHER));
    assert_that!(msg, contains_substring("companion package, PATH"));
}

// =========================================================================
// Resolvers
// =========================================================================

#[test]
fn test_companion_package_resolves_bin_launcher() {
    let temp = TempDir::new().unwrap();
    let package_dir = temp.path().join("pmxtjs");
    let expected = touch_launcher(&package_dir.join("bin"));

    let resolver = CompanionPackageResolver::new(LAUNCHER, vec![package_dir]);

    assert_eq!(resolver.resolve(), Some(expected));
}

#[test]
fn test_companion_package_skips_dirs_without_launcher() {
    let temp = TempDir::new().unwrap();
    let empty = temp.path().join("empty-package");
    std::fs::create_dir_all(empty.join("bin")).unwrap();
    let installed = temp.path().join("installed-package");
    let expected = touch_launcher(&installed.join("bin"));

    let resolver = CompanionPackageResolver::new(LAUNCHER, vec![empty, installed]);

    assert_eq!(resolver.resolve(), Some(expected));
}

#[test]
fn test_companion_package_ignores_directory_named_like_launcher() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("bin").join(LAUNCHER)).unwrap();

    let resolver = CompanionPackageResolver::new(LAUNCHER, vec![temp.path().to_path_buf()]);

    assert_eq!(resolver.resolve(), None);
}

#[cfg(unix)]
#[test]
fn test_node_modules_candidates_walk_up_ancestors() {
    let start = Path::new("/work/app/src");

    let candidates = CompanionPackageResolver::node_modules_candidates(start, "pmxtjs");

    assert_eq!(
        candidates,
        vec![
            PathBuf::from("/work/app/src/node_modules/pmxtjs"),
            PathBuf::from("/work/app/node_modules/pmxtjs"),
            PathBuf::from("/work/node_modules/pmxtjs"),
            PathBuf::from("/node_modules/pmxtjs"),
        ]
    );
}

#[test]
fn test_bundled_resolver_finds_launcher_in_bin_dir() {
    let temp = TempDir::new().unwrap();
    let bin_dir = temp.path().join("bin");
    let expected = touch_launcher(&bin_dir);

    let resolver = BundledResolver::new(LAUNCHER, Some(bin_dir));

    assert_eq!(resolver.resolve(), Some(expected));
}

#[test]
fn test_bundled_resolver_without_dir_resolves_nothing() {
    let resolver = BundledResolver::new(LAUNCHER, None);

    assert_eq!(resolver.resolve(), None);
}

#[test]
fn test_search_path_resolver_misses_unknown_command() {
    let resolver = SearchPathResolver::new("pmxt-definitely-not-installed-7f3a");

    assert_eq!(resolver.resolve(), None);
    assert_that!(resolver.name(), eq("PATH"));
}

// =========================================================================
// ProcessLauncher
// =========================================================================

#[test]
fn test_launch_spawns_resolved_program() {
    let spawner = Arc::new(FakeSpawner::ok(4242));
    let program = PathBuf::from("/opt/pmxt/bin/pmxt-ensure-server");
    let launcher = fake_launcher(Some(program.clone()), spawner.clone());

    let launched = launcher.launch().unwrap();

    assert_eq!(launched.pid, 4242);
    assert_eq!(launched.program, program);
    assert_eq!(spawner.spawned(), vec![program]);
}

#[test]
fn test_launch_spawn_error_becomes_launch_failed_with_cause() {
    let spawner = Arc::new(FakeSpawner::failing(std::io::ErrorKind::NotFound));
    let launcher = fake_launcher(Some(PathBuf::from(LAUNCHER)), spawner.clone());

    let err = launcher.launch().unwrap_err();

    match err {
        SupervisorError::LaunchFailed { source, .. } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected LaunchFailed, got {other:?}"),
    }
    assert_eq!(spawner.spawned().len(), 1);
}

#[test]
fn test_launch_without_launcher_never_spawns() {
    let spawner = Arc::new(FakeSpawner::ok(1));
    let launcher = fake_launcher(None, spawner.clone());

    let err = launcher.launch().unwrap_err();

    assert!(matches!(err, SupervisorError::LauncherNotFound { .. }));
    assert!(spawner.spawned().is_empty());
}

// =========================================================================
// DetachedSpawner (real processes)
// =========================================================================

#[cfg(unix)]
#[tokio::test]
async fn test_detached_spawner_starts_executable() {
    use crate::{DetachedSpawner, ProcessSpawner};

    let program = which::which("true").unwrap();

    let pid = DetachedSpawner.spawn_detached(&program).unwrap();

    assert!(pid > 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_detached_spawner_exited_child_is_reaped() {
    use crate::{DetachedSpawner, ProcessSpawner};

    let program = which::which("true").unwrap();
    let pid = DetachedSpawner.spawn_detached(&program).unwrap();

    // the runtime reaps the dropped child while it is parked
    let mut gone = false;
    for _ in 0..250 {
        if !pmxt_config::is_process_running(pid) {
            gone = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    assert!(gone, "pid {pid} still present (zombie)");
}

#[tokio::test]
async fn test_detached_spawner_missing_program_is_not_found() {
    use crate::{DetachedSpawner, ProcessSpawner};

    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("no-such-launcher");

    let err = DetachedSpawner.spawn_detached(&missing).unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
