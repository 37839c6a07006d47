use crate::{
    COMPANION_DIR_ENV, LAUNCHER_BIN_DIR, NODE_MODULES_DIR, SupervisorError, SupervisorResult,
};

use std::path::{Path, PathBuf};

use log::{debug, info};
use pmxt_config::SupervisorConfig;

/// One strategy for finding the launcher executable.
pub trait LauncherResolver: Send + Sync {
    /// Short name used in logs and "not found" errors.
    fn name(&self) -> &'static str;

    fn resolve(&self) -> Option<PathBuf>;
}

/// Ordered list of resolvers; the first hit wins.
pub struct LauncherLocator {
    command: String,
    resolvers: Vec<Box<dyn LauncherResolver>>,
}

impl LauncherLocator {
    pub fn new(command: impl Into<String>, resolvers: Vec<Box<dyn LauncherResolver>>) -> Self {
        Self {
            command: command.into(),
            resolvers,
        }
    }

    /// Search order:
    /// 1. `<companion package>/bin/<command>`
    /// 2. `<dir of current exe>/bin/<command>` (bundled with the SDK)
    /// 3. `<command>` on PATH
    pub fn for_config(config: &SupervisorConfig) -> Self {
        let command = config.launcher_command.clone();
        let resolvers: Vec<Box<dyn LauncherResolver>> = vec![
            Box::new(CompanionPackageResolver::discover(
                &config.companion_package,
                &command,
            )),
            Box::new(BundledResolver::from_current_exe(&command)),
            Box::new(SearchPathResolver::new(&command)),
        ];
        Self::new(command, resolvers)
    }

    pub fn locate(&self) -> SupervisorResult<PathBuf> {
        for resolver in &self.resolvers {
            if let Some(path) = resolver.resolve() {
                info!("Using {} ({}): {}", self.command, resolver.name(), path.display());
                return Ok(path);
            }
            debug!("{} not found via {}", self.command, resolver.name());
        }

        let searched: Vec<&str> = self.resolvers.iter().map(|r| r.name()).collect();
        Err(SupervisorError::launcher_not_found(&self.command, &searched))
    }
}

/// Finds the launcher in an installed companion package's `bin/` directory.
pub struct CompanionPackageResolver {
    command: String,
    package_dirs: Vec<PathBuf>,
}

impl CompanionPackageResolver {
    pub fn new(command: impl Into<String>, package_dirs: Vec<PathBuf>) -> Self {
        Self {
            command: command.into(),
            package_dirs,
        }
    }

    /// Candidate package directories, in order:
    /// `PMXT_CORE_DIR`, then `node_modules/<package>` in the current
    /// directory and each of its ancestors.
    pub fn discover(package: &str, command: &str) -> Self {
        let mut package_dirs = Vec::new();

        if let Ok(dir) = std::env::var(COMPANION_DIR_ENV)
            && !dir.is_empty()
        {
            package_dirs.push(PathBuf::from(dir));
        }

        if let Ok(cwd) = std::env::current_dir() {
            package_dirs.extend(Self::node_modules_candidates(&cwd, package));
        }

        Self::new(command, package_dirs)
    }

    /// `<ancestor>/node_modules/<package>` for `start` and every ancestor.
    pub fn node_modules_candidates(start: &Path, package: &str) -> Vec<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(NODE_MODULES_DIR).join(package))
            .collect()
    }

    pub fn package_dirs(&self) -> &[PathBuf] {
        &self.package_dirs
    }
}

impl LauncherResolver for CompanionPackageResolver {
    fn name(&self) -> &'static str {
        "companion package"
    }

    fn resolve(&self) -> Option<PathBuf> {
        self.package_dirs
            .iter()
            .map(|dir| dir.join(LAUNCHER_BIN_DIR).join(&self.command))
            .find(|candidate| candidate.is_file())
    }
}

/// Finds a launcher shipped next to the running executable.
pub struct BundledResolver {
    command: String,
    bin_dir: Option<PathBuf>,
}

impl BundledResolver {
    pub fn new(command: impl Into<String>, bin_dir: Option<PathBuf>) -> Self {
        Self {
            command: command.into(),
            bin_dir,
        }
    }

    pub fn from_current_exe(command: &str) -> Self {
        let bin_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(LAUNCHER_BIN_DIR)));
        Self::new(command, bin_dir)
    }
}

impl LauncherResolver for BundledResolver {
    fn name(&self) -> &'static str {
        "bundled"
    }

    fn resolve(&self) -> Option<PathBuf> {
        let candidate = self.bin_dir.as_ref()?.join(&self.command);
        candidate.is_file().then_some(candidate)
    }
}

/// Looks the bare command name up on PATH.
pub struct SearchPathResolver {
    command: String,
}

impl SearchPathResolver {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl LauncherResolver for SearchPathResolver {
    fn name(&self) -> &'static str {
        "PATH"
    }

    fn resolve(&self) -> Option<PathBuf> {
        which::which(&self.command).ok()
    }
}
