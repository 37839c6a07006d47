//! Locating and starting the server launcher.

mod locator;
mod process_launcher;
mod spawner;

pub use locator::{
    BundledResolver, CompanionPackageResolver, LauncherLocator, LauncherResolver,
    SearchPathResolver,
};
pub use process_launcher::{LaunchedProcess, ProcessLauncher};
pub use spawner::{DetachedSpawner, ProcessSpawner};
