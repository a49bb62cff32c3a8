/*
Pre-build hook for the printer firmware.

TFT_eSPI reads its pin and driver setup from a User_Setup.h inside its own library folder,
so our copy in include/ has to be placed there before anything that pulls in the display
driver is compiled. HardwareAbstraction.cpp is the first such translation unit.
*/

use filetime::FileTime;
use log::info;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Object file whose compilation triggers the copy
pub const HOOK_TARGET: &str = "$BUILD_DIR/src/HardwareAbstraction.cpp.o";
pub const USER_SETUP_FILE: &str = "User_Setup.h";
/// Project-relative folder holding our User_Setup.h
pub const INCLUDE_DIR: &str = "include";
/// Name of the display library folder under the library directory
pub const DISPLAY_LIB: &str = "TFT_eSPI";

pub type PreAction = Box<dyn Fn(&BuildEnv) -> io::Result<()>>;

#[derive(Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { destination: PathBuf },
    /// Nothing to copy; the library's default setup stays in place
    SourceMissing,
}

/// Paths of the firmware project being built and the callbacks registered against its targets.
pub struct BuildEnv {
    project_dir: PathBuf,
    lib_dir: PathBuf,
    pre_actions: HashMap<String, Vec<PreAction>>,
}

impl BuildEnv {
    pub fn new(project_dir: impl Into<PathBuf>, lib_dir: impl Into<PathBuf>) -> Self {
        BuildEnv {
            project_dir: project_dir.into(),
            lib_dir: lib_dir.into(),
            pre_actions: HashMap::new(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// Register `action` to run before `target` is built. Actions for the same target run in
    /// the order they were added.
    pub fn add_pre_action<F>(&mut self, target: &str, action: F)
    where
        F: Fn(&BuildEnv) -> io::Result<()> + 'static,
    {
        self.pre_actions
            .entry(target.to_string())
            .or_default()
            .push(Box::new(action));
    }

    /// Run every action registered for `target`, stopping at the first failure.
    /// Returns how many actions ran to completion.
    pub fn run_pre_actions(&self, target: &str) -> io::Result<usize> {
        let Some(actions) = self.pre_actions.get(target) else {
            return Ok(0);
        };

        for action in actions {
            action(self)?;
        }
        Ok(actions.len())
    }
}

/// Copy `<project_dir>/include/User_Setup.h` into `<lib_dir>/TFT_eSPI/`, creating the library
/// folder when needed and overwriting any previous copy. The copy keeps the source's
/// modification time. A missing source file is not an error and leaves the filesystem untouched.
pub fn copy_user_setup(project_dir: &Path, lib_dir: &Path) -> io::Result<CopyOutcome> {
    let source = project_dir.join(INCLUDE_DIR).join(USER_SETUP_FILE);
    if !source.is_file() {
        return Ok(CopyOutcome::SourceMissing);
    }

    let lib_path = lib_dir.join(DISPLAY_LIB);
    fs::create_dir_all(&lib_path)?;

    let destination = lib_path.join(USER_SETUP_FILE);
    fs::copy(&source, &destination)?;
    let modified = FileTime::from_last_modification_time(&fs::metadata(&source)?);
    filetime::set_file_mtime(&destination, modified)?;
    Ok(CopyOutcome::Copied { destination })
}

/// Hook the User_Setup.h copy onto the HardwareAbstraction object file.
pub fn register_user_setup_hook(env: &mut BuildEnv) {
    env.add_pre_action(HOOK_TARGET, |env| {
        if let CopyOutcome::Copied { destination } = copy_user_setup(env.project_dir(), env.lib_dir())? {
            info!("Copied {} to {}", USER_SETUP_FILE, destination.display());
        }
        Ok(())
    });
}
