#![allow(dead_code)]

use std::path::Path;

use simplecmd::Command;
use simplecmd::exec::SessionEnv;

/// `sh -c <script>` run directly as the program, in `workdir`.
pub fn sh(script: &str, workdir: &Path, env: &SessionEnv) -> Command {
    Command::new("sh", ["-c", script], workdir).with_env(env.clone())
}

/// Names of the entries in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
