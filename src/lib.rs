//! Workspace stub. Exists so cargo-husky installs the git hooks.
