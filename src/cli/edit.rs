use std::{env, path::Path};

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::debug;

pub const EDITOR_VAR: &str = "EDITOR";

/// Opens the log in `$EDITOR` and waits for the editor to exit.
pub async fn edit_log(path: &Path) -> Result<()> {
    let editor = env::var(EDITOR_VAR).unwrap_or_default();
    let mut command = editor_command(&editor)?;
    debug!("Running {editor} on {}", path.display());

    let status = command
        .arg(path)
        .status()
        .await
        .with_context(|| format!("Failed to start editor {editor}"))?;
    if !status.success() {
        bail!("Editor {editor} exited with {status}");
    }
    Ok(())
}

/// `$EDITOR` may carry arguments, e.g. `code --wait`.
fn editor_command(editor: &str) -> Result<Command> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("{EDITOR_VAR} is not set");
    };
    let mut command = Command::new(program);
    command.args(parts);
    Ok(command)
}
