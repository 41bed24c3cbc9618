use tokio::process::Command;
use tracing::{debug, warn};

/// Reads messages aloud through an external synthesizer (`espeak`, `say`, ...).
#[derive(Debug, Clone, Default)]
pub struct Speech {
    command: Option<String>,
}

impl Speech {
    pub fn new(command: Option<String>) -> Self {
        let command = command.filter(|c| !c.trim().is_empty());
        Speech { command }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }

    /// Builds the synthesizer invocation. The command line is split on
    /// whitespace; the text is passed as the last argument.
    fn command_for(&self, text: &str) -> Option<Command> {
        let mut parts = self.command.as_deref()?.split_whitespace();
        let mut cmd = Command::new(parts.next()?);
        cmd.args(parts)
            .arg(text)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        Some(cmd)
    }

    /// Fire and forget. Must be called from inside a tokio runtime.
    pub fn speak(&self, text: &str) {
        let Some(mut cmd) = self.command_for(text) else {
            debug!("no speech command configured");
            return;
        };
        match cmd.spawn() {
            Ok(mut child) => {
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if !status.success() => {
                            warn!(%status, "speech synthesizer exited with failure")
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "speech synthesizer did not finish"),
                    }
                });
            }
            Err(e) => warn!(error = %e, "failed to start speech synthesizer"),
        }
    }
}
