//! Launches the external object editor

use std::process::{Child, Command};

#[derive(Debug, Default)]
pub struct EditorLauncher {
    command: Vec<String>,
    child: Option<Child>,
}

impl EditorLauncher {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            child: None,
        }
    }

    /// Whether a launched editor is still alive
    pub fn is_running(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                log::info!("editor exited ({})", status);
                self.child = None;
                false
            }
            Err(e) => {
                log::warn!("editor status: {}", e);
                self.child = None;
                false
            }
        }
    }

    /// Start the editor unless one is already running. Returns whether a
    /// new process was started.
    pub fn launch(&mut self) -> std::io::Result<bool> {
        if self.is_running() {
            log::debug!("editor already running");
            return Ok(false);
        }
        let Some((program, args)) = self.command.split_first() else {
            log::debug!("no editor command configured");
            return Ok(false);
        };
        let child = Command::new(program).args(args).spawn()?;
        log::info!("launched editor: {} (pid {})", self.command.join(" "), child.id());
        self.child = Some(child);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_launch_is_noop() {
        let mut launcher = EditorLauncher::new(Vec::new());
        assert!(launcher.command.is_empty());
        assert!(!launcher.launch().unwrap());
        assert!(!launcher.is_running());
    }

    #[test]
    fn test_missing_program_is_error() {
        let mut launcher = EditorLauncher::new(vec!["definitely-not-a-real-editor-binary".into()]);
        assert!(launcher.launch().is_err());
        assert!(!launcher.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_launch_while_running_is_noop() {
        let mut launcher = EditorLauncher::new(vec!["sleep".into(), "2".into()]);
        assert!(launcher.launch().unwrap());
        assert!(launcher.is_running());
        assert!(!launcher.launch().unwrap());
        if let Some(child) = launcher.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
