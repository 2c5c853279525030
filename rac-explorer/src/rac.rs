//! Argument building for the `rac` administration client
//!
//! Every invocation is a program path plus discrete argument tokens; nothing is
//! ever handed to a shell.

use std::fmt;
use std::path::PathBuf;

use crate::config::RacConfig;

pub const DEFAULT_RAC_PATH: &str = "/opt/1C/v8.3/x86_64/rac";

const PASSWORD_FLAG: &str = "--cluster-pwd=";

/// One external command: program and its argument tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.starts_with(PASSWORD_FLAG) {
                write!(f, " {PASSWORD_FLAG}***")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Builds `rac` invocations for one RAS endpoint
#[derive(Debug, Clone)]
pub struct RacCommand {
    path: PathBuf,
    ras_address: Option<String>,
    cluster_user: Option<String>,
    cluster_password: Option<String>,
}

impl Default for RacCommand {
    fn default() -> Self {
        Self::new(DEFAULT_RAC_PATH)
    }
}

impl RacCommand {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ras_address: None,
            cluster_user: None,
            cluster_password: None,
        }
    }

    pub fn from_config(config: &RacConfig) -> Self {
        Self {
            path: config.path.clone(),
            ras_address: config.ras_address.clone(),
            cluster_user: config.cluster_user.clone(),
            cluster_password: config.cluster_password.clone(),
        }
    }

    /// Target a remote RAS (`host[:port]`) instead of the local default
    pub fn with_ras_address(mut self, address: impl Into<String>) -> Self {
        self.ras_address = Some(address.into());
        self
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: Option<String>) -> Self {
        self.cluster_user = Some(user.into());
        self.cluster_password = password;
        self
    }

    /// `rac [addr] cluster list`
    pub fn cluster_list(&self) -> Invocation {
        let mut args = self.base_args();
        args.extend(["cluster".to_string(), "list".to_string()]);
        Invocation::new(self.path.clone(), args)
    }

    /// `rac [addr] process list --cluster=<id> [credentials]`
    pub fn process_list(&self, cluster_id: &str) -> Invocation {
        let mut args = self.base_args();
        args.extend([
            "process".to_string(),
            "list".to_string(),
            format!("--cluster={cluster_id}"),
        ]);
        if let Some(user) = &self.cluster_user {
            args.push(format!("--cluster-user={user}"));
        }
        if let Some(password) = &self.cluster_password {
            args.push(format!("{PASSWORD_FLAG}{password}"));
        }
        Invocation::new(self.path.clone(), args)
    }

    fn base_args(&self) -> Vec<String> {
        self.ras_address.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_invocations() {
        let rac = RacCommand::default();

        let cluster = rac.cluster_list();
        assert_eq!(cluster.program, PathBuf::from(DEFAULT_RAC_PATH));
        assert_eq!(cluster.args, vec!["cluster", "list"]);

        let process = rac.process_list("ee5adb9a-14fa-11e9-7589-005056032522");
        assert_eq!(
            process.args,
            vec!["process", "list", "--cluster=ee5adb9a-14fa-11e9-7589-005056032522"]
        );
    }

    #[test]
    fn test_ras_address_precedes_mode() {
        let rac = RacCommand::new("rac").with_ras_address("srv1c:1545");
        assert_eq!(rac.cluster_list().args, vec!["srv1c:1545", "cluster", "list"]);
        assert_eq!(rac.process_list("c1").args[0], "srv1c:1545");
    }

    #[test]
    fn test_cluster_id_is_a_single_token() {
        let rac = RacCommand::new("rac");
        let invocation = rac.process_list("x; rm -rf /");
        assert_eq!(invocation.args.len(), 3);
        assert_eq!(invocation.args[2], "--cluster=x; rm -rf /");
    }

    #[test]
    fn test_display_masks_password() {
        let rac = RacCommand::new("rac").with_credentials("admin", Some("s3cret".to_string()));
        let invocation = rac.process_list("c1");
        assert!(invocation.args.contains(&"--cluster-pwd=s3cret".to_string()));

        let rendered = invocation.to_string();
        assert_eq!(
            rendered,
            "rac process list --cluster=c1 --cluster-user=admin --cluster-pwd=***"
        );
        assert!(!rendered.contains("s3cret"));
    }
}
