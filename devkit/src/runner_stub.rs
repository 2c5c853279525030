/*!
Runner scripté pour tester les explorers sans installation 1C

Remplace `ProcessRunner` : aucune commande n'est lancée, chaque invocation est
enregistrée et reçoit la réponse scriptée pour le motif d'arguments qui la
reconnaît (`["cluster", "list"]`, `["process", "list"]`...).
*/

use async_trait::async_trait;
use parking_lot::Mutex;
use rac_explorer::{CommandError, CommandRunner, Invocation};
use std::collections::VecDeque;
use std::process::ExitStatus;
use std::sync::Arc;

/// Réponse simulée d'une commande
#[derive(Debug, Clone)]
pub enum Reply {
    /// Sortie standard, code de retour 0
    Stdout(String),
    /// Code de retour non nul avec stderr
    Exit { code: i32, stderr: String },
    /// Échec de lancement (binaire introuvable...)
    SpawnError(String),
    /// Ne rend jamais la main (commande bloquée)
    Hang,
}

impl Reply {
    pub fn stdout<S: Into<String>>(output: S) -> Self {
        Reply::Stdout(output.into())
    }

    pub fn exit<S: Into<String>>(code: i32, stderr: S) -> Self {
        Reply::Exit {
            code,
            stderr: stderr.into(),
        }
    }
}

struct Rule {
    pattern: Vec<String>,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
struct Inner {
    rules: Vec<Rule>,
    invocations: Vec<Invocation>,
}

/// Runner qui simule `rac`, partageable entre le test et l'explorer
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une réponse pour les invocations contenant `pattern`.
    ///
    /// Les réponses d'un même motif sont servies dans l'ordre, la dernière
    /// reste active pour tous les appels suivants.
    pub fn respond(&self, pattern: &[&str], reply: Reply) -> &Self {
        let pattern: Vec<String> = pattern.iter().map(|p| p.to_string()).collect();
        let mut inner = self.inner.lock();
        match inner.rules.iter_mut().find(|r| r.pattern == pattern) {
            Some(rule) => rule.replies.push_back(reply),
            None => inner.rules.push(Rule {
                pattern,
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// Toutes les invocations reçues (pour assertions de tests)
    pub fn invocations(&self) -> Vec<Invocation> {
        self.inner.lock().invocations.clone()
    }

    /// Nombre d'invocations contenant `pattern`
    pub fn count_matching(&self, pattern: &[&str]) -> usize {
        self.inner
            .lock()
            .invocations
            .iter()
            .filter(|inv| matches_pattern(&inv.args, pattern))
            .count()
    }

    /// Reset des réponses et de l'historique
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.rules.clear();
        inner.invocations.clear();
    }

    fn next_reply(&self, invocation: &Invocation) -> Option<Reply> {
        let mut inner = self.inner.lock();
        inner.invocations.push(invocation.clone());

        let rule = inner
            .rules
            .iter_mut()
            .find(|r| matches_pattern(&invocation.args, &r.pattern))?;
        if rule.replies.len() > 1 {
            rule.replies.pop_front()
        } else {
            rule.replies.front().cloned()
        }
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String, CommandError> {
        let command = invocation.to_string();
        tracing::debug!(command = %command, "[MOCK] run");

        match self.next_reply(invocation) {
            Some(Reply::Stdout(output)) => Ok(output),
            Some(Reply::Exit { code, stderr }) => Err(CommandError::Status {
                command,
                status: exit_status(code),
                stderr,
            }),
            Some(Reply::SpawnError(message)) => Err(CommandError::Spawn {
                command,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
            }),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(CommandError::Spawn {
                command,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no scripted reply"),
            }),
        }
    }
}

fn matches_pattern<S: AsRef<str>>(args: &[String], pattern: &[S]) -> bool {
    if pattern.is_empty() {
        return true;
    }
    args.windows(pattern.len())
        .any(|w| w.iter().zip(pattern).all(|(a, p)| a == p.as_ref()))
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}
