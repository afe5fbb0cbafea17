/*!
Command handlers for the CLI

Each subcommand of `secquiz` maps to one handler here:

- `auth`:      login, register, logout, whoami
- `topics`:    list the quiz topics
- `quiz`:      interactive multiple-choice quiz
- `chat`:      open-ended question practice
- `analytics`: performance, history, and progress views

Handlers are thin: they wire the configured service and local store
into the controllers and print what comes back.
*/

use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::HttpQuizService;
use crate::config::Config;
use crate::error::Result;
use crate::storage::LocalStore;

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod quiz;
pub mod topics;

/// Build a service client carrying the stored bearer token
///
/// # Errors
///
/// Returns `NotAuthenticated` when no token is stored, before any
/// request is made
pub(crate) fn authorized_service(
    config: &Config,
    store: &LocalStore,
) -> Result<Arc<HttpQuizService>> {
    let token = store.require_token()?;
    let service = HttpQuizService::new(&config.server)?.with_token(token);
    tracing::debug!("Using service at {}", service.base_url());
    Ok(Arc::new(service))
}

/// Read one line; `None` on Ctrl-C or Ctrl-D
pub(crate) fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Ask a yes/no question, defaulting to `default` on an empty answer
pub(crate) fn confirm(rl: &mut DefaultEditor, prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let Some(answer) = read_line(rl, &format!("{} {} ", prompt, hint))? else {
        return Ok(false);
    };
    Ok(parse_yes_no(&answer, default))
}

fn parse_yes_no(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SecquizError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yes_no() {
        assert!(parse_yes_no("", true));
        assert!(!parse_yes_no("", false));
        assert!(parse_yes_no(" Yes ", false));
        assert!(parse_yes_no("y", false));
        assert!(!parse_yes_no("nope", true));
    }

    #[test]
    fn test_authorized_service_requires_token() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new_with_path(dir.path().join("client.json")).unwrap();
        let err = authorized_service(&Config::default(), &store).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SecquizError>(),
            Some(SecquizError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_authorized_service_with_token() {
        let dir = tempdir().unwrap();
        let mut store = LocalStore::new_with_path(dir.path().join("client.json")).unwrap();
        store.save_token("abc").unwrap();
        let service = authorized_service(&Config::default(), &store).unwrap();
        assert!(service.has_token());
    }
}
