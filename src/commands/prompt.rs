//! Terminal prompts for missing credentials
//!
//! One rustyline editor serves every field. Its helper masks the line while
//! a secret is being typed, so passwords never reach the screen.

use std::borrow::Cow::{self, Borrowed, Owned};

use rustyline::completion::Completer;
use rustyline::config::{ColorMode, Configurer};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};

use crate::error::{PalaverError, Result};

/// Editor used for credential prompts.
pub type CredentialEditor = Editor<CredentialHelper, DefaultHistory>;

/// Rustyline helper that replaces the typed line with `*` while masking.
#[derive(Debug, Default, Clone)]
pub struct CredentialHelper {
    masking: bool,
}

impl CredentialHelper {
    /// Whether input is currently masked.
    pub fn is_masking(&self) -> bool {
        self.masking
    }
}

impl Helper for CredentialHelper {}

impl Completer for CredentialHelper {
    type Candidate = String;
}

impl Hinter for CredentialHelper {
    type Hint = String;
}

impl Validator for CredentialHelper {}

impl Highlighter for CredentialHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Owned("*".repeat(line.chars().count()))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

/// Builds the credential editor.
///
/// Colour mode is forced so the masking highlighter runs even when the
/// terminal would otherwise disable highlighting.
pub fn credential_editor() -> Result<CredentialEditor> {
    let mut rl = CredentialEditor::new().map_err(PalaverError::Readline)?;
    rl.set_helper(Some(CredentialHelper::default()));
    rl.set_color_mode(ColorMode::Forced);
    rl.set_auto_add_history(false);
    Ok(rl)
}

/// Reads one visible line, e.g. a name or email.
pub fn prompt_field(rl: &mut CredentialEditor, label: &str) -> Result<String> {
    read_line(rl, label, false)
}

/// Reads one line without echoing it, e.g. a password.
pub fn prompt_secret(rl: &mut CredentialEditor, label: &str) -> Result<String> {
    read_line(rl, label, true)
}

fn read_line(rl: &mut CredentialEditor, label: &str, masking: bool) -> Result<String> {
    set_masking(rl, masking);
    let line = rl.readline(label);
    set_masking(rl, false);
    let line = line.map_err(PalaverError::Readline)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn set_masking(rl: &mut CredentialEditor, masking: bool) {
    if let Some(helper) = rl.helper_mut() {
        helper.masking = masking;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masking_hides_every_character() {
        let helper = CredentialHelper { masking: true };
        assert_eq!(helper.highlight("hunter2", 7), "*******");
        assert_eq!(helper.highlight("pässwörd", 0), "********");
        assert!(helper.highlight_char("hunter2", 7, false));
    }

    #[test]
    fn test_unmasked_line_is_shown_unchanged() {
        let helper = CredentialHelper::default();
        assert!(!helper.is_masking());
        assert!(matches!(
            helper.highlight("ada@example.com", 0),
            Borrowed("ada@example.com")
        ));
        assert!(!helper.highlight_char("ada@example.com", 0, false));
    }

    #[test]
    fn test_editor_toggles_masking() {
        let mut rl = credential_editor().unwrap();
        set_masking(&mut rl, true);
        assert!(rl.helper().unwrap().is_masking());
        set_masking(&mut rl, false);
        assert!(!rl.helper().unwrap().is_masking());
    }

    #[test]
    fn test_masking_empty_line() {
        let helper = CredentialHelper { masking: true };
        assert_eq!(helper.highlight("", 0), "");
    }
}
