//! Output formatting and colorization for paisano
//!
//! This module provides formatting for what the CLI prints:
//! - Table formatting for `list`
//! - Completion output for the shell hooks
//! - Colored completion messages and errors

mod table;

pub use table::TableFormatter;

use nu_ansi_term::Color;

use crate::completion::{Completions, Message};

/// Main formatter for CLI output
pub struct Formatter {
    /// Enable colored output
    use_colors: bool,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `use_colors` - Enable colored output
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format a completion message for a terminal
    pub fn format_message(&self, message: &Message) -> String {
        if self.use_colors {
            message.style.to_ansi().paint(&message.text).to_string()
        } else {
            message.text.clone()
        }
    }

    /// Format completions the way the shell hooks read them
    ///
    /// Candidates go to the hook verbatim; messages are colored when enabled
    /// so shells that display them keep their style.
    pub fn format_completions(&self, set: &Completions) -> String {
        if !self.use_colors || set.messages.is_empty() {
            return set.render();
        }

        let mut painted = set.clone();
        for m in &mut painted.messages {
            m.text = self.format_message(m);
        }
        painted.render()
    }

    /// Format an error for stderr
    pub fn format_error(&self, error: &str) -> String {
        if self.use_colors {
            format!("{} {error}", Color::Red.bold().paint("error:"))
        } else {
            format!("error: {error}")
        }
    }

    /// Format a success line
    pub fn format_success(&self, text: &str) -> String {
        if self.use_colors {
            Color::Green.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::Style;

    #[test]
    fn test_plain_message() {
        let f = Formatter::new(false);
        let m = Message {
            text: "hello".to_string(),
            style: Style::Error,
        };
        assert_eq!(f.format_message(&m), "hello");
        assert_eq!(f.format_error("bad"), "error: bad");
    }

    #[test]
    fn test_colored_message() {
        let f = Formatter::new(true);
        let m = Message {
            text: "hello".to_string(),
            style: Style::Error,
        };
        let out = f.format_message(&m);
        assert!(out.contains("hello"));
        assert!(out.contains('\x1b'));
    }

    #[test]
    fn test_colored_completions_keep_protocol() {
        let mut set = Completions::message("no cache", Style::Warning);
        set.candidates
            .push(crate::completion::Candidate::new("//devops/", "cell"));

        let out = Formatter::new(true).format_completions(&set);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "//devops/\tcell");
        assert!(lines[1].starts_with('\t'));
        assert!(lines[1].contains("no cache"));
        assert!(lines[1].contains('\x1b'));
    }

    #[test]
    fn test_completions_without_color_are_rendered_verbatim() {
        let set = Completions::message("no cache", Style::Warning);
        assert_eq!(Formatter::new(false).format_completions(&set), "\tno cache\n");
    }
}
