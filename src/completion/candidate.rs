//! Completion results
//!
//! A [`Completions`] set is what every completer returns: ordered candidates
//! plus ordered diagnostic messages. Completers build candidates for the part
//! under the cursor and callers re-prefix them with whatever they consumed.

use nu_ansi_term::{Color, Style as AnsiStyle};

/// Presentation hint attached to a candidate or message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Plain,
    /// Highlight for the n-th grammar segment
    Highlight(u8),
    /// Bold highlight, used at the very first position
    BoldHighlight(u8),
    /// Schemes resolved on the local filesystem
    Local,
    /// Schemes resolved over the network
    Remote,
    /// Hosted providers and registry aliases
    Provider,
    Warning,
    Error,
}

impl Style {
    /// Terminal rendering of this style
    pub fn to_ansi(self) -> AnsiStyle {
        match self {
            Style::Plain => AnsiStyle::new(),
            Style::Highlight(n) => highlight_color(n).normal(),
            Style::BoldHighlight(n) => highlight_color(n).bold(),
            Style::Local => Color::Green.normal(),
            Style::Remote => Color::Blue.normal(),
            Style::Provider => Color::Magenta.normal(),
            Style::Warning => Color::Yellow.normal(),
            Style::Error => Color::Red.bold(),
        }
    }
}

fn highlight_color(level: u8) -> Color {
    match level {
        1 => Color::Blue,
        2 => Color::Yellow,
        3 => Color::Magenta,
        _ => Color::Cyan,
    }
}

/// One suggested completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full replacement for the typed value
    pub value: String,
    /// The segment the candidate was built from, as shown in a menu
    pub display: String,
    pub description: String,
    pub style: Style,
    /// The shell should not append a space after inserting the value
    pub no_space: bool,
}

/// A message shown instead of, or next to, candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub style: Style,
}

/// Ordered candidates plus ordered messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    pub candidates: Vec<Candidate>,
    pub messages: Vec<Message>,
}

impl Candidate {
    pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value,
            description: description.into(),
            style: Style::Plain,
            no_space: false,
        }
    }
}

impl Completions {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates from `(name, description)` pairs, in order
    pub fn described<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            candidates: pairs
                .into_iter()
                .map(|(name, desc)| Candidate::new(name, desc))
                .collect(),
            messages: Vec::new(),
        }
    }

    /// A set holding a single message
    pub fn message(text: impl Into<String>, style: Style) -> Self {
        Self {
            candidates: Vec::new(),
            messages: vec![Message {
                text: text.into(),
                style,
            }],
        }
    }

    /// Prepend `prefix` to every candidate value
    pub fn prefix(mut self, prefix: &str) -> Self {
        if !prefix.is_empty() {
            for c in &mut self.candidates {
                c.value.insert_str(0, prefix);
            }
        }
        self
    }

    /// Append `suffix` to every candidate value and its display.
    ///
    /// Suffixed candidates expect more input, so they never take a space.
    pub fn suffix(mut self, suffix: &str) -> Self {
        for c in &mut self.candidates {
            c.value.push_str(suffix);
            c.display.push_str(suffix);
            c.no_space = true;
        }
        self
    }

    /// Apply `style` to every candidate
    pub fn style(mut self, style: Style) -> Self {
        for c in &mut self.candidates {
            c.style = style;
        }
        self
    }

    /// Append another set, keeping order
    pub fn extend(mut self, other: Completions) -> Self {
        self.candidates.extend(other.candidates);
        self.messages.extend(other.messages);
        self
    }

    /// Keep only candidates whose value starts with `typed`. Messages stay.
    pub fn filter_prefix(mut self, typed: &str) -> Self {
        self.candidates.retain(|c| c.value.starts_with(typed));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.messages.is_empty()
    }

    /// Candidate values, in order
    pub fn values(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.value.as_str()).collect()
    }

    /// Render for a shell hook: one `value\tdescription[\tnospace]` line per
    /// candidate, then one `\tmessage` line per message.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for c in &self.candidates {
            out.push_str(&c.value);
            out.push('\t');
            out.push_str(&c.description);
            if c.no_space {
                out.push_str("\tnospace");
            }
            out.push('\n');
        }
        for m in &self.messages {
            out.push('\t');
            out.push_str(&m.text);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_suffix() {
        let set = Completions::described([("devops", "cell"), ("automation", "cell")])
            .suffix("/")
            .prefix("//");

        assert_eq!(set.values(), vec!["//devops/", "//automation/"]);
        assert_eq!(set.candidates[0].display, "devops/");
        assert!(set.candidates.iter().all(|c| c.no_space));
    }

    #[test]
    fn test_filter_keeps_messages() {
        let set = Completions::described([("alpha", ""), ("beta", "")])
            .extend(Completions::message("heads up", Style::Warning))
            .filter_prefix("b");

        assert_eq!(set.values(), vec!["beta"]);
        assert_eq!(set.messages.len(), 1);
    }

    #[test]
    fn test_render() {
        let mut set = Completions::described([("//a/", "cell"), ("run", "")])
            .extend(Completions::message("oops", Style::Error));
        set.candidates[0].no_space = true;

        assert_eq!(set.render(), "//a/\tcell\tnospace\nrun\t\n\toops\n");
    }
}
