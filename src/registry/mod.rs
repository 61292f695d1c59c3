//! Registry tree
//!
//! The Cell → Block → Target → Action hierarchy a registry exposes, as
//! produced by evaluating `<flake>#<registry>.init.<system>`. The tree is
//! loaded once per invocation and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeError};

/// Longest excerpt of an offending document quoted in a load error.
const ERROR_EXCERPT_LEN: usize = 2048;

/// Root of a registry tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Root {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(alias = "cell")]
    pub name: String,
    #[serde(alias = "cellBlocks", default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(alias = "cellBlock")]
    pub name: String,
    #[serde(default)]
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    description: Option<String>,
}

impl Target {
    pub fn new(name: impl Into<String>, description: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            actions,
        }
    }

    /// Description shown next to the target; empty when the registry has none.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

impl Action {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
        }
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

impl Root {
    /// Every action in tree order as `(spec path, target, action)`.
    ///
    /// The spec path is the `//cell/block/target:action` suffix of a spec.
    pub fn actions(&self) -> impl Iterator<Item = (String, &Target, &Action)> {
        self.cells.iter().flat_map(|c| {
            c.blocks.iter().flat_map(move |b| {
                b.targets.iter().flat_map(move |t| {
                    t.actions.iter().map(move |a| {
                        (
                            format!("//{}/{}/{}:{}", c.name, b.name, t.name, a.name),
                            t,
                            a,
                        )
                    })
                })
            })
        })
    }
}

/// Load a registry tree from its JSON document.
///
/// # Arguments
/// * `bytes` - JSON array of cells
///
/// # Returns
/// * `Result<Root>` - The tree, or `TreeError::Malformed` quoting the document
pub fn load_json(bytes: &[u8]) -> Result<Root> {
    match serde_json::from_slice::<Root>(bytes) {
        Ok(root) => Ok(root),
        Err(err) if err.is_syntax() || err.is_eof() => {
            let text = String::from_utf8_lossy(bytes);
            Err(TreeError::Malformed(format!(
                "json syntax error: {err}: string:\n{}",
                excerpt(&text)
            ))
            .into())
        }
        Err(err) => {
            // Valid JSON of the wrong shape: quote it pretty-printed.
            let pretty = serde_json::from_slice::<serde_json::Value>(bytes)
                .ok()
                .and_then(|v| serde_json::to_string_pretty(&v).ok())
                .unwrap_or_default();
            Err(TreeError::Malformed(format!("{err} - object: {}", excerpt(&pretty))).into())
        }
    }
}

fn excerpt(text: &str) -> &str {
    match text.char_indices().nth(ERROR_EXCERPT_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
