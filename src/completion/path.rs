//! Completion of the `//cell/block/target:action` path

use super::candidate::{Completions, Style};
use super::index::{CompletionIndex, Entry};
use super::parts::split_parts;

fn entries(list: &[Entry]) -> Completions {
    Completions::described(
        list.iter()
            .map(|e| (e.name.as_str(), e.description.as_str())),
    )
}

/// Complete a registry path.
///
/// `value` is the path as typed, starting at its `//` anchor (or empty).
/// Returned values replace `value` as a whole.
pub fn complete_path(index: &CompletionIndex, value: &str) -> Completions {
    let split = split_parts(value, "/");

    let set = match split.position() {
        // Nothing typed yet
        0 => entries(index.cells())
            .suffix("/")
            .prefix("//")
            .style(Style::BoldHighlight(1)),
        // A single '/'
        1 => entries(index.cells()).suffix("/").prefix("/"),
        2 => entries(index.cells())
            .suffix("/")
            .style(Style::Highlight(1)),
        3 => entries(index.blocks(split.parts[2]))
            .suffix("/")
            .style(Style::Highlight(2)),
        4 => {
            let (cell, block) = (split.parts[2], split.parts[3]);
            // Targets run up to the last ':', like the grammar reads them.
            let target = split_parts(split.current, ":");
            match target.position() {
                0 => entries(index.targets(cell, block))
                    .suffix(":")
                    .style(Style::Highlight(3)),
                _ => {
                    let name = &target.head[..target.head.len() - 1];
                    entries(index.actions(cell, block, name)).prefix(target.head)
                }
            }
        }
        _ => Completions::new(),
    };

    set.prefix(split.head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::fixtures::sample_index;

    fn complete(value: &str) -> Completions {
        complete_path(&sample_index(), value).filter_prefix(value)
    }

    #[test]
    fn test_empty_offers_anchored_cells() {
        let set = complete("");
        assert_eq!(set.values(), vec!["//devops/", "//automation/"]);
        assert_eq!(set.candidates[0].style, Style::BoldHighlight(1));
    }

    #[test]
    fn test_single_slash() {
        assert_eq!(complete("/").values(), vec!["//devops/", "//automation/"]);
    }

    #[test]
    fn test_cells() {
        let set = complete("//de");
        assert_eq!(set.values(), vec!["//devops/"]);
        assert_eq!(set.candidates[0].display, "devops/");
        assert_eq!(set.candidates[0].description, "cell");
    }

    #[test]
    fn test_blocks() {
        let set = complete("//devops/");
        assert_eq!(set.values(), vec!["//devops/containers/"]);
        assert_eq!(set.candidates[0].style, Style::Highlight(2));
    }

    #[test]
    fn test_targets() {
        let set = complete("//devops/containers/service-f");
        assert_eq!(set.values(), vec!["//devops/containers/service-foo:"]);
        assert_eq!(set.candidates[0].description, "the foo service");
        assert!(set.candidates[0].no_space);
    }

    #[test]
    fn test_actions() {
        let set = complete("//devops/containers/service-foo:");
        assert_eq!(
            set.values(),
            vec![
                "//devops/containers/service-foo:deploy",
                "//devops/containers/service-foo:build"
            ]
        );
        assert!(!set.candidates[0].no_space);
    }

    #[test]
    fn test_unknown_segments_are_empty() {
        assert!(complete("//nope/").is_empty());
        assert!(complete("//devops/nope/").is_empty());
        assert!(complete("//devops/containers/nope:").is_empty());
        assert!(complete("//devops/containers/service-foo:deploy/x/").is_empty());
    }
}
