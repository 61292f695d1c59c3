//! Delimiter splitting for multi-part values

/// A value split on its last delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parts<'a> {
    /// Everything up to and including the last delimiter
    pub head: &'a str,
    /// Completed segments before the cursor
    pub parts: Vec<&'a str>,
    /// The segment under the cursor
    pub current: &'a str,
}

impl Parts<'_> {
    /// Number of completed segments
    pub fn position(&self) -> usize {
        self.parts.len()
    }
}

/// Split `value` on `delimiter`, keeping the last segment as the one being
/// typed.
///
/// ```
/// use paisano::completion::split_parts;
///
/// let p = split_parts("a/b/c", "/");
/// assert_eq!(p.head, "a/b/");
/// assert_eq!(p.parts, vec!["a", "b"]);
/// assert_eq!(p.current, "c");
/// assert_eq!(p.position(), 2);
/// ```
pub fn split_parts<'a>(value: &'a str, delimiter: &str) -> Parts<'a> {
    match value.rfind(delimiter) {
        Some(idx) => {
            let (head, current) = value.split_at(idx + delimiter.len());
            Parts {
                head,
                parts: value[..idx].split(delimiter).collect(),
                current,
            }
        }
        None => Parts {
            head: "",
            parts: Vec::new(),
            current: value,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delimiter() {
        let p = split_parts("devops", "/");
        assert_eq!(p.position(), 0);
        assert_eq!(p.head, "");
        assert_eq!(p.current, "devops");
    }

    #[test]
    fn test_leading_delimiters_count_as_empty_parts() {
        let p = split_parts("/", "/");
        assert_eq!(p.parts, vec![""]);
        assert_eq!(p.current, "");

        let p = split_parts("//dev", "/");
        assert_eq!(p.parts, vec!["", ""]);
        assert_eq!(p.head, "//");
        assert_eq!(p.current, "dev");
    }

    #[test]
    fn test_multi_char_delimiter() {
        let p = split_parts("git+ssh://host/repo", "://");
        assert_eq!(p.parts, vec!["git+ssh"]);
        assert_eq!(p.current, "host/repo");

        let p = split_parts("__std//devops/", "//");
        assert_eq!(p.parts, vec!["__std"]);
        assert_eq!(p.current, "devops/");
    }
}
