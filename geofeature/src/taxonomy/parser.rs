//! Outline text → [`TaxonomyBuilder`].
//!
//! One node per line, nested by indentation:
//!
//! ```text
//! # comments and blank lines are ignored
//! natural
//!   coastline @1
//!   water
//! highway @5
//!   primary
//! ```
//!
//! A line indented deeper than the previous one is its child. Siblings must
//! share the same indentation. The optional `@N` suffix is the node's minimum
//! visible level.

use super::builder::{BuildId, TaxonomyBuilder};
use super::TaxonomyError;

pub(super) fn parse_outline(text: &str) -> Result<TaxonomyBuilder, TaxonomyError> {
    let mut builder = TaxonomyBuilder::new();
    // (indentation, node) for the chain of currently open ancestors
    let mut open: Vec<(usize, BuildId)> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let content = raw.split('#').next().unwrap_or("");
        if content.trim().is_empty() {
            continue;
        }

        let indent = content.len() - content.trim_start().len();
        let (name, min_level) = parse_entry(content.trim(), line_no)?;

        let mut closed_indent = None;
        while let Some(&(open_indent, _)) = open.last() {
            if open_indent < indent {
                break;
            }
            closed_indent = Some(open_indent);
            open.pop();
        }
        if let Some(closed) = closed_indent {
            if closed != indent {
                return Err(TaxonomyError::Syntax {
                    line: line_no,
                    reason: format!(
                        "indentation of {indent} does not match any enclosing level (expected {closed})"
                    ),
                });
            }
        }

        let parent = open.last().map(|&(_, id)| id).unwrap_or(builder.root());
        let id = builder.add_child(parent, name, min_level)?;
        open.push((indent, id));
    }

    Ok(builder)
}

fn parse_entry(entry: &str, line: usize) -> Result<(&str, u8), TaxonomyError> {
    let mut tokens = entry.split_whitespace();
    let name = tokens.next().unwrap_or("");

    let min_level = match tokens.next() {
        None => 0,
        Some(token) => {
            let value = token.strip_prefix('@').ok_or_else(|| TaxonomyError::Syntax {
                line,
                reason: format!("expected '@<level>' after node name, found '{token}'"),
            })?;
            value.parse::<u8>().map_err(|_| TaxonomyError::Syntax {
                line,
                reason: format!("invalid visibility level '{value}'"),
            })?
        }
    };

    if let Some(extra) = tokens.next() {
        return Err(TaxonomyError::Syntax {
            line,
            reason: format!("unexpected token '{extra}'"),
        });
    }

    Ok((name, min_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;

    const SAMPLE: &str = "\
# feature types
natural
  water
  coastline @1
highway @5
  primary
    link      # trailing comment

amenity
";

    #[test]
    fn test_parse_sample() {
        let taxonomy = Taxonomy::parse(SAMPLE).unwrap();
        assert_eq!(taxonomy.len(), 8);
        assert!(taxonomy.find_path("highway.primary.link").is_some());
        assert_eq!(taxonomy.find_path("natural.coastline").unwrap().min_level(), 1);
        assert_eq!(taxonomy.find_path("highway").unwrap().min_level(), 5);
    }

    #[test]
    fn test_parse_empty_text() {
        let taxonomy = Taxonomy::parse("\n# nothing here\n").unwrap();
        assert_eq!(taxonomy.len(), 1);
    }

    #[test]
    fn test_tab_indentation() {
        let taxonomy = Taxonomy::parse("natural\n\twater\n\tcoastline\n").unwrap();
        assert!(taxonomy.find_path("natural.coastline").is_some());
    }

    #[test]
    fn test_inconsistent_dedent() {
        let err = Taxonomy::parse("a\n    b\n  c\n").unwrap_err();
        assert!(matches!(err, TaxonomyError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_bad_level_annotation() {
        let err = Taxonomy::parse("a @x\n").unwrap_err();
        assert!(matches!(err, TaxonomyError::Syntax { line: 1, .. }));

        let err = Taxonomy::parse("a\n  b 5\n").unwrap_err();
        assert!(matches!(err, TaxonomyError::Syntax { line: 2, .. }));

        let err = Taxonomy::parse("a @1 @2\n").unwrap_err();
        assert!(matches!(err, TaxonomyError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_sibling() {
        let err = Taxonomy::parse("natural\n  water\n  water\n").unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateName { .. }));
    }

    #[test]
    fn test_same_name_under_different_parents() {
        let taxonomy = Taxonomy::parse("a\n  x\nb\n  x\n").unwrap();
        let ax = taxonomy.find_path("a.x").unwrap();
        let bx = taxonomy.find_path("b.x").unwrap();
        assert_ne!(ax.index(), bx.index());
    }
}
