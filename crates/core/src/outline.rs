//! Flat [`TocEntry`] lists to nested bookmark trees.

use thiserror::Error;

use crate::document::TocEntry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("outline entry {index} has level {level}, the first entry must be level 1")]
    BadFirstLevel { index: usize, level: u8 },
    #[error("outline entry {index} jumps from level {previous} to level {level}")]
    LevelJump {
        index: usize,
        previous: u8,
        level: u8,
    },
    #[error("outline entry {index} points at page {page}, pages are 1-based")]
    BadPage { index: usize, page: usize },
}

/// A bookmark and its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: String,
    /// 1-based target page number.
    pub page: usize,
    pub children: Vec<OutlineNode>,
}

/// Check that `entries` describe a well-formed hierarchy: the first entry is
/// level 1, no level is 0, a level grows by at most one from its
/// predecessor, and pages are 1-based.
pub fn validate(entries: &[TocEntry]) -> Result<(), OutlineError> {
    let mut previous: Option<u8> = None;

    for (index, entry) in entries.iter().enumerate() {
        if entry.page == 0 {
            return Err(OutlineError::BadPage {
                index,
                page: entry.page,
            });
        }
        match previous {
            None if entry.level != 1 => {
                return Err(OutlineError::BadFirstLevel {
                    index,
                    level: entry.level,
                });
            }
            Some(prev) if entry.level == 0 || entry.level > prev.saturating_add(1) => {
                return Err(OutlineError::LevelJump {
                    index,
                    previous: prev,
                    level: entry.level,
                });
            }
            _ => {}
        }
        previous = Some(entry.level);
    }

    Ok(())
}

/// Build the bookmark tree for `entries` after validating them.
pub fn nest(entries: &[TocEntry]) -> Result<Vec<OutlineNode>, OutlineError> {
    validate(entries)?;

    // Open nodes, one per level currently being filled. `stack[0]` is level 1.
    let mut roots: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for entry in entries {
        let depth = entry.level as usize;
        while stack.len() >= depth {
            close_top(&mut stack, &mut roots);
        }
        stack.push(OutlineNode {
            title: entry.title.clone(),
            page: entry.page,
            children: Vec::new(),
        });
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    Ok(roots)
}

/// Pop the innermost open node and attach it to its parent, or to the roots.
fn close_top(stack: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Total number of nodes in a forest.
pub fn count(nodes: &[OutlineNode]) -> usize {
    nodes.iter().map(|n| 1 + count(&n.children)).sum()
}
