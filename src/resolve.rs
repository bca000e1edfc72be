// src/resolve.rs

//! Resolution of raw command arguments and tag declarations into an ordered,
//! uniquely-indexed work list.
//!
//! Tags can be declared two ways:
//! - inline, as `+NAME:COMMAND` positional arguments
//! - via the `-t/--tag NAME:COMMAND` flag
//!
//! A declaration whose command text exactly matches a positional command
//! labels that command; the rest become work items of their own, appended
//! after the positional ones.

use tracing::warn;

use crate::errors::{ParseqError, Result};

/// One resolved command, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub command: String,
    /// User-facing label for this command's output. Defaults to the 1-based
    /// position as a string; duplicates are permitted.
    pub tag: String,
    /// Final execution order, contiguous from 0.
    pub index: usize,
}

/// A `NAME:COMMAND` pair pending assignment during resolution.
#[derive(Debug, Clone)]
struct TaggedDecl {
    tag: String,
    command: String,
}

/// Merge positional arguments and tag declarations into the final work list.
///
/// Positional commands come first, in their original order. Declarations that
/// match no positional command are appended afterwards in declaration order
/// (inline-tagged before flag-declared). Resolution is a pure function of its
/// inputs; malformed declarations are warned about and never abort the run.
///
/// An empty result is the one fatal case: nothing to execute is a usage error.
pub fn resolve_commands(args: &[String], tag_flags: &[String]) -> Result<Vec<WorkItem>> {
    let mut positional: Vec<&String> = Vec::new();
    let mut pending: Vec<TaggedDecl> = Vec::new();

    for arg in args {
        match parse_inline_decl(arg) {
            Some(decl) => pending.push(decl),
            None => positional.push(arg),
        }
    }

    for flag in tag_flags {
        match split_decl(flag) {
            Some((tag, command)) => pending.push(TaggedDecl {
                tag: tag.to_string(),
                command: command.to_string(),
            }),
            None => warn!(
                declaration = %flag,
                "invalid tag format, expected NAME:COMMAND; dropping"
            ),
        }
    }

    let mut items = Vec::with_capacity(positional.len() + pending.len());

    for (index, command) in positional.iter().enumerate() {
        // First declaration with exactly matching command text wins and is
        // consumed; later duplicates stay in the pool.
        let tag = match pending.iter().position(|decl| decl.command == **command) {
            Some(pos) => pending.remove(pos).tag,
            None => (index + 1).to_string(),
        };

        items.push(WorkItem {
            command: (*command).clone(),
            tag,
            index,
        });
    }

    for decl in pending {
        let index = items.len();
        items.push(WorkItem {
            command: decl.command,
            tag: decl.tag,
            index,
        });
    }

    if items.is_empty() {
        return Err(ParseqError::EmptyCommandSet);
    }

    Ok(items)
}

/// Parse a `+NAME:COMMAND` argument.
///
/// Returns `None` for plain positional commands. A `+` argument without a
/// valid `NAME:COMMAND` split is warned about and also returns `None`, so the
/// caller keeps it verbatim as a positional command.
fn parse_inline_decl(arg: &str) -> Option<TaggedDecl> {
    let rest = arg.strip_prefix('+')?;

    let Some((tag, command)) = split_decl(rest) else {
        warn!(
            argument = %arg,
            "invalid tag format, expected +NAME:COMMAND; treating as a plain command"
        );
        return None;
    };

    Some(TaggedDecl {
        tag: tag.to_string(),
        command: command.to_string(),
    })
}

/// Split `NAME:COMMAND` on the first `:`. Returns `None` when there is no
/// separator or the name part is empty.
fn split_decl(s: &str) -> Option<(&str, &str)> {
    let (tag, command) = s.split_once(':')?;
    if tag.is_empty() {
        return None;
    }
    Some((tag, command))
}
