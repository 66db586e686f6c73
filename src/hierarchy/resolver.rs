use crate::hierarchy::{ExternalEpic, Hierarchy, HierarchyNode};
use crate::model::{Diagnostic, Issue, RunContext};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Where an issue hangs after linking. Positions index into the input slice.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Link {
    /// No usable parent: an epic tree or a standalone item, decided by shape.
    Root,
    Parent(usize),
    External(String),
    Standalone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnPath,
    Done,
}

/// Rebuilds the epic forest from parent references.
///
/// Every issue ends up in exactly one place: inside an epic tree, under an
/// external epic placeholder, or in the standalone group.
pub fn resolve(issues: &[Issue], ctx: &mut RunContext) -> Hierarchy {
    let (index, mut links) = index_issues(issues, ctx);
    link_parents(issues, &index, &mut links, ctx);
    break_cycles(issues, &mut links, ctx);
    let hierarchy = assemble(issues, &links);
    debug!(
        "Resolved {} epic trees, {} external epics, {} standalone items",
        hierarchy.trees.len(),
        hierarchy.external_epics.len(),
        hierarchy.standalone.len()
    );
    hierarchy
}

/// Pass 1: first occurrence of a key wins, later ones become standalone.
fn index_issues<'a>(
    issues: &'a [Issue],
    ctx: &mut RunContext,
) -> (HashMap<&'a str, usize>, Vec<Link>) {
    let mut index = HashMap::with_capacity(issues.len());
    let mut links = vec![Link::Root; issues.len()];
    for (position, issue) in issues.iter().enumerate() {
        if index.contains_key(issue.key.as_str()) {
            ctx.report(Diagnostic::DuplicateIdentifier {
                key: issue.key.clone(),
                position: position + 1,
            });
            links[position] = Link::Standalone;
        } else {
            index.insert(issue.key.as_str(), position);
        }
    }
    (index, links)
}

/// Pass 2: point every issue at its parent, or route it when the parent is unknown.
fn link_parents(
    issues: &[Issue],
    index: &HashMap<&str, usize>,
    links: &mut [Link],
    ctx: &mut RunContext,
) {
    let mut missing: IndexMap<&str, Vec<usize>> = IndexMap::new();
    for (position, issue) in issues.iter().enumerate() {
        if links[position] == Link::Standalone {
            continue;
        }
        let Some(parent) = issue.parent.as_deref() else {
            continue;
        };
        match index.get(parent) {
            Some(&parent_position) => links[position] = Link::Parent(parent_position),
            None => {
                ctx.report(Diagnostic::UnresolvedParentReference {
                    key: issue.key.clone(),
                    parent: parent.to_string(),
                });
                missing.entry(parent).or_default().push(position);
            }
        }
    }

    for (parent, children) in missing {
        // Sub-tasks hang off story-level issues and epics are never nested,
        // so either one rules out an epic behind the missing key.
        let contradicted = children.iter().any(|&child| {
            let issue_type = &issues[child].issue_type;
            issue_type.is_epic() || issue_type.is_sub_task()
        });
        for child in children {
            links[child] = if !contradicted {
                Link::External(parent.to_string())
            } else if issues[child].issue_type.is_epic() {
                Link::Root
            } else {
                Link::Standalone
            };
        }
    }
}

/// Walks ancestor chains in input order and cuts the link that closes a cycle.
///
/// Each issue enters a path at most once, so the walk is bounded by the input size.
fn break_cycles(issues: &[Issue], links: &mut [Link], ctx: &mut RunContext) {
    let mut state = vec![Visit::New; issues.len()];
    for start in 0..issues.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut current = start;
        loop {
            match state[current] {
                Visit::Done => break,
                Visit::OnPath => {
                    if let Some(&offending) = path.last() {
                        ctx.report(Diagnostic::CycleBroken {
                            key: issues[offending].key.clone(),
                            parent: issues[current].key.clone(),
                        });
                        links[offending] = Link::Standalone;
                    }
                    break;
                }
                Visit::New => {
                    state[current] = Visit::OnPath;
                    path.push(current);
                    match links[current] {
                        Link::Parent(parent) => current = parent,
                        _ => break,
                    }
                }
            }
        }
        for position in path {
            state[position] = Visit::Done;
        }
    }
}

fn assemble(issues: &[Issue], links: &[Link]) -> Hierarchy {
    let mut children = vec![Vec::new(); issues.len()];
    for (position, link) in links.iter().enumerate() {
        if let Link::Parent(parent) = link {
            children[*parent].push(position);
        }
    }

    let mut hierarchy = Hierarchy::default();
    for (position, link) in links.iter().enumerate() {
        match link {
            Link::Parent(_) => {}
            Link::Root => {
                let node = build_node(position, issues, &children);
                // Childless epics are kept as standalone items rather than empty trees.
                if node.issue.issue_type.is_epic() && !node.children.is_empty() {
                    hierarchy.trees.push(node);
                } else {
                    hierarchy.standalone.push(node);
                }
            }
            Link::External(parent) => hierarchy
                .external_epics
                .entry(parent.clone())
                .or_insert_with(|| ExternalEpic::new(parent))
                .children
                .push(build_node(position, issues, &children)),
            Link::Standalone => hierarchy
                .standalone
                .push(build_node(position, issues, &children)),
        }
    }
    hierarchy
}

/// Builds a subtree bottom-up with an explicit stack; input depth is untrusted.
fn build_node(root: usize, issues: &[Issue], children: &[Vec<usize>]) -> HierarchyNode {
    let mut pending = vec![(root, false)];
    let mut built: Vec<HierarchyNode> = Vec::new();
    while let Some((position, expanded)) = pending.pop() {
        if expanded {
            let kids = built.split_off(built.len() - children[position].len());
            built.push(HierarchyNode {
                issue: issues[position].clone(),
                children: kids,
            });
        } else {
            pending.push((position, true));
            pending.extend(children[position].iter().rev().map(|&child| (child, false)));
        }
    }
    built
        .pop()
        .unwrap_or_else(|| HierarchyNode::leaf(issues[root].clone()))
}
