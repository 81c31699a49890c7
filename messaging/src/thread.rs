//! Reply-tree assembly.
//!
//! The store does not guarantee that `parent_id` links are acyclic, so assembly keeps a
//! visited set and a depth limit; a message is placed in the tree at most once.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use storage::MessageRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageThread {
    pub message: MessageRecord,
    pub replies: Vec<MessageThread>,
}

impl MessageThread {
    /// Number of messages in the tree, root included.
    pub fn message_count(&self) -> usize {
        1 + self
            .replies
            .iter()
            .map(MessageThread::message_count)
            .sum::<usize>()
    }

    /// Levels below the root; a lone message has depth 0.
    pub fn depth(&self) -> usize {
        self.replies
            .iter()
            .map(|reply| 1 + reply.depth())
            .max()
            .unwrap_or(0)
    }

    /// Messages in depth-first order, root first.
    pub fn flatten(&self) -> Vec<&MessageRecord> {
        let mut out = Vec::with_capacity(self.message_count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(&node.message);
            stack.extend(node.replies.iter().rev());
        }
        out
    }
}

/// Builds the tree rooted at `root_id` from `rows`, which may hold unrelated or
/// repeated messages. Children keep the order they have in `rows`.
///
/// Returns `None` when `root_id` is not among the rows.
pub fn build(rows: Vec<MessageRecord>, root_id: &str, max_depth: u32) -> Option<MessageThread> {
    let mut root = None;
    let mut children: HashMap<String, Vec<MessageRecord>> = HashMap::new();
    for row in rows {
        if row.id == root_id && root.is_none() {
            root = Some(row.clone());
        }
        if let Some(parent_id) = row.parent_id.clone() {
            children.entry(parent_id).or_default().push(row);
        }
    }

    let mut visited = HashSet::new();
    visited.insert(root_id.to_string());
    root.map(|message| attach(message, &children, &mut visited, 0, max_depth))
}

fn attach(
    message: MessageRecord,
    children: &HashMap<String, Vec<MessageRecord>>,
    visited: &mut HashSet<String>,
    depth: u32,
    max_depth: u32,
) -> MessageThread {
    let mut replies = Vec::new();
    if depth < max_depth {
        if let Some(candidates) = children.get(&message.id) {
            for child in candidates {
                if visited.insert(child.id.clone()) {
                    replies.push(attach(child.clone(), children, visited, depth + 1, max_depth));
                }
            }
        }
    }
    MessageThread { message, replies }
}
