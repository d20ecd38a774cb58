//! Plain-text rendering of tree skeletons and timelines.

use crate::models::{CompositeChild, TreeNode};

const COMMENT: char = '#';
const ENTITY: char = '▸';

/// Render a tree skeleton as ASCII art.
///
/// Top-level nodes are printed bare; their descendants hang off them with
/// branch characters.
///
/// Example output:
/// ```text
/// Field Notes
/// ├── Soil Survey
/// │   ├── Sampling
/// │   └── Lab Results
/// └── Irrigation
/// ```
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut output = String::new();
    let mut rails = Vec::new();
    for node in nodes {
        output.push_str(&node.label);
        output.push('\n');
        draw_children(&mut output, &node.children, &mut rails);
    }
    output
}

/// `rails[d]` is true while depth `d` still has siblings left to draw, which
/// keeps a vertical rail open in that column.
fn draw_children(output: &mut String, children: &[TreeNode], rails: &mut Vec<bool>) {
    for (i, child) in children.iter().enumerate() {
        let more = i + 1 < children.len();
        for &open in rails.iter() {
            output.push_str(if open { "│   " } else { "    " });
        }
        output.push_str(if more { "├── " } else { "└── " });
        output.push_str(&child.label);
        output.push('\n');

        rails.push(more);
        draw_children(output, &child.children, rails);
        rails.pop();
    }
}

/// Render a merged timeline, one item per line.
///
/// ```text
/// 2024-03-01 10:00  ▸ Project A (Project)
/// 2024-03-01 10:02  # [note] looks good
/// ```
pub fn render_timeline(items: &[CompositeChild]) -> String {
    let mut output = String::new();
    for item in items {
        output.push_str(&item.timestamp().format("%Y-%m-%d %H:%M").to_string());
        output.push_str("  ");
        match item {
            CompositeChild::Comment(comment) => {
                output.push(COMMENT);
                output.push_str(&format!(" [{}] {}", comment.comment_type.as_str(), comment.content));
            }
            CompositeChild::Entity(summary) => {
                output.push(ENTITY);
                output.push_str(&format!(" {} ({})", summary.name, summary.entity_type.as_str()));
            }
        }
        output.push('\n');
    }
    output
}
