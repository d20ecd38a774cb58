//! Chronological interleaving of an entity's comments and sub-entities.
//!
//! Ordering rule: timestamps ascending. Both inputs keep their own relative
//! order, and on an exact tie the comment is placed before the entity
//! summary. The rule is applied by a two-way merge, not by a sort over the
//! concatenation, so it never depends on sort stability.

use chrono::{DateTime, Utc};

use crate::models::{Comment, CompositeChild, EntitySummary};

/// Anything that can be placed on an entity's timeline.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for Comment {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Timestamped for EntitySummary {
    fn timestamp(&self) -> DateTime<Utc> {
        self.representative_timestamp
    }
}

impl Timestamped for CompositeChild {
    fn timestamp(&self) -> DateTime<Utc> {
        CompositeChild::timestamp(self)
    }
}

/// Merge `comments` and `children` into one time-ordered sequence.
///
/// Both inputs are expected in ascending timestamp order (see
/// [`Entity::ordered_comments`](crate::models::Entity::ordered_comments)).
/// Inputs are only read, so merging the same slices again yields the same
/// output.
pub fn merge(comments: &[Comment], children: &[EntitySummary]) -> Vec<CompositeChild> {
    let mut merged = Vec::with_capacity(comments.len() + children.len());
    let (mut i, mut j) = (0, 0);

    while i < comments.len() && j < children.len() {
        if comments[i].timestamp() <= children[j].timestamp() {
            merged.push(CompositeChild::Comment(comments[i].clone()));
            i += 1;
        } else {
            merged.push(CompositeChild::Entity(children[j].clone()));
            j += 1;
        }
    }

    merged.extend(comments[i..].iter().cloned().map(CompositeChild::Comment));
    merged.extend(children[j..].iter().cloned().map(CompositeChild::Entity));
    merged
}

/// The render order of an entity's body.
///
/// While the children are still unresolved (`None`) no merge is attempted
/// and the comments are returned alone, in their given order.
pub fn timeline(comments: &[Comment], children: Option<&[EntitySummary]>) -> Vec<CompositeChild> {
    match children {
        Some(children) => merge(comments, children),
        None => comments
            .iter()
            .cloned()
            .map(CompositeChild::Comment)
            .collect(),
    }
}
