//! Per-path three-way reconciliation
//!
//! Given the blob a path maps to at the split point, at the current head and
//! at the given head (or `None` where the path is absent), decide what the
//! merge does with it. The rules reduce to four checks:
//!
//! - both heads agree: keep the current version
//! - only the given side moved away from the split point: take it, or
//!   remove the path if the given side deleted it
//! - only the current side moved: keep the current version
//! - both moved, differently: conflict

use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;

pub const CONFLICT_START: &str = "<<<<<<< HEAD\n";
pub const CONFLICT_SEPARATOR: &str = "=======\n";
pub const CONFLICT_END: &str = ">>>>>>>\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// Leave the working file and the stage alone
    KeepCurrent,
    /// Check out and stage the given head's blob
    TakeGiven(ObjectId),
    /// Delete the working file and stage its removal
    Remove,
    /// Both sides diverged; absent sides contribute empty content
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

pub struct ThreeWayMerge;

impl ThreeWayMerge {
    pub fn classify(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        given: Option<&ObjectId>,
    ) -> MergeAction {
        if current == given || split == given {
            return MergeAction::KeepCurrent;
        }

        if split == current {
            return match given {
                Some(given) => MergeAction::TakeGiven(given.clone()),
                None => MergeAction::Remove,
            };
        }

        MergeAction::Conflict {
            current: current.cloned(),
            given: given.cloned(),
        }
    }

    /// Working file content recording both sides of a conflict
    pub fn conflict_content(current: &[u8], given: &[u8]) -> Bytes {
        let mut content = Vec::with_capacity(
            CONFLICT_START.len()
                + current.len()
                + CONFLICT_SEPARATOR.len()
                + given.len()
                + CONFLICT_END.len(),
        );
        content.extend_from_slice(CONFLICT_START.as_bytes());
        content.extend_from_slice(current);
        content.extend_from_slice(CONFLICT_SEPARATOR.as_bytes());
        content.extend_from_slice(given);
        content.extend_from_slice(CONFLICT_END.as_bytes());

        Bytes::from(content)
    }
}
