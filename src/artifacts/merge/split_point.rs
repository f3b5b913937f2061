//! Split point discovery
//!
//! The split point is the common ancestor used as the base of a three-way merge.
//! Two strategies are available:
//!
//! ### First found (default)
//!
//! 1. Collect every ancestor of the given head, following both parents of
//!    merge commits, with an explicit stack.
//! 2. Walk the current head's history breadth-first, first parent before
//!    second, and stop at the first commit that is also an ancestor of the
//!    given head.
//!
//! ### Best common ancestor
//!
//! Runs the same two walks to completion, then discards every common ancestor
//! reachable from another common ancestor. Among the survivors, the one the
//! breadth-first walk reached first wins.
//!
//! The strategies only disagree on histories where the breadth-first walk
//! reaches an older common ancestor before a newer one, e.g. when the current
//! branch merged in a side branch rooted below the newest shared commit:
//!
//! ```text
//!   A ── B ── J ── K ── H   (current)
//!   │    │            /
//!   │    └── G       /      (given)
//!   └── S ──────────┘
//! ```
//!
//! First found returns `A` (reached through `S` at depth 2), best common
//! ancestor returns `B`.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use bitflags::bitflags;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b000;
        const VISITED_FROM_CURRENT = 0b001;
        const VISITED_FROM_GIVEN = 0b010;
        const VISITED_FROM_BOTH =
            Self::VISITED_FROM_CURRENT.bits() | Self::VISITED_FROM_GIVEN.bits();
        const STALE = 0b100; // reachable from another common ancestor
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_CURRENT) {
            flags.push("CURRENT");
        }
        if self.contains(VisitState::VISITED_FROM_GIVEN) {
            flags.push("GIVEN");
        }
        if self.contains(VisitState::STALE) {
            flags.push("STALE");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPointStrategy {
    #[default]
    FirstFound,
    BestCommonAncestor,
}

impl TryFrom<&str> for SplitPointStrategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "first-found" => Ok(SplitPointStrategy::FirstFound),
            "best" => Ok(SplitPointStrategy::BestCommonAncestor),
            other => Err(TwigError::Usage(format!(
                "unknown merge base strategy {other:?}, expected 'first-found' or 'best'"
            ))
            .into()),
        }
    }
}

/// Locates split points on a commit graph exposed through a parent loader
///
/// The loader returns the parents of a commit, first parent first. Each
/// commit is loaded at most once per finder.
pub struct SplitPointFinder<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    parent_loader: ParentLoaderFn,
    strategy: SplitPointStrategy,
    parents_cache: RefCell<HashMap<ObjectId, Vec<ObjectId>>>,
}

impl<ParentLoaderFn> SplitPointFinder<ParentLoaderFn>
where
    ParentLoaderFn: Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>>,
{
    pub fn new(parent_loader: ParentLoaderFn, strategy: SplitPointStrategy) -> Self {
        Self {
            parent_loader,
            strategy,
            parents_cache: RefCell::new(HashMap::new()),
        }
    }

    fn parents(&self, commit_id: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        if let Some(parents) = self.parents_cache.borrow().get(commit_id) {
            return Ok(parents.clone());
        }

        let parents = (self.parent_loader)(commit_id)?;
        self.parents_cache
            .borrow_mut()
            .insert(commit_id.clone(), parents.clone());

        Ok(parents)
    }

    /// Every commit reachable from `head`, `head` included
    pub fn ancestors(&self, head: &ObjectId) -> anyhow::Result<HashSet<ObjectId>> {
        let mut ancestors = HashSet::new();
        let mut stack = vec![head.clone()];

        while let Some(commit_id) = stack.pop() {
            if !ancestors.insert(commit_id.clone()) {
                continue;
            }
            stack.extend(self.parents(&commit_id)?);
        }

        Ok(ancestors)
    }

    /// Find the common ancestor used as the merge base
    ///
    /// # Arguments
    ///
    /// * `current_head` - Head of the branch being merged into
    /// * `given_head` - Head of the branch being merged in
    ///
    /// # Returns
    ///
    /// The split point chosen by the configured strategy, or `None` when the
    /// histories share no commit
    pub fn find_split_point(
        &self,
        current_head: &ObjectId,
        given_head: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut states = HashMap::<ObjectId, VisitState>::new();
        for ancestor in self.ancestors(given_head)? {
            states.insert(ancestor, VisitState::VISITED_FROM_GIVEN);
        }

        let candidates = self.common_ancestors_in_bfs_order(current_head, &mut states)?;
        let split_point = match self.strategy {
            SplitPointStrategy::FirstFound => candidates.into_iter().next(),
            SplitPointStrategy::BestCommonAncestor => {
                self.mark_stale_candidates(&candidates, &mut states)?;
                candidates
                    .into_iter()
                    .find(|candidate| {
                        !states
                            .get(candidate)
                            .is_some_and(|state| state.contains(VisitState::STALE))
                    })
            }
        };

        tracing::debug!(
            current = %current_head,
            given = %given_head,
            strategy = ?self.strategy,
            split = ?split_point.as_ref().map(ObjectId::to_short_oid),
            "split point"
        );

        Ok(split_point)
    }

    /// Breadth-first walk from the current head, first parent first
    ///
    /// With the first-found strategy the walk stops at the first hit.
    /// Otherwise it collects every common ancestor not hidden behind another.
    fn common_ancestors_in_bfs_order(
        &self,
        current_head: &ObjectId,
        states: &mut HashMap<ObjectId, VisitState>,
    ) -> anyhow::Result<Vec<ObjectId>> {
        let mut candidates = Vec::new();
        let mut queue = VecDeque::from([current_head.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            let state = states.entry(commit_id.clone()).or_insert(VisitState::NONE);
            if state.contains(VisitState::VISITED_FROM_CURRENT) {
                continue;
            }
            *state |= VisitState::VISITED_FROM_CURRENT;
            tracing::trace!(commit = %commit_id, state = ?*state, "visited");

            if state.contains(VisitState::VISITED_FROM_BOTH) {
                candidates.push(commit_id.clone());
                if self.strategy == SplitPointStrategy::FirstFound {
                    break;
                }
                // everything below a candidate ends up stale
                continue;
            }

            queue.extend(self.parents(&commit_id)?);
        }

        Ok(candidates)
    }

    fn mark_stale_candidates(
        &self,
        candidates: &[ObjectId],
        states: &mut HashMap<ObjectId, VisitState>,
    ) -> anyhow::Result<()> {
        let mut stack = Vec::new();
        for candidate in candidates {
            stack.extend(self.parents(candidate)?);
        }

        while let Some(commit_id) = stack.pop() {
            let state = states.entry(commit_id.clone()).or_insert(VisitState::NONE);
            if state.contains(VisitState::STALE) {
                continue;
            }
            *state |= VisitState::STALE;
            stack.extend(self.parents(&commit_id)?);
        }

        Ok(())
    }
}
