use std::collections::BTreeMap;

use rand::Rng;

use super::algorithm::SearchError;
use super::utils::first_best;
use crate::interface::Board;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub struct SearchNode<A> {
    // Only None at the root. Does not own the parent, the arena does.
    pub parent: Option<NodeId>,
    // The action to get from the parent to here.
    // Only None at the root.
    pub parent_action: Option<A>,
    // Ordered by action, which fixes the tie-break order.
    pub children: BTreeMap<A, NodeId>,
    // Legal actions of this node's state without a child yet.
    pub untried_actions: Vec<A>,
    pub visits: u32,
    // +1 per credited simulation, alternating between plies on the way up.
    pub wins: f64,
}

impl<A: Copy + Ord> SearchNode<A> {
    fn new(parent: Option<NodeId>, parent_action: Option<A>, untried_actions: Vec<A>) -> Self {
        SearchNode {
            parent,
            parent_action,
            children: BTreeMap::new(),
            untried_actions,
            visits: 0,
            wins: 0.0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried_actions.is_empty()
    }

    /// A leaf of the search tree, regardless of whether the game ended here.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }

    /// UCB1 score of this node as seen by whoever chooses among its siblings.
    ///
    /// `is_opponent` is set when the chooser is not the searching bot; the
    /// stored win rate is then inverted before adding the exploration term.
    /// Unvisited nodes score +inf so every child is tried once before any
    /// statistics are compared.
    pub fn ucb_score(&self, parent_visits: u32, exploration: f64, is_opponent: bool) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        let mut win_rate = self.wins / visits;
        if is_opponent {
            win_rate = 1.0 - win_rate;
        }
        win_rate + exploration * ((parent_visits as f64).ln() / visits).sqrt()
    }
}

/// Arena holding every node of one search. Node 0 is the root.
///
/// Ownership runs strictly from the tree to its nodes; parent links are plain
/// indices, so dropping the tree drops the whole search.
pub struct SearchTree<A> {
    nodes: Vec<SearchNode<A>>,
}

impl<A: Copy + Ord> SearchTree<A> {
    pub fn new(root_actions: Vec<A>) -> Self {
        Self {
            nodes: vec![SearchNode::new(None, None, root_actions)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode<A> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<A> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `id` with the highest UCB1 score, paired with its action.
    /// Equal scores resolve to the lowest action.
    pub fn best_child(
        &self,
        id: NodeId,
        exploration: f64,
        is_opponent: bool,
    ) -> Option<(A, NodeId)> {
        let node = self.get(id);
        first_best(
            node.children.iter().map(|(action, child)| (*action, *child)),
            |(_, child)| {
                self.get(*child)
                    .ucb_score(node.visits, exploration, is_opponent)
            },
        )
    }

    /// The most visited child of the root. Equal counts resolve to the lowest
    /// action.
    pub fn robust_child(&self) -> Option<(A, NodeId)> {
        let root = self.get(self.root());
        first_best(
            root.children.iter().map(|(action, child)| (*action, *child)),
            |(_, child)| self.get(*child).visits as f64,
        )
    }

    /// Adds one child to `id` for an action drawn uniformly from its untried
    /// actions. `state` must be the state of `id` and must not be terminal.
    pub fn expand<B, R>(
        &mut self,
        board: &B,
        id: NodeId,
        state: &B::State,
        rng: &mut R,
    ) -> Result<(NodeId, B::State), SearchError>
    where
        B: Board<Action = A>,
        R: Rng + ?Sized,
    {
        let untried = &mut self.get_mut(id).untried_actions;
        if untried.is_empty() {
            return Err(SearchError::EmptyLegalActions("expansion"));
        }
        let pick = rng.gen_range(0..untried.len());
        let action = untried.remove(pick);

        let next_state = board.next_state(state, action);
        let child_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SearchNode::new(
            Some(id),
            Some(action),
            board.legal_actions(&next_state),
        ));
        let previous = self.get_mut(id).children.insert(action, child_id);
        debug_assert!(previous.is_none());

        Ok((child_id, next_state))
    }

    /// Walks from `id` up to the root inclusive, adding a visit to every node
    /// and crediting a win on alternating plies, starting with `won` at `id`.
    pub fn backpropagate(&mut self, id: NodeId, mut won: bool) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if won {
                node.wins += 1.0;
            }
            current = node.parent;
            won = !won;
        }
    }
}
