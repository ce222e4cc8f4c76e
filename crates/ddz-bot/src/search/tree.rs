use ddz_core::eval::table_strength;
use ddz_core::model::combo::Obligation;
use ddz_core::model::packed::PackedHand;
use ddz_core::model::seat::Seat;
use ddz_core::movegen;
use rand::Rng;
use rand::seq::SliceRandom;

/// Handle into a [`SearchTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Unvisited,
    /// Some moves have not been instantiated as children yet.
    Expanding,
    Expanded,
    Terminal,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    action: PackedHand,
    child: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Node {
    action: PackedHand,
    parent: Option<NodeId>,
    /// Seat that played `action`; `None` at the root.
    mover: Option<Seat>,
    actor: Seat,
    obligation: Obligation,
    hands: [PackedHand; 3],
    edges: Vec<Edge>,
    visits: u32,
    score: f64,
    terminal: bool,
}

impl Node {
    pub fn action(&self) -> PackedHand {
        self.action
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn mover(&self) -> Option<Seat> {
        self.mover
    }

    pub fn actor(&self) -> Seat {
        self.actor
    }

    pub fn obligation(&self) -> Obligation {
        self.obligation
    }

    pub fn hands(&self) -> &[PackedHand; 3] {
        &self.hands
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn state(&self) -> NodeState {
        if self.terminal {
            NodeState::Terminal
        } else if self.visits == 0 {
            NodeState::Unvisited
        } else if self.edges.iter().any(|edge| edge.child.is_none()) {
            NodeState::Expanding
        } else {
            NodeState::Expanded
        }
    }

    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter_map(|edge| edge.child)
    }

    fn has_unexpanded(&self) -> bool {
        self.edges.iter().any(|edge| edge.child.is_none())
    }
}

/// UCT tree over one determinized deal, evaluated from `perspective`'s side.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<Node>,
    perspective: Seat,
    kickers: bool,
}

impl SearchTree {
    pub fn new<R: Rng + ?Sized>(
        hands: [PackedHand; 3],
        perspective: Seat,
        obligation: Obligation,
        kickers: bool,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(64),
            perspective,
            kickers,
        };
        let root = tree.make_node(PackedHand::EMPTY, None, None, perspective, obligation, hands, rng);
        tree.nodes[root.0].visits = 1;
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// One select / expand / evaluate / backpropagate pass.
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let leaf = self.select(self.root());
        let node = self.expand(leaf, rng);
        let payoff = table_strength(&self.nodes[node.0].hands, self.perspective);
        self.backpropagate(node, payoff);
    }

    /// Root child with the highest UCB1 value, if any child exists.
    pub fn best_child(&self) -> Option<(PackedHand, f64)> {
        let root = &self.nodes[self.root().0];
        let mut best: Option<(PackedHand, f64)> = None;
        for child in root.children() {
            let value = self.ucb1(root, &self.nodes[child.0]);
            if best.is_none_or(|(_, top)| value > top) {
                best = Some((self.nodes[child.0].action, value));
            }
        }
        best
    }

    pub fn ucb1(&self, parent: &Node, child: &Node) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(child.visits);
        child.score / visits + (f64::from(parent.visits).ln() / visits).sqrt()
    }

    fn select(&self, mut id: NodeId) -> NodeId {
        loop {
            let node = &self.nodes[id.0];
            if node.terminal || node.has_unexpanded() {
                return id;
            }
            let mut best: Option<(NodeId, f64)> = None;
            for child in node.children() {
                let value = self.ucb1(node, &self.nodes[child.0]);
                if best.is_none_or(|(_, top)| value > top) {
                    best = Some((child, value));
                }
            }
            match best {
                Some((child, _)) => id = child,
                None => return id,
            }
        }
    }

    fn expand<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> NodeId {
        let parent = &self.nodes[id.0];
        if parent.terminal {
            return id;
        }
        let Some(slot) = parent.edges.iter().position(|edge| edge.child.is_none()) else {
            return id;
        };

        let action = parent.edges[slot].action;
        let mover = parent.actor;
        let mut hands = parent.hands;
        hands[mover.index()] -= action;
        let obligation = parent.obligation.after(mover, action);

        let child = self.make_node(action, Some(id), Some(mover), mover.next(), obligation, hands, rng);
        self.nodes[id.0].edges[slot].child = Some(child);
        child
    }

    fn backpropagate(&mut self, mut id: NodeId, payoff: f64) {
        let perspective = self.perspective;
        loop {
            let node = &mut self.nodes[id.0];
            node.visits += 1;
            node.score += match node.mover {
                Some(seat) if !seat.same_side(perspective) => -payoff,
                _ => payoff,
            };
            match node.parent {
                Some(parent) => id = parent,
                None => return,
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn make_node<R: Rng + ?Sized>(
        &mut self,
        action: PackedHand,
        parent: Option<NodeId>,
        mover: Option<Seat>,
        actor: Seat,
        obligation: Obligation,
        hands: [PackedHand; 3],
        rng: &mut R,
    ) -> NodeId {
        let terminal = hands.iter().any(|hand| hand.is_empty());
        let mut edges: Vec<Edge> = if terminal {
            Vec::new()
        } else {
            movegen::legal_moves(hands[actor.index()], obligation.combo(), self.kickers)
                .into_iter()
                .map(|action| Edge {
                    action,
                    child: None,
                })
                .collect()
        };
        edges.shuffle(rng);

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            action,
            parent,
            mover,
            actor,
            obligation,
            hands,
            edges,
            visits: 0,
            score: 0.0,
            terminal,
        });
        id
    }
}
