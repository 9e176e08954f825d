//! Extensive-form game tree for counterfactual regret minimization.
//!
//! The betting rules live outside this crate behind the [`GameState`]
//! trait. [`build`] walks every legal line of play from a starting state and
//! records one node per decision, chance point or showdown.

use std::fmt;

use crate::cards::Card;
use crate::cfr::regret_matching;
use crate::error::{NashError, NashResult};

/// Round index at which a hand is over.
pub const FINAL_ROUND: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold = 0,
    Call = 1,
    Raise = 2,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Fold, Action::Call, Action::Raise];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn to_char(self) -> char {
        match self {
            Action::Fold => 'f',
            Action::Call => 'c',
            Action::Raise => 'r',
        }
    }

    pub fn from_char(c: char) -> NashResult<Action> {
        match c {
            'f' => Ok(Action::Fold),
            'c' => Ok(Action::Call),
            'r' => Ok(Action::Raise),
            _ => Err(NashError::InvalidValue(format!("unknown action '{c}'"))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A change applied to a game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// The player to act takes an action.
    Action(Action),
    /// Cards are revealed. An empty list advances past a chance point
    /// without naming the cards.
    Cards(Vec<Card>),
}

/// Betting-rules state the tree builder drives.
///
/// `Clone` must produce an independent copy: the builder clones before
/// every update so sibling subtrees never share state.
pub trait GameState: Clone {
    /// Current betting round, 0 to [`FINAL_ROUND`].
    fn round(&self) -> usize;

    /// Players still contesting the pot.
    fn num_active(&self) -> usize;

    /// Seat to act, or `None` at a chance point.
    fn actor(&self) -> Option<usize>;

    /// Seat the tree is built for.
    fn viewer(&self) -> usize;

    fn legal_actions(&self) -> Vec<Action>;

    fn update(&mut self, update: Update) -> NashResult<()>;

    fn pot(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Hand over; holds the pot.
    Terminal(f64),
    Bucket(Bucket),
    Opponent(Opponent),
    Player(Player),
}

/// Chance point where cards are observed. One class per card abstraction
/// bucket; only a single class is modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub classes: [Box<Node>; 1],
}

/// Opponent decision, one child per legal action.
#[derive(Debug, Clone, PartialEq)]
pub struct Opponent {
    pub actions: [Option<Box<Node>>; 3],
}

impl Opponent {
    pub fn child(&self, action: Action) -> Option<&Node> {
        self.actions[action.index()].as_deref()
    }
}

/// Decision of the seat the tree is built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub actions: [Option<Box<Node>>; 3],
    /// Cumulative counterfactual regret per action.
    pub regret: [f64; 3],
    /// Probability of each action; zero for illegal ones.
    pub strategy: [f64; 3],
}

impl Player {
    fn new(legal: &[Action]) -> Player {
        let mut strategy = [0.0; 3];
        uniform(&mut strategy, legal);
        Player {
            actions: [None, None, None],
            regret: [0.0; 3],
            strategy,
        }
    }

    pub fn child(&self, action: Action) -> Option<&Node> {
        self.actions[action.index()].as_deref()
    }

    pub fn legal(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.actions[a.index()].is_some())
            .collect()
    }

    /// Accumulates one iteration of regret. Illegal actions are ignored.
    pub fn add_regret(&mut self, regret: &[f64; 3]) {
        for a in self.legal() {
            self.regret[a.index()] += regret[a.index()];
        }
    }

    /// Recomputes the strategy from cumulative regret by regret matching.
    ///
    /// Unlike [`regret_matching`] on its own, this falls back to uniform over
    /// the legal actions when no regret is positive, so `strategy` stays a
    /// probability distribution.
    pub fn refresh_strategy(&mut self) {
        let matched = regret_matching(&self.regret);
        if matched.iter().all(|&p| p == 0.0) {
            let legal = self.legal();
            uniform(&mut self.strategy, &legal);
            return;
        }
        self.strategy.copy_from_slice(&matched);
    }
}

fn uniform(strategy: &mut [f64; 3], legal: &[Action]) {
    *strategy = [0.0; 3];
    if legal.is_empty() {
        return;
    }
    let p = 1.0 / legal.len() as f64;
    for a in legal {
        strategy[a.index()] = p;
    }
}

/// Builds the full game tree reachable from `state`.
pub fn build<S: GameState>(state: &S) -> NashResult<Node> {
    if state.round() >= FINAL_ROUND || state.num_active() < 2 {
        return Ok(Node::Terminal(state.pot()));
    }

    let Some(actor) = state.actor() else {
        let mut next = state.clone();
        next.update(Update::Cards(Vec::new()))?;
        return Ok(Node::Bucket(Bucket {
            classes: [Box::new(build(&next)?)],
        }));
    };

    let legal = state.legal_actions();
    let mut actions: [Option<Box<Node>>; 3] = [None, None, None];
    for &a in &legal {
        let mut next = state.clone();
        next.update(Update::Action(a))?;
        actions[a.index()] = Some(Box::new(build(&next)?));
    }

    if actor == state.viewer() {
        let mut player = Player::new(&legal);
        player.actions = actions;
        Ok(Node::Player(player))
    } else {
        Ok(Node::Opponent(Opponent { actions }))
    }
}

/// Renders the tree breadth first, one line per depth.
///
/// Each node prints as a parenthesised group: `B0` for a bucket class, the
/// strategy then the action letters for a player, the action letters for an
/// opponent, and the rounded pot for a terminal. The last line is the depth.
pub fn render(root: &Node) -> String {
    let mut out = String::new();
    let mut depth = 0;
    let mut level = vec![root];

    while !level.is_empty() {
        depth += 1;
        let mut next: Vec<&Node> = Vec::new();
        for node in level {
            out.push('(');
            match node {
                Node::Terminal(pot) => out.push_str(&format!("{pot:.0}")),
                Node::Bucket(bucket) => {
                    for (i, class) in bucket.classes.iter().enumerate() {
                        out.push_str(&format!("B{i}"));
                        next.push(&**class);
                    }
                }
                Node::Player(player) => {
                    let [f, c, r] = player.strategy;
                    out.push_str(&format!("[{f} {c} {r}]"));
                    push_actions(&mut out, &mut next, &player.actions);
                }
                Node::Opponent(opponent) => push_actions(&mut out, &mut next, &opponent.actions),
            }
            out.push(')');
        }
        out.push('\n');
        level = next;
    }

    out.push_str(&format!("Depth: {depth}\n"));
    out
}

fn push_actions<'a>(out: &mut String, next: &mut Vec<&'a Node>, actions: &'a [Option<Box<Node>>; 3]) {
    for (a, child) in Action::ALL.iter().zip(actions) {
        if let Some(child) = child {
            out.push(a.to_char());
            next.push(child);
        }
    }
}

/// Number of nodes in the tree.
pub fn node_count(root: &Node) -> usize {
    let children: usize = match root {
        Node::Terminal(_) => 0,
        Node::Bucket(b) => b.classes.iter().map(|c| node_count(c)).sum(),
        Node::Opponent(Opponent { actions }) | Node::Player(Player { actions, .. }) => {
            actions.iter().flatten().map(|c| node_count(c)).sum()
        }
    };
    children + 1
}
