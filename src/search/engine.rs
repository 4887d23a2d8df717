use super::heuristic::Heuristic;
use super::path::reconstruct;
use super::record::{RecordStore, SearchRecord};
use super::{Cost, Edge, Graph, SearchEvent, SearchOutcome};
use crate::error::{
    ErrorConversion, ErrorType, InvalidEdgeCost, InvalidEstimate, NodeRole, Result, UnknownNode,
};
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// What a single call to [`Search::step`] produced
#[derive(Clone, Debug, PartialEq)]
pub enum Step<N> {
    Event(SearchEvent<N>),
    Finished(SearchOutcome<N>),
}

enum Phase<N, L> {
    /// Pick the next record from the open set
    Select,
    /// Relax the outgoing edges of `current` one at a time
    Expand {
        current: usize,
        edges: Vec<Edge<N, L>>,
        next_edge: usize,
    },
    /// The goal was selected, the path is built on the next step
    Reached { goal: usize },
    Finished(SearchOutcome<N>),
    Poisoned,
}

/// Best-first search from `start` to `goal`.
///
/// With the [`Zero`](super::Zero) heuristic this is Dijkstra's algorithm,
/// with anything else it is A*. The search advances one state change per
/// [`step`](Search::step) so a driver can pause between steps to show
/// progress, [`run`](Search::run) goes all the way in one call. Dropping a
/// search half way is fine, it holds nothing but its own records.
pub struct Search<'a, G: Graph, H: Heuristic<G::Node> + ?Sized> {
    graph: &'a G,
    heuristic: &'a H,
    start: G::Node,
    goal: G::Node,
    store: RecordStore<G::Node>,
    phase: Phase<G::Node, G::Label>,
    nodes_expanded: usize,
    elapsed: Duration,
}

impl<'a, G, H> Search<'a, G, H>
where
    G: Graph,
    H: Heuristic<G::Node> + ?Sized,
{
    /// Fails if either end is not part of `graph` or the heuristic rejects
    /// the start, no search state is created in that case.
    pub fn new(graph: &'a G, start: G::Node, goal: G::Node, heuristic: &'a H) -> Result<Self> {
        let started = Instant::now();

        if !graph.contains(start) {
            return Err(UnknownNode {
                role: NodeRole::Start,
                node: format!("{:?}", start),
            }
            .into());
        }
        if !graph.contains(goal) {
            return Err(UnknownNode {
                role: NodeRole::Goal,
                node: format!("{:?}", goal),
            }
            .into());
        }

        let estimate = checked_estimate(heuristic, start, start, goal)?;
        let mut store = RecordStore::new();
        store.discover(start, 0., estimate, None);

        debug!("search {:?} -> {:?}", start, goal);

        Ok(Self {
            graph,
            heuristic,
            start,
            goal,
            store,
            phase: Phase::Select,
            nodes_expanded: 0,
            elapsed: started.elapsed(),
        })
    }

    pub fn start(&self) -> G::Node {
        self.start
    }

    pub fn goal(&self) -> G::Node {
        self.goal
    }

    /// Number of records selected from the open set so far
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    /// Time spent inside `new` and `step`, pauses between steps excluded
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Every record discovered so far, open or closed
    pub fn records(&self) -> &[SearchRecord<G::Node>] {
        self.store.records()
    }

    pub fn record(&self, node: G::Node) -> Option<&SearchRecord<G::Node>> {
        self.store.find(&node).map(|i| self.store.get(i))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// Perform one state change.
    ///
    /// Emits [`NodeActivated`](SearchEvent::NodeActivated) when a record is
    /// selected, [`NodeDiscoveredOrUpdated`](SearchEvent::NodeDiscoveredOrUpdated)
    /// for each neighbor whose record is created, improved or reopened, and
    /// [`NodeSettled`](SearchEvent::NodeSettled) once every edge of the
    /// selected record is relaxed. Neighbors that don't improve produce no
    /// event. Once the search is over every further call returns the same
    /// [`Step::Finished`]. After an error the search is unusable.
    pub fn step(&mut self) -> Result<Step<G::Node>> {
        let was_finished = self.is_finished();
        let started = Instant::now();
        let result = self.advance();
        if !was_finished {
            self.elapsed += started.elapsed();
        }

        match result {
            Ok(Some(event)) => {
                trace!("{:?}", event);
                Ok(Step::Event(event))
            }
            Ok(None) => match &mut self.phase {
                Phase::Finished(outcome) => {
                    outcome.set_elapsed(self.elapsed);
                    Ok(Step::Finished(outcome.clone()))
                }
                _ => unreachable!("search stopped without an outcome"),
            },
            Err(e) => {
                self.phase = Phase::Poisoned;
                Err(e.with_trace_step(format!("search {:?} -> {:?}", self.start, self.goal)))
            }
        }
    }

    /// Step until the search is over, handing every event to `sink`
    pub fn run(
        mut self,
        mut sink: impl FnMut(&SearchEvent<G::Node>),
    ) -> Result<SearchOutcome<G::Node>> {
        loop {
            match self.step()? {
                Step::Event(event) => sink(&event),
                Step::Finished(outcome) => {
                    debug!(
                        "search {:?} -> {:?} {} after {} expansions in {:?}",
                        self.start,
                        self.goal,
                        if outcome.is_found() { "found" } else { "failed" },
                        outcome.nodes_expanded(),
                        outcome.elapsed(),
                    );
                    return Ok(outcome);
                }
            }
        }
    }

    // None once the search is finished
    fn advance(&mut self) -> Result<Option<SearchEvent<G::Node>>> {
        match self.phase {
            Phase::Select => self.select(),
            Phase::Expand { .. } => self.relax_next_edge().map(Some),
            Phase::Reached { goal } => {
                let path = reconstruct(self.store.records(), goal)
                    .with_trace_step("path reconstruction")?;
                self.phase = Phase::Finished(SearchOutcome::Found {
                    path,
                    nodes_expanded: self.nodes_expanded,
                    elapsed: self.elapsed,
                });
                Ok(None)
            }
            Phase::Finished(_) => Ok(None),
            Phase::Poisoned => Err(ErrorType::Poisoned.into()),
        }
    }

    fn select(&mut self) -> Result<Option<SearchEvent<G::Node>>> {
        let current = match self.store.pop_min() {
            Some(i) => i,
            None => {
                self.phase = Phase::Finished(SearchOutcome::NotFound {
                    nodes_expanded: self.nodes_expanded,
                    elapsed: self.elapsed,
                });
                return Ok(None);
            }
        };
        self.nodes_expanded += 1;

        let node = self.store.get(current).node;
        if node == self.goal {
            self.phase = Phase::Reached { goal: current };
            return Ok(Some(SearchEvent::NodeActivated(node)));
        }

        let edges = self.graph.neighbors(node);
        if let Some(edge) = edges.iter().find(|e| !is_valid_cost(e.cost)) {
            return Err(InvalidEdgeCost {
                from: format!("{:?}", node),
                to: format!("{:?}", edge.to),
                cost: edge.cost,
            }
            .into());
        }

        self.phase = Phase::Expand {
            current,
            edges,
            next_edge: 0,
        };
        Ok(Some(SearchEvent::NodeActivated(node)))
    }

    // relax edges until one of them improves a record or none are left
    fn relax_next_edge(&mut self) -> Result<SearchEvent<G::Node>> {
        loop {
            let (current, edge) = match &mut self.phase {
                Phase::Expand {
                    current,
                    edges,
                    next_edge,
                } => {
                    let edge = edges.get(*next_edge).copied();
                    *next_edge += 1;
                    (*current, edge)
                }
                _ => unreachable!("relaxing an edge outside of an expansion"),
            };

            let edge = match edge {
                Some(edge) => edge,
                None => {
                    self.store.close(current);
                    self.phase = Phase::Select;
                    return Ok(SearchEvent::NodeSettled(self.store.get(current).node));
                }
            };

            let candidate_cost = self.store.get(current).cost_so_far + edge.cost;

            match self.store.find(&edge.to) {
                Some(existing) => {
                    let record = self.store.get(existing);
                    // only a strictly cheaper route replaces the stored one
                    if record.cost_so_far <= candidate_cost {
                        continue;
                    }
                    if !record.is_open() {
                        trace!("reopen {:?}", edge.to);
                    }
                    self.store.improve(existing, candidate_cost, current);
                }
                None => {
                    let estimate =
                        checked_estimate(self.heuristic, self.start, edge.to, self.goal)?;
                    self.store
                        .discover(edge.to, candidate_cost, estimate, Some(current));
                }
            }

            return Ok(SearchEvent::NodeDiscoveredOrUpdated(
                edge.to,
                candidate_cost,
            ));
        }
    }
}

fn is_valid_cost(cost: Cost) -> bool {
    cost.is_finite() && cost >= 0.
}

fn checked_estimate<N, H>(heuristic: &H, start: N, node: N, goal: N) -> Result<Cost>
where
    N: Debug,
    H: Heuristic<N> + ?Sized,
{
    let value = heuristic.estimate(&start, &node, &goal);
    if is_valid_cost(value) {
        Ok(value)
    } else {
        Err(InvalidEstimate {
            node: format!("{:?}", node),
            value,
        }
        .into())
    }
}

/// Run a whole search, discarding the events
pub fn search<G, H>(
    graph: &G,
    start: G::Node,
    goal: G::Node,
    heuristic: &H,
) -> Result<SearchOutcome<G::Node>>
where
    G: Graph,
    H: Heuristic<G::Node> + ?Sized,
{
    Search::new(graph, start, goal, heuristic)?.run(|_| {})
}

/// Run a whole search and keep its events in order
pub fn search_with_events<G, H>(
    graph: &G,
    start: G::Node,
    goal: G::Node,
    heuristic: &H,
) -> Result<(SearchOutcome<G::Node>, Vec<SearchEvent<G::Node>>)>
where
    G: Graph,
    H: Heuristic<G::Node> + ?Sized,
{
    let mut events = vec![];
    let outcome = Search::new(graph, start, goal, heuristic)?.run(|e| events.push(*e))?;
    Ok((outcome, events))
}
