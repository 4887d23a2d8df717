use crate::basic::{Dir, GridPoint};
use crate::error::{ErrorConversion, Result};
use crate::grid::TileGraph;
use crate::prefs::Prefs;
use crate::search::{Graph, Heuristic, Search, SearchEvent, SearchOutcome, Step};
use crate::territory::{Owner, Territory};
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// How a planning attempt ended
#[derive(Clone, Debug, PartialEq)]
pub enum Plan {
    /// A path to the target is queued
    Route { target: GridPoint, steps: usize },
    /// The tile under the agent was taken, it is claimed back on the next
    /// advance without moving
    Reclaim { target: GridPoint },
    /// Every reachable tile already belongs to the agent
    NothingLeft,
    /// The search ran out of nodes without reaching the target
    Unreachable { target: GridPoint },
    /// The search hit the expansion cap and was dropped
    Abandoned { target: GridPoint },
}

/// Search statistics of one agent, expansions and time include abandoned
/// searches
#[derive(Default, Clone, Debug, PartialEq)]
pub struct SearchStats {
    /// Searches that ran to an outcome
    pub searches: usize,
    pub failed: usize,
    pub abandoned: usize,
    pub nodes_expanded: usize,
    pub elapsed: Duration,
}

impl SearchStats {
    fn record<N>(&mut self, outcome: &SearchOutcome<N>) {
        self.searches += 1;
        self.nodes_expanded += outcome.nodes_expanded();
        self.elapsed += outcome.elapsed();
        if !outcome.is_found() {
            self.failed += 1;
        }
    }

    fn record_abandoned(&mut self, nodes_expanded: usize, elapsed: Duration) {
        self.abandoned += 1;
        self.nodes_expanded += nodes_expanded;
        self.elapsed += elapsed;
    }
}

/// The AI snake: walks to the nearest tile it doesn't own, one tile per
/// tick, claiming every tile it enters
pub struct Agent {
    pub owner: Owner,
    pub pos: GridPoint,
    pub target: Option<GridPoint>,
    /// Tiles still to walk, the current tile excluded
    pub path: VecDeque<GridPoint>,
    pub stats: SearchStats,
}

impl Agent {
    pub fn new(owner: Owner, pos: GridPoint) -> Self {
        Self {
            owner,
            pos,
            target: None,
            path: VecDeque::new(),
            stats: SearchStats::default(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    /// Pick the nearest unclaimed tile and search a route to it.
    ///
    /// `on_event` sees every search event as it happens, between two events
    /// the search pauses for `prefs.search_step_delay()`.
    pub fn plan<H>(
        &mut self,
        graph: &TileGraph,
        territory: &Territory<GridPoint>,
        heuristic: &H,
        prefs: &Prefs,
        mut on_event: impl FnMut(&SearchEvent<GridPoint>),
    ) -> Result<Plan>
    where
        H: Heuristic<GridPoint> + ?Sized,
    {
        self.path.clear();
        let target = match territory.nearest_unclaimed(graph, self.pos, self.owner) {
            Some(target) => target,
            None => {
                self.target = None;
                return Ok(Plan::NothingLeft);
            }
        };
        self.target = Some(target);

        if target == self.pos {
            self.path.push_back(target);
            debug!("{} lost {:?}, taking it back", self.owner, target);
            return Ok(Plan::Reclaim { target });
        }

        let mut search = Search::new(graph, self.pos, target, heuristic)
            .with_trace_step(format!("{} planning", self.owner))?;
        let delay = prefs.search_step_delay();

        let outcome = loop {
            if let Some(cap) = prefs.max_expansions {
                if search.nodes_expanded() > cap {
                    warn!(
                        "{} gave up on {:?} after {} expansions",
                        self.owner,
                        target,
                        search.nodes_expanded()
                    );
                    self.stats
                        .record_abandoned(search.nodes_expanded(), search.elapsed());
                    self.target = None;
                    return Ok(Plan::Abandoned { target });
                }
            }

            match search
                .step()
                .with_trace_step(format!("{} planning", self.owner))?
            {
                Step::Event(event) => {
                    on_event(&event);
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
                Step::Finished(outcome) => break outcome,
            }
        };

        self.stats.record(&outcome);
        debug!(
            "{} searched {:?} -> {:?}: {} expansions in {:?}",
            self.owner,
            self.pos,
            target,
            outcome.nodes_expanded(),
            outcome.elapsed()
        );

        match outcome.into_path() {
            Some(path) => {
                self.path = path.nodes;
                // the first node is where we stand
                self.path.pop_front();
                info!(
                    "{} heading to {:?}, {} steps, cost {}",
                    self.owner,
                    target,
                    self.path.len(),
                    path.cost
                );
                Ok(Plan::Route {
                    target,
                    steps: self.path.len(),
                })
            }
            None => {
                self.target = None;
                Ok(Plan::Unreachable { target })
            }
        }
    }

    /// Move one tile along the planned path and claim it, a queued reclaim
    /// claims the current tile
    pub fn advance(&mut self, territory: &mut Territory<GridPoint>) -> Option<GridPoint> {
        let next = self.path.pop_front()?;
        self.pos = next;
        territory.claim(next, self.owner);
        trace!("{} moved to {:?}", self.owner, next);
        if self.path.is_empty() {
            self.target = None;
        }
        Some(next)
    }
}

/// Stand-in for the keyboard player: keeps going in one direction and
/// turns at random or when blocked
pub struct Wanderer {
    pub owner: Owner,
    pub pos: GridPoint,
    pub dir: Dir,
    pub turn_probability: f64,
}

impl Wanderer {
    pub fn new(owner: Owner, pos: GridPoint, dir: Dir, turn_probability: f64) -> Self {
        Self {
            owner,
            pos,
            dir,
            turn_probability,
        }
    }

    pub fn advance(
        &mut self,
        graph: &TileGraph,
        territory: &mut Territory<GridPoint>,
        rng: &mut impl Rng,
    ) -> Option<GridPoint> {
        let options: Vec<_> = graph.neighbors(self.pos);
        if options.is_empty() {
            return None;
        }

        let blocked = !options.iter().any(|e| e.label == self.dir);
        if blocked || rng.gen_bool(self.turn_probability) {
            self.dir = options[rng.gen_range(0..options.len())].label;
        }

        let next = graph.neighbor(self.pos, self.dir)?;
        self.pos = next;
        territory.claim(next, self.owner);
        trace!("{} moved to {:?}", self.owner, next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::SearchType;
    use crate::search::{Manhattan, Zero};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(x: isize, y: isize) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn walks_to_the_nearest_unclaimed_tile() {
        let graph = TileGraph::uniform(3, 3, 1.).unwrap();
        let mut territory = Territory::new();
        for x in 0..3 {
            territory.claim(p(x, 0), Owner::Ai);
            territory.claim(p(x, 1), Owner::Ai);
        }
        territory.claim(p(0, 2), Owner::Ai);
        territory.claim(p(1, 2), Owner::Ai);

        let mut agent = Agent::new(Owner::Ai, p(0, 0));
        let h = Manhattan { step_cost: 1. };
        let mut events = 0;
        let plan = agent
            .plan(&graph, &territory, &h, &Prefs::default(), |_| events += 1)
            .unwrap();
        assert_eq!(
            plan,
            Plan::Route {
                target: p(2, 2),
                steps: 4
            }
        );
        assert!(events > 0);
        assert_eq!(agent.stats.searches, 1);

        for _ in 0..4 {
            assert!(agent.advance(&mut territory).is_some());
        }
        assert_eq!(agent.pos, p(2, 2));
        assert!(agent.is_idle());
        assert_eq!(agent.target, None);
        assert_eq!(agent.advance(&mut territory), None);
        assert_eq!(territory.claimed_by(Owner::Ai), 9);

        let plan = agent
            .plan(&graph, &territory, &h, &Prefs::default(), |_| {})
            .unwrap();
        assert_eq!(plan, Plan::NothingLeft);
    }

    #[test]
    fn expansion_cap_abandons_the_search() {
        let graph = TileGraph::uniform(20, 20, 1.).unwrap();
        let mut territory = Territory::new();
        for tile in graph.tiles() {
            if tile != p(19, 19) {
                territory.claim(tile, Owner::Ai);
            }
        }
        let prefs = Prefs::default()
            .search_type(SearchType::Dijkstra)
            .max_expansions(Some(10));
        let mut agent = Agent::new(Owner::Ai, p(0, 0));
        let plan = agent
            .plan(&graph, &territory, &Zero, &prefs, |_| {})
            .unwrap();
        assert_eq!(plan, Plan::Abandoned { target: p(19, 19) });
        assert_eq!(agent.stats.abandoned, 1);
        assert_eq!(agent.stats.searches, 0);
        // the cap is checked before each step, so one expansion over it
        assert_eq!(agent.stats.nodes_expanded, 11);
        assert!(agent.is_idle());
    }

    #[test]
    fn stolen_tile_under_the_agent_is_claimed_back() {
        let graph = TileGraph::uniform(1, 1, 1.).unwrap();
        let mut territory = Territory::new();
        territory.claim(p(0, 0), Owner::Ai);
        territory.claim(p(0, 0), Owner::Player);

        let mut agent = Agent::new(Owner::Ai, p(0, 0));
        let plan = agent
            .plan(&graph, &territory, &Zero, &Prefs::default(), |_| {})
            .unwrap();
        assert_eq!(plan, Plan::Reclaim { target: p(0, 0) });
        assert!(!agent.is_idle());
        assert_eq!(agent.stats.searches, 0);

        assert_eq!(agent.advance(&mut territory), Some(p(0, 0)));
        assert_eq!(agent.pos, p(0, 0));
        assert_eq!(territory.owner(p(0, 0)), Some(Owner::Ai));
        assert_eq!(territory.claimed_by(Owner::Player), 0);

        let plan = agent
            .plan(&graph, &territory, &Zero, &Prefs::default(), |_| {})
            .unwrap();
        assert_eq!(plan, Plan::NothingLeft);
    }

    #[test]
    fn wanderer_turns_when_blocked() {
        let graph = TileGraph::uniform(2, 1, 1.).unwrap();
        let mut territory = Territory::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = Wanderer::new(Owner::Player, p(0, 0), Dir::U, 0.);

        assert_eq!(player.advance(&graph, &mut territory, &mut rng), Some(p(1, 0)));
        assert_eq!(player.dir, Dir::R);
        assert_eq!(player.advance(&graph, &mut territory, &mut rng), Some(p(0, 0)));
        assert_eq!(player.dir, Dir::L);
        assert_eq!(territory.claimed_by(Owner::Player), 2);
    }
}
