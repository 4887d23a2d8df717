use crate::agent::{Agent, Plan, SearchStats, Wanderer};
use crate::basic::{Dir, GridPoint};
use crate::error::{Error, ErrorConversion, Result};
use crate::grid::TileGraph;
use crate::prefs::{BoxedHeuristic, Prefs};
use crate::search::SearchEvent;
use crate::territory::{Owner, Territory};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

/// Claim counts and search statistics at the end of a run
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub ticks: usize,
    pub tiles: usize,
    pub ai_tiles: usize,
    pub player_tiles: usize,
    pub search: SearchStats,
}

/// Headless game: the AI snake path-finds to unclaimed tiles while the
/// player wanders, both one tile per tick
pub struct Game {
    prefs: Prefs,
    graph: TileGraph,
    heuristic: BoxedHeuristic,
    territory: Territory<GridPoint>,
    ai: Agent,
    player: Wanderer,
    rng: StdRng,
    ticks: usize,
}

impl Game {
    /// AI starts in the bottom-left corner, the player in the top-right one
    pub fn new(prefs: Prefs) -> Result<Self> {
        let graph = TileGraph::uniform(prefs.board_width, prefs.board_height, prefs.step_cost)
            .map_err(|e| Error::from(e).with_trace_step("game setup"))?;
        Self::with_graph(prefs, graph)
    }

    pub fn with_graph(prefs: Prefs, graph: TileGraph) -> Result<Self> {
        prefs.validate().with_trace_step("game setup")?;

        let GridPoint { x: width, y: height } = graph.dim();
        let ai_start = GridPoint::new(0, 0);
        let player_start = GridPoint::new(width - 1, height - 1);

        let mut territory = Territory::new();
        territory.claim(ai_start, Owner::Ai);
        territory.claim(player_start, Owner::Player);

        info!(
            "{}x{} board, AI at {:?}, player at {:?}, {:?} / {:?}",
            width, height, ai_start, player_start, prefs.search_type, prefs.heuristic_type
        );

        Ok(Self {
            heuristic: prefs.heuristic(),
            rng: StdRng::seed_from_u64(prefs.player_seed),
            ai: Agent::new(Owner::Ai, ai_start),
            player: Wanderer::new(
                Owner::Player,
                player_start,
                Dir::D,
                prefs.player_turn_probability,
            ),
            territory,
            graph,
            prefs,
            ticks: 0,
        })
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    pub fn territory(&self) -> &Territory<GridPoint> {
        &self.territory
    }

    pub fn ai(&self) -> &Agent {
        &self.ai
    }

    pub fn player(&self) -> &Wanderer {
        &self.player
    }

    /// One move for each side, the AI plans first if it has nowhere to go
    pub fn tick(&mut self) -> Result {
        self.ticks += 1;

        if self.ai.is_idle() {
            let plan = self
                .ai
                .plan(
                    &self.graph,
                    &self.territory,
                    &*self.heuristic,
                    &self.prefs,
                    log_event,
                )
                .with_trace_step(format!("tick {}", self.ticks))?;
            if !matches!(plan, Plan::Route { .. } | Plan::Reclaim { .. }) {
                debug!("tick {}: AI has no route ({:?})", self.ticks, plan);
            }
        }
        self.ai.advance(&mut self.territory);
        self.player
            .advance(&self.graph, &mut self.territory, &mut self.rng);

        Ok(())
    }

    pub fn run(&mut self) -> Result<Summary> {
        for _ in 0..self.prefs.ticks {
            self.tick()?;
        }
        let summary = self.summary();
        info!(
            "after {} ticks: AI {} / player {} of {} tiles",
            summary.ticks, summary.ai_tiles, summary.player_tiles, summary.tiles
        );
        Ok(summary)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            ticks: self.ticks,
            tiles: self.graph.tile_count(),
            ai_tiles: self.territory.claimed_by(Owner::Ai),
            player_tiles: self.territory.claimed_by(Owner::Player),
            search: self.ai.stats.clone(),
        }
    }
}

fn log_event(event: &SearchEvent<GridPoint>) {
    trace!("{:?}", event);
}
