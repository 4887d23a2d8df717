use clap::Parser;
use std::path::PathBuf;
use tile_claim::error::Result;
use tile_claim::game::Game;
use tile_claim::prefs::{HeuristicType, Prefs, SearchType};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tile_claim")]
#[command(about = "Headless tile-claiming snake game with a path-finding AI")]
struct Args {
    /// JSON prefs file, flags below override its values
    #[arg(long)]
    prefs: Option<PathBuf>,

    #[arg(long, value_enum)]
    search_type: Option<SearchType>,

    #[arg(long, value_enum)]
    heuristic: Option<HeuristicType>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    #[arg(long)]
    step_cost: Option<f64>,

    #[arg(long)]
    ticks: Option<usize>,

    /// Abandon searches that expand more nodes than this
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Pause between two search steps, in milliseconds
    #[arg(long)]
    step_delay_ms: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Chance the player turns on a tick, between 0 and 1
    #[arg(long)]
    player_turn_probability: Option<f64>,
}

impl Args {
    fn apply(self, mut prefs: Prefs) -> Prefs {
        if let Some(search_type) = self.search_type {
            prefs.search_type = search_type;
        }
        if let Some(heuristic) = self.heuristic {
            prefs.heuristic_type = heuristic;
        }
        if let Some(width) = self.width {
            prefs.board_width = width;
        }
        if let Some(height) = self.height {
            prefs.board_height = height;
        }
        if let Some(step_cost) = self.step_cost {
            prefs.step_cost = step_cost;
        }
        if let Some(ticks) = self.ticks {
            prefs.ticks = ticks;
        }
        if self.max_expansions.is_some() {
            prefs.max_expansions = self.max_expansions;
        }
        if let Some(delay) = self.step_delay_ms {
            prefs.search_step_delay_ms = delay;
        }
        if let Some(seed) = self.seed {
            prefs.player_seed = seed;
        }
        if let Some(probability) = self.player_turn_probability {
            prefs.player_turn_probability = probability;
        }
        prefs
    }
}

fn main() -> Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let prefs = match &args.prefs {
        Some(path) => Prefs::load(path)?,
        None => Prefs::default(),
    };
    let prefs = args.apply(prefs);

    let summary = Game::new(prefs)?.run()?;
    info!(
        "searches: {} ({} failed, {} abandoned), {} nodes expanded in {:?}",
        summary.search.searches,
        summary.search.failed,
        summary.search.abandoned,
        summary.search.nodes_expanded,
        summary.search.elapsed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_prefs() {
        let args = Args::parse_from([
            "tile_claim",
            "--search-type",
            "dijkstra",
            "--width",
            "4",
            "--player-turn-probability",
            "0.5",
        ]);
        let prefs = args.apply(Prefs::default().board(9, 9).ticks(7));
        assert_eq!(prefs.search_type, SearchType::Dijkstra);
        assert_eq!(prefs.board_width, 4);
        assert_eq!(prefs.board_height, 9);
        assert_eq!(prefs.ticks, 7);
        assert_eq!(prefs.player_turn_probability, 0.5);
    }
}
