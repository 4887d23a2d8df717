use crate::basic::GridPoint;
use crate::error::{ErrorConversion, InvalidPref, Result};
use crate::search::{Cost, CrossProduct, Heuristic, Manhattan, Zero};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
pub enum SearchType {
    Dijkstra,
    AStar,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
pub enum HeuristicType {
    Uniform,
    Manhattan,
    CrossProduct,
}

pub type BoxedHeuristic = Box<dyn Heuristic<GridPoint> + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub search_type: SearchType,
    /// Ignored by Dijkstra
    pub heuristic_type: HeuristicType,

    pub board_width: usize,
    pub board_height: usize,
    pub step_cost: Cost,

    pub ticks: usize,
    /// Searches expanding more nodes than this are abandoned
    pub max_expansions: Option<usize>,
    /// Pause between two search steps, lets a viewer follow the search
    pub search_step_delay_ms: u64,

    pub player_seed: u64,
    /// Chance the player picks a new direction on a tick
    pub player_turn_probability: f64,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            search_type: SearchType::AStar,
            heuristic_type: HeuristicType::Manhattan,

            board_width: 10,
            board_height: 16,
            step_cost: 1.,

            ticks: 200,
            max_expansions: None,
            search_step_delay_ms: 0,

            player_seed: 0,
            player_turn_probability: 0.2,
        }
    }
}

// builder
impl Prefs {
    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn heuristic_type(mut self, heuristic_type: HeuristicType) -> Self {
        self.heuristic_type = heuristic_type;
        self
    }

    pub fn board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    pub fn step_cost(mut self, step_cost: Cost) -> Self {
        self.step_cost = step_cost;
        self
    }

    pub fn ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn player_seed(mut self, player_seed: u64) -> Self {
        self.player_seed = player_seed;
        self
    }

    pub fn player_turn_probability(mut self, probability: f64) -> Self {
        self.player_turn_probability = probability;
        self
    }
}

impl Prefs {
    /// Read prefs from a JSON file, missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load = || -> Result<Self> {
            let text = std::fs::read_to_string(path)?;
            let prefs: Self = serde_json::from_str(&text)?;
            prefs.validate()?;
            Ok(prefs)
        };
        load().with_trace_step(format!("loading prefs from {}", path.display()))
    }

    /// Values the board builder doesn't already check
    pub fn validate(&self) -> Result {
        let p = self.player_turn_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(InvalidPref {
                field: "player_turn_probability",
                value: p.to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn search_step_delay(&self) -> Duration {
        Duration::from_millis(self.search_step_delay_ms)
    }

    pub fn heuristic(&self) -> BoxedHeuristic {
        let step_cost = self.step_cost;
        match (self.search_type, self.heuristic_type) {
            (SearchType::Dijkstra, _) | (SearchType::AStar, HeuristicType::Uniform) => {
                Box::new(Zero)
            }
            (SearchType::AStar, HeuristicType::Manhattan) => Box::new(Manhattan { step_cost }),
            (SearchType::AStar, HeuristicType::CrossProduct) => {
                Box::new(CrossProduct::new(step_cost))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::search::Admissibility;

    #[test]
    fn partial_json_keeps_defaults() {
        let prefs: Prefs =
            serde_json::from_str(r#"{ "search_type": "Dijkstra", "board_width": 4 }"#).unwrap();
        assert_eq!(prefs.search_type, SearchType::Dijkstra);
        assert_eq!(prefs.board_width, 4);
        assert_eq!(prefs.board_height, Prefs::default().board_height);
        assert_eq!(prefs.heuristic_type, HeuristicType::Manhattan);
    }

    #[test]
    fn dijkstra_ignores_the_heuristic_type() {
        let prefs = Prefs::default()
            .search_type(SearchType::Dijkstra)
            .heuristic_type(HeuristicType::CrossProduct);
        let h = prefs.heuristic();
        let (a, b) = (GridPoint::new(0, 0), GridPoint::new(5, 5));
        assert_eq!(h.estimate(&a, &a, &b), 0.);
        assert_eq!(h.admissibility(), Admissibility::Consistent);
    }

    #[test]
    fn heuristic_follows_prefs() {
        let (a, b) = (GridPoint::new(0, 0), GridPoint::new(3, 1));
        let manhattan = Prefs::default().step_cost(2.).heuristic();
        assert_eq!(manhattan.estimate(&a, &a, &b), 8.);
        let cross = Prefs::default()
            .heuristic_type(HeuristicType::CrossProduct)
            .heuristic();
        assert_eq!(cross.admissibility(), Admissibility::Unknown);
    }

    #[test]
    fn turn_probability_must_be_a_probability() {
        assert!(Prefs::default().validate().is_ok());
        assert!(Prefs::default().player_turn_probability(1.).validate().is_ok());
        for bad in [1.5, -0.1, f64::NAN] {
            let err = Prefs::default()
                .player_turn_probability(bad)
                .validate()
                .unwrap_err();
            assert!(err.is_config_error());
            assert!(matches!(err.error_type(), ErrorType::InvalidPref(e) if e.field == "player_turn_probability"));
        }
    }

    #[test]
    fn loading_rejects_out_of_range_prefs() {
        let path = std::env::temp_dir().join(format!(
            "tile_claim_prefs_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "player_turn_probability": 1.5 }"#).unwrap();
        let result = Prefs::load(&path);
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(matches!(err.error_type(), ErrorType::InvalidPref(_)));
        assert!(format!("{}", err).contains("loading prefs"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Prefs::load("/nonexistent/tile_claim/prefs.json").unwrap_err();
        assert!(err.is_config_error());
        assert!(format!("{}", err).contains("loading prefs"));
    }
}
