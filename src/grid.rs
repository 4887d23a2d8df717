use crate::basic::{Dir, GridDim, GridPoint};
use crate::search::{Cost, Edge, Graph};
use itertools::iproduct;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Error)]
#[must_use]
pub struct BuilderError(pub Box<Builder>, pub &'static str);

impl Display for BuilderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "tile graph builder error: {}", self.1)?;
        writeln!(f, "builder: {:?}", self.0)
    }
}

/// Rectangular board of tiles, each connected to its four neighbors.
///
/// Connections are undirected: a wall or a custom cost always applies to
/// both directions of the connection.
#[derive(Clone, Debug)]
pub struct TileGraph {
    dim: GridDim,
    step_cost: Cost,
    // keyed by the lower end of the connection (see `normalize`),
    // `None` means the connection was removed
    overrides: HashMap<(GridPoint, Dir), Option<Cost>>,
}

#[derive(Default, Clone, Debug)]
pub struct Builder {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub step_cost: Option<Cost>,
    pub walls: Vec<(GridPoint, Dir)>,
    pub costs: Vec<(GridPoint, Dir, Cost)>,
}

impl Builder {
    #[inline(always)]
    #[must_use]
    pub fn width(mut self, value: usize) -> Self {
        self.width = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn height(mut self, value: usize) -> Self {
        self.height = Some(value);
        self
    }

    #[inline(always)]
    #[must_use]
    pub fn step_cost(mut self, value: Cost) -> Self {
        self.step_cost = Some(value);
        self
    }

    /// Remove the connection between `pos` and its neighbor in `dir`
    #[inline(always)]
    #[must_use]
    pub fn wall(mut self, pos: GridPoint, dir: Dir) -> Self {
        self.walls.push((pos, dir));
        self
    }

    /// Give the connection between `pos` and its neighbor in `dir` its own cost
    #[inline(always)]
    #[must_use]
    pub fn cost(mut self, pos: GridPoint, dir: Dir, cost: Cost) -> Self {
        self.costs.push((pos, dir, cost));
        self
    }

    pub fn build(&self) -> Result<TileGraph, BuilderError> {
        let width = self
            .width
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `width`"))?;
        let height = self
            .height
            .ok_or_else(|| BuilderError(Box::new(self.clone()), "missing field `height`"))?;
        if width == 0 || height == 0 {
            return Err(BuilderError(Box::new(self.clone()), "board has no tiles"));
        }

        let step_cost = self.step_cost.unwrap_or(1.);
        if !(step_cost.is_finite() && step_cost >= 0.) {
            return Err(BuilderError(Box::new(self.clone()), "invalid step cost"));
        }

        let mut graph = TileGraph {
            dim: GridPoint::new(width as isize, height as isize),
            step_cost,
            overrides: HashMap::new(),
        };

        for &(pos, dir, cost) in &self.costs {
            if !(cost.is_finite() && cost >= 0.) {
                return Err(BuilderError(Box::new(self.clone()), "invalid connection cost"));
            }
            let key = graph
                .connection(pos, dir)
                .ok_or_else(|| BuilderError(Box::new(self.clone()), "cost outside the board"))?;
            graph.overrides.insert(key, Some(cost));
        }

        for &(pos, dir) in &self.walls {
            let key = graph
                .connection(pos, dir)
                .ok_or_else(|| BuilderError(Box::new(self.clone()), "wall outside the board"))?;
            graph.overrides.insert(key, None);
        }

        Ok(graph)
    }
}

impl TileGraph {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Uniform board without walls
    pub fn uniform(width: usize, height: usize, step_cost: Cost) -> Result<Self, BuilderError> {
        Self::builder()
            .width(width)
            .height(height)
            .step_cost(step_cost)
            .build()
    }

    pub fn dim(&self) -> GridDim {
        self.dim
    }

    pub fn step_cost(&self) -> Cost {
        self.step_cost
    }

    pub fn tile_count(&self) -> usize {
        self.dim.area()
    }

    /// All tiles, bottom row first
    pub fn tiles(&self) -> impl Iterator<Item = GridPoint> {
        let GridPoint { x: width, y: height } = self.dim;
        iproduct!(0..height, 0..width).map(|(y, x)| GridPoint::new(x, y))
    }

    /// Cost of moving from `pos` one tile in `dir`, `None` if there is no
    /// such connection
    pub fn cost(&self, pos: GridPoint, dir: Dir) -> Option<Cost> {
        let key = self.connection(pos, dir)?;
        match self.overrides.get(&key) {
            Some(over) => *over,
            None => Some(self.step_cost),
        }
    }

    pub fn neighbor(&self, pos: GridPoint, dir: Dir) -> Option<GridPoint> {
        self.cost(pos, dir).map(|_| pos.translate(dir, 1))
    }

    // both ends on the board, keyed from the end the connection points up
    // or right from
    fn connection(&self, pos: GridPoint, dir: Dir) -> Option<(GridPoint, Dir)> {
        let other = pos.translate(dir, 1);
        if !self.dim.contains(pos) || !self.dim.contains(other) {
            return None;
        }
        Some(match dir {
            Dir::U | Dir::R => (pos, dir),
            Dir::D | Dir::L => (other, -dir),
        })
    }
}

impl Graph for TileGraph {
    type Node = GridPoint;
    type Label = Dir;

    fn contains(&self, node: GridPoint) -> bool {
        self.dim.contains(node)
    }

    fn neighbors(&self, node: GridPoint) -> Vec<Edge<GridPoint, Dir>> {
        Dir::iter()
            .filter_map(|dir| {
                self.cost(node, dir).map(|cost| Edge {
                    label: dir,
                    to: node.translate(dir, 1),
                    cost,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorType};
    use crate::search::{search, search_with_events, CrossProduct, Manhattan, SearchEvent, Zero};
    use Dir::*;

    fn p(x: isize, y: isize) -> GridPoint {
        GridPoint::new(x, y)
    }

    #[test]
    fn corners_have_two_neighbors() {
        let graph = TileGraph::uniform(3, 3, 1.).unwrap();
        assert_eq!(graph.tile_count(), 9);
        assert_eq!(graph.tiles().count(), 9);
        assert_eq!(graph.neighbors(p(0, 0)).len(), 2);
        assert_eq!(graph.neighbors(p(1, 1)).len(), 4);
        assert_eq!(graph.neighbors(p(2, 1)).len(), 3);
        assert!(!graph.contains(p(3, 0)));
        assert!(!graph.contains(p(0, -1)));
    }

    #[test]
    fn walls_and_costs_apply_both_ways() {
        let graph = TileGraph::builder()
            .width(3)
            .height(3)
            .wall(p(1, 0), R)
            .cost(p(1, 1), U, 4.)
            .build()
            .unwrap();
        assert_eq!(graph.cost(p(1, 0), R), None);
        assert_eq!(graph.cost(p(2, 0), L), None);
        assert_eq!(graph.neighbor(p(2, 0), L), None);
        assert_eq!(graph.cost(p(1, 1), U), Some(4.));
        assert_eq!(graph.cost(p(1, 2), D), Some(4.));
        assert_eq!(graph.cost(p(1, 1), D), Some(1.));
        assert_eq!(graph.neighbor(p(0, 0), U), Some(p(0, 1)));
    }

    #[test]
    fn builder_rejects_bad_boards() {
        assert!(TileGraph::builder().width(3).build().is_err());
        assert!(TileGraph::uniform(0, 3, 1.).is_err());
        assert!(TileGraph::uniform(3, 3, -1.).is_err());
        assert!(TileGraph::builder()
            .width(2)
            .height(2)
            .wall(p(1, 1), R)
            .build()
            .is_err());
        let err = TileGraph::builder()
            .width(2)
            .height(2)
            .cost(p(0, 0), U, -2.)
            .build()
            .unwrap_err();
        assert_eq!(err.1, "invalid connection cost");
        let err = Error::from(err);
        assert!(matches!(err.error_type(), ErrorType::GridBuilderError(_)));
        assert!(err.is_config_error());
    }

    #[test]
    fn corner_to_corner_on_a_3x3_board() {
        let graph = TileGraph::uniform(3, 3, 1.).unwrap();
        let outcome = search(&graph, p(0, 0), p(2, 2), &Manhattan { step_cost: 1. }).unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost, 4.);
        assert_eq!(path.start(), Some(p(0, 0)));
        assert_eq!(path.goal(), Some(p(2, 2)));
        for (a, b) in path.iter().zip(path.iter().skip(1)) {
            assert_eq!(a.manhattan_distance(*b), 1);
        }

        let dijkstra = search(&graph, p(0, 0), p(2, 2), &Zero).unwrap();
        assert_eq!(dijkstra.path().unwrap().cost, 4.);
        assert!(outcome.nodes_expanded() <= dijkstra.nodes_expanded());
    }

    #[test]
    fn wall_forces_a_detour() {
        // cut the bottom row between (1, 0) and (2, 0)
        let graph = TileGraph::builder()
            .width(3)
            .height(3)
            .wall(p(1, 0), R)
            .build()
            .unwrap();
        let start = p(0, 0);
        let goal = p(2, 0);
        let outcome = search(&graph, start, goal, &Manhattan { step_cost: 1. }).unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(path.cost, start.manhattan_distance(goal) as Cost + 2.);
        assert_eq!(path.nodes, [p(0, 0), p(1, 0), p(1, 1), p(2, 1), p(2, 0)]);
    }

    #[test]
    fn uneven_costs_are_respected() {
        // the direct bottom route is expensive, going over the top is cheaper
        let graph = TileGraph::builder()
            .width(3)
            .height(2)
            .cost(p(0, 0), R, 10.)
            .build()
            .unwrap();
        for outcome in [
            search(&graph, p(0, 0), p(2, 0), &Zero).unwrap(),
            search(&graph, p(0, 0), p(2, 0), &Manhattan { step_cost: 1. }).unwrap(),
        ] {
            let path = outcome.path().unwrap();
            assert_eq!(path.cost, 4.);
            assert_eq!(path.nodes[1], p(0, 1));
        }
    }

    #[test]
    fn walled_off_tile_is_not_found() {
        let graph = TileGraph::builder()
            .width(3)
            .height(3)
            .wall(p(2, 2), D)
            .wall(p(2, 2), L)
            .build()
            .unwrap();
        let (outcome, events) = search_with_events(&graph, p(0, 0), p(2, 2), &Zero).unwrap();
        assert!(!outcome.is_found());
        assert_eq!(outcome.nodes_expanded(), 8);
        assert!(!events.iter().any(|e| e.node() == p(2, 2)));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, SearchEvent::NodeSettled(_)))
                .count(),
            8
        );
    }

    #[test]
    fn cross_product_finds_a_path_on_open_ground() {
        let graph = TileGraph::uniform(8, 8, 1.).unwrap();
        let h = CrossProduct::new(1.);
        let outcome = search(&graph, p(0, 0), p(7, 7), &h).unwrap();
        let path = outcome.path().unwrap();
        assert_eq!(path.cost, 14.);
        let manhattan = search(&graph, p(0, 0), p(7, 7), &Manhattan { step_cost: 1. }).unwrap();
        assert!(outcome.nodes_expanded() <= manhattan.nodes_expanded());
    }

    #[test]
    fn searching_off_the_board_is_a_config_error() {
        let graph = TileGraph::uniform(3, 3, 1.).unwrap();
        let err = search(&graph, p(0, 0), p(5, 5), &Zero).unwrap_err();
        assert!(err.is_config_error());
    }
}
