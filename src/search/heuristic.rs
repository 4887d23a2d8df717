use super::Cost;
use crate::basic::GridPoint;

/// How far a heuristic can be trusted
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Admissibility {
    /// Never overestimates and obeys the triangle inequality across every
    /// edge, a settled record is never reopened
    Consistent,
    /// Never overestimates, results are optimal but records may be reopened
    Admissible,
    /// No guarantee, results may be suboptimal
    Unknown,
}

impl Admissibility {
    pub fn is_admissible(self) -> bool {
        !matches!(self, Admissibility::Unknown)
    }
}

/// Estimate of the remaining cost from `node` to `goal`.
///
/// Must be pure: the engine calls it at most once per discovered node and
/// reuses the value when the node's record is updated or reopened. Values
/// must be finite and non-negative, anything else aborts the search with a
/// configuration error.
pub trait Heuristic<N> {
    fn estimate(&self, start: &N, node: &N, goal: &N) -> Cost;

    fn admissibility(&self) -> Admissibility {
        Admissibility::Unknown
    }
}

impl<N, F> Heuristic<N> for F
where
    F: Fn(&N, &N, &N) -> Cost,
{
    fn estimate(&self, start: &N, node: &N, goal: &N) -> Cost {
        self(start, node, goal)
    }
}

/// Always 0, turns the search into Dijkstra's algorithm
#[derive(Copy, Clone, Debug, Default)]
pub struct Zero;

impl<N> Heuristic<N> for Zero {
    fn estimate(&self, _: &N, _: &N, _: &N) -> Cost {
        0.
    }

    fn admissibility(&self) -> Admissibility {
        Admissibility::Consistent
    }
}

/// Grid distance times the cheapest step cost.
///
/// Consistent on 4-connected grids as long as no edge is cheaper than
/// `step_cost`.
#[derive(Copy, Clone, Debug)]
pub struct Manhattan {
    pub step_cost: Cost,
}

impl Heuristic<GridPoint> for Manhattan {
    fn estimate(&self, _: &GridPoint, node: &GridPoint, goal: &GridPoint) -> Cost {
        node.manhattan_distance(*goal) as Cost * self.step_cost
    }

    fn admissibility(&self) -> Admissibility {
        Admissibility::Consistent
    }
}

/// Manhattan distance nudged towards the straight line from start to goal.
///
/// The cross product of (node - goal) and (start - goal) is 0 on that line
/// and grows with the distance from it, so among equally short routes the
/// ones hugging the line are expanded first. The nudge can push an estimate
/// slightly above the true cost, so this is not admissible.
#[derive(Copy, Clone, Debug)]
pub struct CrossProduct {
    pub step_cost: Cost,
    pub weight: Cost,
}

impl CrossProduct {
    pub const DEFAULT_WEIGHT: Cost = 0.001;

    pub fn new(step_cost: Cost) -> Self {
        Self {
            step_cost,
            weight: Self::DEFAULT_WEIGHT,
        }
    }
}

impl Heuristic<GridPoint> for CrossProduct {
    fn estimate(&self, start: &GridPoint, node: &GridPoint, goal: &GridPoint) -> Cost {
        let (dx1, dy1) = (node.x - goal.x, node.y - goal.y);
        let (dx2, dy2) = (start.x - goal.x, start.y - goal.y);
        let cross = (dx1 * dy2 - dx2 * dy1).unsigned_abs() as Cost;
        node.manhattan_distance(*goal) as Cost * self.step_cost + cross * self.weight
    }
}
