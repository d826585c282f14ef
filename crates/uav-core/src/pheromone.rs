//! Pheromone trails between target pairs.

use crate::geometry::distance;
use crate::models::Point;

/// Symmetric matrix over target pairs holding their static distance and the
/// pheromone level, stored as a flat upper triangle.
#[derive(Debug, Clone)]
pub struct PheromoneMatrix {
    size: usize,
    initial: f64,
    distances: Vec<f64>,
    pheromones: Vec<f64>,
}

impl PheromoneMatrix {
    pub fn new(targets: &[Point], initial: f64) -> Self {
        let size = targets.len();
        let pairs = size * size.saturating_sub(1) / 2;
        let mut distances = Vec::with_capacity(pairs);
        for i in 0..size {
            for j in (i + 1)..size {
                distances.push(distance(&targets[i], &targets[j]));
            }
        }
        Self {
            size,
            initial,
            distances,
            pheromones: vec![initial; pairs],
        }
    }

    /// Number of targets covered by the matrix.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    fn index(&self, i: usize, j: usize) -> Option<usize> {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        (lo != hi && hi < self.size).then(|| lo * self.size - lo * (lo + 1) / 2 + (hi - lo - 1))
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.index(i, j).map_or(0.0, |index| self.distances[index])
    }

    pub fn pheromone(&self, i: usize, j: usize) -> f64 {
        self.index(i, j).map_or(self.initial, |index| self.pheromones[index])
    }

    /// Scale every trail by `1 - rate`.
    pub fn evaporate(&mut self, rate: f64) {
        let keep = 1.0 - rate;
        for level in &mut self.pheromones {
            *level *= keep;
        }
    }

    pub fn deposit(&mut self, i: usize, j: usize, amount: f64) {
        if let Some(index) = self.index(i, j) {
            self.pheromones[index] += amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Point> {
        vec![
            Point::target(0.0, 0.0),
            Point::target(3.0, 4.0),
            Point::target(6.0, 8.0),
            Point::target(0.0, 1.0),
        ]
    }

    #[test]
    fn test_pair_lookup_is_order_independent() {
        let mut matrix = PheromoneMatrix::new(&grid(), 0.5);
        assert_eq!(matrix.len(), 4);
        assert!((matrix.distance(0, 1) - 5.0).abs() < 1e-12);
        assert_eq!(matrix.distance(2, 0), matrix.distance(0, 2));

        matrix.deposit(3, 1, 0.25);
        assert_eq!(matrix.pheromone(1, 3), 0.75);
        assert_eq!(matrix.pheromone(3, 1), 0.75);
        assert_eq!(matrix.pheromone(0, 2), 0.5);
    }

    #[test]
    fn test_every_pair_has_its_own_slot() {
        let mut matrix = PheromoneMatrix::new(&grid(), 0.0);
        let mut amount = 1.0;
        for i in 0..4 {
            for j in (i + 1)..4 {
                matrix.deposit(j, i, amount);
                amount += 1.0;
            }
        }
        let mut seen: Vec<f64> = Vec::new();
        for i in 0..4 {
            for j in (i + 1)..4 {
                seen.push(matrix.pheromone(i, j));
            }
        }
        assert_eq!(seen, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_evaporate_scales_levels() {
        let mut matrix = PheromoneMatrix::new(&grid(), 1.0);
        matrix.deposit(0, 1, 1.0);
        matrix.evaporate(0.25);
        assert!((matrix.pheromone(0, 1) - 1.5).abs() < 1e-12);
        assert!((matrix.pheromone(2, 3) - 0.75).abs() < 1e-12);
    }
}
