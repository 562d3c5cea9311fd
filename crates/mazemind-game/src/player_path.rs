//! Waypoint visitation tracking for path challenges

use glam::Vec3;

/// A fixed list of waypoints and the order in which the player reached them.
///
/// Waypoints are identified by value: traversing a point marks every entry
/// equal to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPath {
    points: Vec<Vec3>,
    /// Traversal index per waypoint, `None` until visited
    order: Vec<Option<usize>>,
    traversed: usize,
}

impl PlayerPath {
    /// A path with every waypoint unvisited
    pub fn new(points: Vec<Vec3>) -> Self {
        let order = vec![None; points.len()];
        Self {
            points,
            order,
            traversed: 0,
        }
    }

    /// A path already walked in list order
    pub fn completed(points: Vec<Vec3>) -> Self {
        let order = (0..points.len()).map(Some).collect();
        let traversed = points.len();
        Self {
            points,
            order,
            traversed,
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Traversal index of the waypoint at `index`
    pub fn order_of(&self, index: usize) -> Option<usize> {
        self.order.get(index).copied().flatten()
    }

    pub fn traversed_count(&self) -> usize {
        self.traversed
    }

    /// Waypoints not reached yet, with their list index
    pub fn unvisited(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter(|(i, _)| self.order[*i].is_none())
            .map(|(i, p)| (i, *p))
    }

    /// Record that the player reached `point`. No-op once every waypoint has
    /// been counted or when `point` is not on the path.
    pub fn traverse_point(&mut self, point: Vec3) {
        if self.traversed >= self.points.len() {
            return;
        }
        let mut matched = false;
        for (i, p) in self.points.iter().enumerate() {
            if *p == point {
                self.order[i] = Some(self.traversed);
                matched = true;
            }
        }
        if matched {
            self.traversed += 1;
        }
    }

    pub fn all_traversed(&self) -> bool {
        self.order.iter().all(Option::is_some)
    }

    /// Every waypoint visited, and the i-th one visited i-th
    pub fn in_correct_order(&self) -> bool {
        self.order.iter().enumerate().all(|(i, o)| *o == Some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<Vec3> {
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)]
    }

    #[test]
    fn test_in_order() {
        let pts = abc();
        let mut path = PlayerPath::new(pts.clone());
        for p in &pts {
            path.traverse_point(*p);
        }
        assert!(path.all_traversed());
        assert!(path.in_correct_order());
    }

    #[test]
    fn test_out_of_order() {
        let pts = abc();
        let mut path = PlayerPath::new(pts.clone());
        path.traverse_point(pts[1]);
        path.traverse_point(pts[0]);
        path.traverse_point(pts[2]);
        assert!(path.all_traversed());
        assert!(!path.in_correct_order());
        assert_eq!(path.order_of(1), Some(0));
    }

    #[test]
    fn test_partial() {
        let pts = abc();
        let mut path = PlayerPath::new(pts.clone());
        path.traverse_point(pts[0]);
        path.traverse_point(pts[1]);
        assert!(!path.all_traversed());
        assert!(!path.in_correct_order());
        assert_eq!(path.unvisited().map(|(i, _)| i).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_completed_constructor() {
        let path = PlayerPath::completed(abc());
        assert!(path.all_traversed());
        assert!(path.in_correct_order());
        assert_eq!(path.traversed_count(), 3);
    }

    #[test]
    fn test_unknown_point_and_full_path_are_ignored() {
        let pts = abc();
        let mut path = PlayerPath::new(pts.clone());
        path.traverse_point(Vec3::splat(9.0));
        assert_eq!(path.traversed_count(), 0);

        for p in &pts {
            path.traverse_point(*p);
        }
        // Revisiting after completion does not rewrite the order
        path.traverse_point(pts[0]);
        assert!(path.in_correct_order());
    }

    #[test]
    fn test_empty_path() {
        let path = PlayerPath::new(Vec::new());
        assert!(path.all_traversed());
        assert!(path.in_correct_order());
    }
}
