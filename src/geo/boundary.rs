use super::coord::Coord;

/// Axis-aligned bounding rectangle in (lat, long) space. Membership is
/// inclusive on all four sides. Does not handle boxes crossing the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub sw: Coord,
    pub ne: Coord,
}

impl BoundingBox {
    pub fn new(sw: Coord, ne: Coord) -> Self {
        Self { sw, ne }
    }

    /// Smallest box covering every coordinate in the iterator.
    /// None if the iterator is empty.
    pub fn hull(coords: impl Iterator<Item = Coord>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for c in coords {
            bounds = Some(match bounds {
                None => Self::new(c, c),
                Some(b) => Self::new(
                    Coord::new(b.sw.lat.min(c.lat), b.sw.long.min(c.long)),
                    Coord::new(b.ne.lat.max(c.lat), b.ne.long.max(c.long)),
                ),
            });
        }
        bounds
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.lat >= self.sw.lat && c.lat <= self.ne.lat && c.long >= self.sw.long && c.long <= self.ne.long
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.sw, self.ne)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_of_three_points() {
        let b = BoundingBox::hull(
            [
                Coord::new(40., -74.),
                Coord::new(41., -75.),
                Coord::new(39., -73.),
            ]
            .into_iter(),
        )
        .unwrap();
        assert_eq!(b.sw, Coord::new(39., -75.));
        assert_eq!(b.ne, Coord::new(41., -73.));
        assert!(b.contains(Coord::new(40.5, -74.5)));
        assert!(!b.contains(Coord::new(42., -72.)));
    }

    #[test]
    fn edges_are_inclusive() {
        let b = BoundingBox::new(Coord::new(0., 0.), Coord::new(1., 1.));
        assert!(b.contains(Coord::new(0., 0.)));
        assert!(b.contains(Coord::new(1., 1.)));
        assert!(b.contains(Coord::new(0., 1.)));
        assert!(!b.contains(Coord::new(1.000001, 0.5)));
    }
}
