use geo::{coord, Rect};

use crate::models::Coordinate;

/// Running bounding rectangle over resolved marker positions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeoBounds {
    rect: Option<Rect<f64>>,
}

impl GeoBounds {
    pub fn extend(&mut self, c: Coordinate) {
        let point = coord! { x: c.lng, y: c.lat };
        self.rect = Some(match self.rect {
            None => Rect::new(point, point),
            Some(r) => Rect::new(
                coord! { x: r.min().x.min(point.x), y: r.min().y.min(point.y) },
                coord! { x: r.max().x.max(point.x), y: r.max().y.max(point.y) },
            ),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    pub fn rect(&self) -> Option<Rect<f64>> {
        self.rect
    }

    pub fn south_west(&self) -> Option<Coordinate> {
        self.rect.map(|r| Coordinate::from(r.min()))
    }

    pub fn north_east(&self) -> Option<Coordinate> {
        self.rect.map(|r| Coordinate::from(r.max()))
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        self.rect.map_or(false, |r| {
            (r.min().x..=r.max().x).contains(&c.lng) && (r.min().y..=r.max().y).contains(&c.lat)
        })
    }
}

impl FromIterator<Coordinate> for GeoBounds {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let mut bounds = GeoBounds::default();
        for c in iter {
            bounds.extend(c);
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds() {
        let bounds = GeoBounds::default();
        assert!(bounds.is_empty());
        assert!(bounds.south_west().is_none());
        assert!(!bounds.contains(Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn test_extend_covers_every_point() {
        let points = [
            Coordinate::new(37.57, 126.98),
            Coordinate::new(37.50, 127.03),
            Coordinate::new(37.58, 126.92),
        ];
        let bounds: GeoBounds = points.iter().copied().collect();

        assert_eq!(bounds.south_west(), Some(Coordinate::new(37.50, 126.92)));
        assert_eq!(bounds.north_east(), Some(Coordinate::new(37.58, 127.03)));
        assert!(points.iter().all(|p| bounds.contains(*p)));
    }

    #[test]
    fn test_single_point_is_degenerate_rect() {
        let mut bounds = GeoBounds::default();
        bounds.extend(Coordinate::new(37.5665, 126.9780));
        assert_eq!(bounds.south_west(), bounds.north_east());
    }
}
