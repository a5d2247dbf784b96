//! Closed-loop track geometry, scale, and progress queries.
//!
//! A track is an ordered closed polyline (the last point connects back to the
//! first) together with a drivable-surface classifier. Progress around the
//! track is measured as arc length along the polyline from the start position
//! to the orthogonal projection of a query point onto its nearest segment.

use ndarray::Array1;

use super::error::GeometryError;
use super::geometry;
use super::surface::Surface;

/// Epsilon for matching path vertices by coordinate.
const EPSILON: f32 = 1e-6;

/// Velocity decrease applied to every car each frame.
const DEFAULT_FRICTION: f32 = 0.02;

/// A closed track that cars drive around.
///
/// Immutable after construction except for [`Track::set_scale`] and
/// [`Track::set_friction`].
pub struct Track {
    /// Ordered 2D vertices of the closed path.
    path_points: Vec<Array1<f32>>,
    /// First path point; cars start here.
    start_position: Array1<f32>,
    /// Perimeter length of the closed polyline.
    length: f32,
    /// Display/physics scale applied to distances and velocities.
    scale: f32,
    /// Per-frame velocity decrease for cars on this track.
    friction: f32,
    /// Classifier deciding which coordinates are legal to drive on.
    surface: Box<dyn Surface>,
}

impl Track {
    /// Constructs a track from path points and a surface classifier.
    ///
    /// The path is treated as a closed loop: the last point connects back to
    /// the first. The perimeter length is computed once here.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPathPoints`] for fewer than two points
    /// and [`GeometryError::DegenerateSegment`] for consecutive duplicate
    /// points (including last-to-first), which would break progress
    /// projection later.
    pub fn new(
        path_points: Vec<Array1<f32>>,
        surface: Box<dyn Surface>,
    ) -> Result<Self, GeometryError> {
        if path_points.len() < 2 {
            return Err(GeometryError::TooFewPathPoints {
                count: path_points.len(),
            });
        }

        for i in 0..path_points.len() {
            let next = (i + 1) % path_points.len();
            if geometry::square_dist(&path_points[i], &path_points[next]) < EPSILON {
                return Err(GeometryError::DegenerateSegment { index: i });
            }
        }

        let start_position = path_points[0].clone();
        let mut length = 0.0;
        let mut previous = &start_position;
        for point in &path_points {
            length += geometry::dist(previous, point);
            previous = point;
        }
        length += geometry::dist(&start_position, &path_points[path_points.len() - 1]);

        Ok(Self {
            path_points,
            start_position,
            length,
            scale: 1.0,
            friction: DEFAULT_FRICTION,
            surface,
        })
    }

    /// Returns the track's start position (first path point).
    pub fn start_position(&self) -> &Array1<f32> {
        &self.start_position
    }

    /// Returns the perimeter length of the closed path.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Returns the track's display/physics scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sets the track scale. Non-positive values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale = scale;
        }
    }

    /// Returns the per-frame friction applied to car velocities.
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Sets the per-frame friction. Negative values are ignored.
    pub fn set_friction(&mut self, friction: f32) {
        if friction >= 0.0 {
            self.friction = friction;
        }
    }

    /// Returns the ordered path vertices.
    pub fn path_points(&self) -> &[Array1<f32>] {
        &self.path_points
    }

    /// Returns `true` if the given coordinate is legal for a car to be on.
    ///
    /// Coordinates outside the classifier's domain always return `false`.
    pub fn is_on_surface(&self, x: f32, y: f32) -> bool {
        self.surface.is_drivable(x, y)
    }

    /// Calculates cumulative arc length from the start position to the
    /// projection of `position` onto the path.
    ///
    /// The projection is onto the infinite line through the nearest segment,
    /// deliberately unclamped: near sharp corners the result can fall outside
    /// the segment bounds, and the lap-wraparound accounting downstream is
    /// tuned against that behavior.
    pub fn distance_along_path(&self, position: &Array1<f32>) -> f32 {
        let (segment_start, segment_end) = self.closest_segment(position);
        let projection = project_onto_line(&segment_start, &segment_end, position);

        let mut distance = 0.0;
        let mut previous = &self.start_position;
        for point in &self.path_points {
            distance += geometry::dist(point, previous);
            previous = point;

            if (point[0] - segment_start[0]).abs() < EPSILON
                && (point[1] - segment_start[1]).abs() < EPSILON
            {
                distance += geometry::dist(&projection, point);
                return distance;
            }
        }
        0.0
    }

    /// Finds the path segment nearest to `position`, preserving traversal
    /// order: the returned pair is (earlier vertex, later vertex).
    ///
    /// The nearest vertex is found by linear scan over squared distances
    /// (ties broken by first occurrence); whichever of its two loop neighbors
    /// lies closer to `position` completes the segment. A two-point loop is
    /// its own segment.
    fn closest_segment(&self, position: &Array1<f32>) -> (Array1<f32>, Array1<f32>) {
        let points = &self.path_points;
        if points.len() <= 2 {
            return (points[0].clone(), points[1].clone());
        }

        let mut index_of_nearest = 0;
        let mut smallest_dist = geometry::square_dist(position, &points[0]);
        for (i, point) in points.iter().enumerate().skip(1) {
            let d = geometry::square_dist(position, point);
            if d < smallest_dist {
                smallest_dist = d;
                index_of_nearest = i;
            }
        }

        let next = (index_of_nearest + 1) % points.len();
        let prev = (index_of_nearest + points.len() - 1) % points.len();

        if geometry::square_dist(position, &points[prev])
            < geometry::square_dist(position, &points[next])
        {
            (points[prev].clone(), points[index_of_nearest].clone())
        } else {
            (points[index_of_nearest].clone(), points[next].clone())
        }
    }
}

/// Orthogonally projects `point` onto the infinite line through `a` and `b`.
///
/// Uses the scalar projection `t = dot(point - a, b - a) / |b - a|^2` with no
/// clamping of `t` to the segment.
fn project_onto_line(a: &Array1<f32>, b: &Array1<f32>, point: &Array1<f32>) -> Array1<f32> {
    let path_vector = b - a;
    let position_vector = point - a;

    let t = (path_vector[0] * position_vector[0] + path_vector[1] * position_vector[1])
        / (path_vector[0] * path_vector[0] + path_vector[1] * path_vector[1]);

    a + &(path_vector * t)
}

/// Parses path points from the expected on-disk textual format:
/// whitespace-separated pairs of numbers, one point per pair, first point
/// being the start position.
///
/// # Errors
///
/// Returns [`GeometryError::MalformedPathData`] for unparseable tokens or an
/// odd number of tokens.
pub fn parse_path_points(text: &str) -> Result<Vec<Array1<f32>>, GeometryError> {
    let mut values = Vec::new();
    for (i, token) in text.split_whitespace().enumerate() {
        let value: f32 = token
            .parse()
            .map_err(|_| GeometryError::MalformedPathData {
                token: i,
                reason: format!("expected a number, got {token:?}"),
            })?;
        values.push(value);
    }

    if values.len() % 2 != 0 {
        return Err(GeometryError::MalformedPathData {
            token: values.len() - 1,
            reason: "odd number of coordinates, points come in pairs".to_string(),
        });
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| Array1::from_vec(vec![pair[0], pair[1]]))
        .collect())
}
