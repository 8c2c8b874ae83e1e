// src/landmarks.rs - Per-frame body landmarks as delivered by the pose model
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::geometry::calculate_angle;

/// MediaPipe pose indices used by the posture logic. The model reports 33 points;
/// only the upper body matters here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEar = 7,
    RightEar = 8,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftHip = 23,
    RightHip = 24,
}

impl BodyLandmark {
    pub fn id(self) -> u32 {
        self as u32
    }
}

/// Raw model output for one point: x/y normalized to the frame, z relative depth
/// (more negative = closer to the camera).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub id: u32,
    pub depth: f64,
    pub x: i32,
    pub y: i32,
}

impl Landmark {
    pub fn new(id: u32, depth: f64, x: i32, y: i32) -> Self {
        Self { id, depth, x, y }
    }

    pub fn point(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Pixel position as a float point for geometry.
    pub fn position(&self) -> Point2<f64> {
        Point2::from([self.x as f64, self.y as f64])
    }
}

/// All landmarks detected in a single frame. Empty when no body was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    /// Keeps the first entry for each identifier; later duplicates are dropped.
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        let mut seen = HashSet::with_capacity(landmarks.len());
        let landmarks = landmarks
            .into_iter()
            .filter(|lm| seen.insert(lm.id))
            .collect();

        Self { landmarks }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Converts model output to pixel space. The slice index is the landmark id.
    pub fn from_normalized(points: &[NormalizedLandmark], width: u32, height: u32) -> Self {
        let landmarks = points
            .iter()
            .enumerate()
            .map(|(id, lm)| {
                Landmark::new(
                    id as u32,
                    lm.z,
                    (lm.x * width as f64) as i32,
                    (lm.y * height as f64) as i32,
                )
            })
            .collect();

        Self { landmarks }
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Landmark> {
        self.landmarks.iter().find(|lm| lm.id == id)
    }

    pub fn get_point(&self, id: u32) -> Option<(i32, i32)> {
        self.get(id).map(Landmark::point)
    }

    pub fn depth_of(&self, id: u32) -> Option<f64> {
        self.get(id).map(|lm| lm.depth)
    }

    pub fn nose_depth(&self) -> Option<f64> {
        self.depth_of(BodyLandmark::Nose.id())
    }

    /// Angle at `b` between `a` and `c`, in degrees. `None` if any point is missing.
    pub fn angle_between(&self, a: u32, b: u32, c: u32) -> Option<f64> {
        let a = self.get(a)?.position();
        let b = self.get(b)?.position();
        let c = self.get(c)?.position();

        Some(calculate_angle(a, b, c))
    }

    /// Diagnostic neck angle: left ear, left shoulder, left hip.
    pub fn neck_angle(&self) -> Option<f64> {
        self.angle_between(
            BodyLandmark::LeftEar.id(),
            BodyLandmark::LeftShoulder.id(),
            BodyLandmark::LeftHip.id(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_body() -> LandmarkSet {
        LandmarkSet::new(vec![
            Landmark::new(0, -0.12, 320, 120),
            Landmark::new(7, -0.05, 300, 110),
            Landmark::new(11, 0.01, 300, 210),
            Landmark::new(23, 0.02, 300, 410),
        ])
    }

    #[test]
    fn test_get_point_found_and_missing() {
        let set = upper_body();
        assert_eq!(set.get_point(0), Some((320, 120)));
        assert_eq!(set.get_point(12), None);
        assert_eq!(LandmarkSet::empty().get_point(0), None);
    }

    #[test]
    fn test_nose_depth_uses_identifier_not_position() {
        let set = LandmarkSet::new(vec![
            Landmark::new(11, 0.3, 10, 10),
            Landmark::new(0, -0.2, 20, 20),
        ]);
        assert_eq!(set.nose_depth(), Some(-0.2));

        let headless = LandmarkSet::new(vec![Landmark::new(11, 0.3, 10, 10)]);
        assert_eq!(headless.nose_depth(), None);
    }

    #[test]
    fn test_duplicate_identifiers_keep_first() {
        let set = LandmarkSet::new(vec![
            Landmark::new(0, -0.1, 1, 1),
            Landmark::new(0, -0.9, 2, 2),
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.nose_depth(), Some(-0.1));
    }

    #[test]
    fn test_from_normalized_scales_to_pixels() {
        let points = [
            NormalizedLandmark { x: 0.5, y: 0.25, z: -0.3 },
            NormalizedLandmark { x: 0.999, y: 0.0, z: 0.1 },
        ];
        let set = LandmarkSet::from_normalized(&points, 640, 480);

        assert_eq!(set.get(0), Some(&Landmark::new(0, -0.3, 320, 120)));
        // truncated, not rounded
        assert_eq!(set.get_point(1), Some((639, 0)));
    }

    #[test]
    fn test_position_converts_pixels_to_point() {
        let lm = Landmark::new(7, -0.05, 300, -12);
        assert_eq!(lm.position(), Point2::new(300.0, -12.0));
    }

    #[test]
    fn test_angle_between_uses_pixel_positions() {
        let set = LandmarkSet::new(vec![
            Landmark::new(1, 0.0, 10, 0),
            Landmark::new(2, 0.0, 0, 0),
            Landmark::new(3, 0.0, 0, 10),
        ]);
        let angle = set.angle_between(1, 2, 3).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
        assert_eq!(set.angle_between(1, 2, 4), None);
    }

    #[test]
    fn test_neck_angle_straight_and_missing() {
        let mut landmarks: Vec<Landmark> = upper_body().iter().copied().collect();
        let angle = LandmarkSet::new(landmarks.clone()).neck_angle().unwrap();
        assert!((angle - 180.0).abs() < 1e-9);

        landmarks.retain(|lm| lm.id != BodyLandmark::LeftHip.id());
        assert_eq!(LandmarkSet::new(landmarks).neck_angle(), None);
    }
}
