use glam::Vec2;

pub fn euclidean(start: Vec2, end: Vec2) -> f32 {
    (end - start).length()
}
