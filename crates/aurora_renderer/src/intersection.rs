/// Nearest hit of a ray against a scene.
///
/// Scene queries return `Option<Intersection>`; `None` is the no-hit result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit
    pub distance: f32,
    /// Index of the hit triangle in the scene
    pub index: usize,
}

impl Intersection {
    pub fn new(distance: f32, index: usize) -> Self {
        Self { distance, index }
    }
}
