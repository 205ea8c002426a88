use super::material::Material;

/// Speed at which a particle moves through the grid.  Grows by one every tick
/// the particle keeps falling, which is how gravity accelerates it.
pub type Velocity = i16;

/// The contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Particle {
    pub material: Material,
    pub velocity: Velocity,
    /// Whether the cell was already resolved during the current tick.
    pub handled: bool,
}

impl Particle {
    pub fn new(material: Material, handled: bool, velocity: Velocity) -> Self {
        Self {
            material,
            velocity,
            handled,
        }
    }

    /// A resting particle that is skipped for the rest of the current tick.
    pub fn settled(material: Material) -> Self {
        Self::new(material, true, 0)
    }
}

impl From<Material> for Particle {
    fn from(material: Material) -> Self {
        Self::new(material, false, 0)
    }
}
