//! The material set and the collision rules between materials.
//!
//! Every rule is written from the point of view of the moving cell ("self")
//! looking at one neighbour.  The outcome is a [`CollisionDesire`] that the
//! simulation applies to the pair.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::direction::Direction::{Down, Left, LeftDown, LeftUp, Right, RightDown, RightUp, Up};
use super::direction::ExtDirection::{One, Random};
use super::direction::{Direction, ExtDirection};
use super::RendererError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    Sand,
    SandGenerator,
    Water,
    WaterGenerator,
    #[default]
    Air,
    Fire,
    Smoke,
    Vapor,
    Wood,
}

const SAND_DIRS: &[ExtDirection] = &[One(Down), Random(RightDown, LeftDown)];
const GENERATOR_DIRS: &[ExtDirection] = &[One(Down)];
const WATER_DIRS: &[ExtDirection] = &[
    One(Down),
    Random(RightDown, LeftDown),
    Random(Right, Left),
];
const FIRE_DIRS: &[ExtDirection] = &[
    One(Down),
    Random(RightDown, LeftDown),
    Random(Right, Left),
    One(Up),
    Random(RightUp, LeftUp),
];
const GAS_DIRS: &[ExtDirection] = &[One(Up), Random(RightUp, LeftUp), Random(Right, Left)];

impl Material {
    /// Every material, in selector order.
    pub const ALL: &[Material] = &[
        Material::Sand,
        Material::Water,
        Material::Fire,
        Material::Smoke,
        Material::Vapor,
        Material::Wood,
        Material::SandGenerator,
        Material::WaterGenerator,
        Material::Air,
    ];

    /// Name used by `add_material` and the config file.
    pub fn name(self) -> &'static str {
        match self {
            Material::Sand => "sand",
            Material::SandGenerator => "sand_generator",
            Material::Water => "water",
            Material::WaterGenerator => "water_generator",
            Material::Air => "air",
            Material::Fire => "fire",
            Material::Smoke => "smoke",
            Material::Vapor => "vapor",
            Material::Wood => "wood",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Material::Sand => "Sand",
            Material::SandGenerator => "Sand Source",
            Material::Water => "Water",
            Material::WaterGenerator => "Water Source",
            Material::Air => "Eraser",
            Material::Fire => "Fire",
            Material::Smoke => "Smoke",
            Material::Vapor => "Vapor",
            Material::Wood => "Wood",
        }
    }

    /// Neighbours to try, in order of preference.
    pub fn directions(self) -> &'static [ExtDirection] {
        match self {
            Material::Sand => SAND_DIRS,
            Material::SandGenerator | Material::WaterGenerator => GENERATOR_DIRS,
            Material::Water => WATER_DIRS,
            Material::Fire => FIRE_DIRS,
            Material::Smoke | Material::Vapor => GAS_DIRS,
            Material::Air | Material::Wood => &[],
        }
    }

    /// Returns the [`CollisionDesire`] for meeting `other` in direction `dir`.
    pub fn collide<R: Rng>(self, other: Material, dir: Direction, rng: &mut R) -> CollisionDesire {
        use CollisionDesire::*;
        use Material::*;

        match (self, other) {
            (Sand, Water) => pick(rng, SwapAndStop, Evade),
            (Sand, Air) => SwapAndMove,

            (SandGenerator, Air) => pick(rng, Convert(Sand), Evade),
            (WaterGenerator, Air) => pick(rng, Convert(Water), Evade),

            (Water, Air | Vapor | Smoke) => pick(rng, SwapAndMove, Evade),
            (Water, Fire) => Eradicate(Vapor, Smoke),

            (Fire, Air | Smoke | Vapor) if dir.is_downward() => pick(rng, SwapAndStop, Evade),
            (Fire, Water) => pick(rng, Consume(Vapor), Eradicate(Smoke, Vapor)),
            (Fire, Wood) => match rng.random_range(0..3) {
                0 => Consume(Smoke),
                1 => Consume(Fire),
                _ => Evade,
            },

            (Smoke, Air) => pick(rng, SwapAndStop, Evade),
            (Smoke, Vapor) => pick(rng, SwapAndStop, Eradicate(Water, Air)),

            (Vapor, Air) => pick(rng, SwapAndStop, Evade),
            (Vapor, Smoke) => pick(rng, SwapAndStop, Eradicate(Air, Water)),

            // Air and Wood never act on their own.
            _ => Evade,
        }
    }
}

fn pick<R: Rng>(rng: &mut R, a: CollisionDesire, b: CollisionDesire) -> CollisionDesire {
    if rng.random::<bool>() {
        a
    } else {
        b
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Material {
    type Err = RendererError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace('-', "_");
        Material::ALL
            .iter()
            .copied()
            .find(|m| m.name() == normalised)
            .ok_or_else(|| RendererError::UnknownMaterial(s.to_string()))
    }
}

/// Outcome of a collision between a cell `A` and its neighbour `B`.
///
/// ```text
/// [A, B] -> [A, B]  Evade         e.g. [Sand, Wood]
/// [A, B] -> [B, A]  Swap          e.g. [Sand, Water]
/// [A, B] -> [A, C]  Convert       e.g. [SandGenerator, Air] -> [SandGenerator, Sand]
/// [A, B] -> [C, A]  Consume       e.g. [Fire, Wood] -> [Smoke, Fire]
/// [A, B] -> [C, B]  GetConverted
/// [A, B] -> [C, D]  Eradicate     e.g. [Water, Fire] -> [Vapor, Smoke]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionDesire {
    Evade,
    /// Swap and keep moving from the new position.
    SwapAndMove,
    /// Swap and come to rest.
    SwapAndStop,
    Convert(Material),
    Consume(Material),
    GetConverted(Material),
    Eradicate(Material, Material),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use CollisionDesire::*;

    fn outcomes(a: Material, b: Material, dir: Direction) -> Vec<CollisionDesire> {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let d = a.collide(b, dir, &mut rng);
            if !seen.contains(&d) {
                seen.push(d);
            }
        }
        seen
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for &m in Material::ALL {
            assert_eq!(m.name().parse::<Material>().unwrap(), m);
        }
        assert_eq!("Sand-Generator".parse::<Material>().unwrap(), Material::SandGenerator);
        assert!(matches!(
            "lava".parse::<Material>(),
            Err(RendererError::UnknownMaterial(name)) if name == "lava"
        ));
    }

    #[test]
    fn sand_falls_through_air_and_sinks_in_water() {
        assert_eq!(outcomes(Material::Sand, Material::Air, Down), vec![SwapAndMove]);
        let mut water = outcomes(Material::Sand, Material::Water, Down);
        water.sort_by_key(|d| format!("{d:?}"));
        assert_eq!(water, vec![Evade, SwapAndStop]);
        assert_eq!(outcomes(Material::Sand, Material::Wood, Down), vec![Evade]);
    }

    #[test]
    fn fire_only_sinks_through_gases_downwards() {
        assert_eq!(outcomes(Material::Fire, Material::Air, Up), vec![Evade]);
        assert!(outcomes(Material::Fire, Material::Air, LeftDown).contains(&SwapAndStop));
    }

    #[test]
    fn fire_burns_wood() {
        let seen = outcomes(Material::Fire, Material::Wood, Down);
        assert!(seen.contains(&Consume(Material::Smoke)));
        assert!(seen.contains(&Consume(Material::Fire)));
        assert!(seen.contains(&Evade));
    }

    #[test]
    fn water_quenches_fire() {
        assert_eq!(
            outcomes(Material::Water, Material::Fire, Down),
            vec![Eradicate(Material::Vapor, Material::Smoke)]
        );
    }

    #[test]
    fn inert_materials_never_act() {
        for &other in Material::ALL {
            assert_eq!(outcomes(Material::Air, other, Down), vec![Evade]);
            assert_eq!(outcomes(Material::Wood, other, Down), vec![Evade]);
        }
        assert!(Material::Wood.directions().is_empty());
        assert!(Material::Air.directions().is_empty());
    }
}
