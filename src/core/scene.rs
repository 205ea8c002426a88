//! Named starting layouts.

use std::fmt;

use clap::ValueEnum;

use super::material::Material;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scene {
    /// A sand source above a lake filling the lower half.
    #[default]
    Lake,
    /// A sand source and a water source on the top row.
    Generators,
    /// A spark of fire dropping onto a wooden floor.
    Bonfire,
    /// Nothing but air.
    Empty,
}

impl Scene {
    /// Row-major material layout for a `width` × `height` grid.
    pub fn layout(self, width: usize, height: usize) -> Vec<Material> {
        let mut area = vec![Material::Air; width * height];
        if area.is_empty() {
            return area;
        }

        match self {
            Scene::Lake => {
                for cell in &mut area[width * (height / 2)..] {
                    *cell = Material::Water;
                }
                // Placed after the water so one-row grids still get a source.
                area[width / 2] = Material::SandGenerator;
            }
            Scene::Generators => {
                area[width / 3] = Material::SandGenerator;
                area[width / 2] = Material::WaterGenerator;
            }
            Scene::Bonfire => {
                let floor = width * (height - 1);
                for cell in &mut area[floor..] {
                    *cell = Material::Wood;
                }
                area[width / 2] = Material::Fire;
            }
            Scene::Empty => {}
        }

        area
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scene::Lake => "lake",
            Scene::Generators => "generators",
            Scene::Bonfire => "bonfire",
            Scene::Empty => "empty",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lake_fills_the_lower_half_with_water() {
        let area = Scene::Lake.layout(4, 4);
        assert_eq!(area[2], Material::SandGenerator);
        assert!(area[8..].iter().all(|&m| m == Material::Water));
        assert_eq!(area.iter().filter(|&&m| m == Material::Water).count(), 8);
    }

    #[test]
    fn bonfire_has_a_wooden_floor() {
        let area = Scene::Bonfire.layout(5, 3);
        assert_eq!(area[2], Material::Fire);
        assert!(area[10..].iter().all(|&m| m == Material::Wood));
    }

    #[test]
    fn generators_sit_on_the_top_row() {
        let area = Scene::Generators.layout(9, 2);
        assert_eq!(area[3], Material::SandGenerator);
        assert_eq!(area[4], Material::WaterGenerator);
    }

    #[test]
    fn empty_grids_are_tolerated() {
        assert!(Scene::Lake.layout(0, 5).is_empty());
        assert!(Scene::Empty.layout(3, 3).iter().all(|&m| m == Material::Air));
    }
}
