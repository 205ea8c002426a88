//! The tick algorithm.
//!
//! One tick visits every cell once, from the last index to the first (bottom
//! row first, right to left).  A cell that has not been resolved yet gains one
//! unit of velocity and may then take that many steps.  Each step asks the
//! cell's material which neighbour it wants to collide with and applies the
//! resulting [`CollisionDesire`].
//!
//! A swap that keeps the particle moving first resolves whatever was swapped
//! into the old position, so chains such as sand sinking through a column of
//! water settle within a single tick.  Particles that are in the middle of
//! such a chain are off-limits to the cells resolved underneath them.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::direction::ExtDirIterator;
use super::material::{CollisionDesire, Material};
use super::particle::Particle;
use super::universe::{Position, Universe};

/// Simulates the behaviour of [`Material`]s in a [`Universe`], one tick at a
/// time.
pub struct Simulation {
    pub universe: Universe<Particle>,
    rng: StdRng,
    /// Indices of particles currently moving in an enclosing step.
    in_flight: Vec<usize>,
}

impl Simulation {
    /// An all-[`Material::Air`] simulation seeded from the OS.
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_rng(width, height, StdRng::from_os_rng())
    }

    /// Same as [`Simulation::new`] but reproducible.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Self {
        Self::from_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn from_rng(width: usize, height: usize, rng: StdRng) -> Self {
        Self {
            universe: Universe::new(width, height),
            rng,
            in_flight: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.universe.width
    }

    pub fn height(&self) -> usize {
        self.universe.height
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self) {
        self.set_all_unhandled();
        for index in (0..self.universe.len()).rev() {
            self.handle_collision(index);
        }
    }

    /// Overwrites the grid from index 0 onwards with `area`.  Cells past the
    /// end of `area` keep their contents.
    pub fn fill(&mut self, area: &[Material]) {
        for (cell, &material) in self.universe.area.iter_mut().zip(area) {
            *cell = Particle::from(material);
        }
    }

    /// Places `material` at `pos`.  The new particle stays put until the next
    /// tick.  Returns `false` when `pos` is outside the grid.
    pub fn set(&mut self, pos: Position, material: Material) -> bool {
        match self.universe.get_mut(pos) {
            Some(cell) => {
                *cell = Particle::settled(material);
                true
            }
            None => false,
        }
    }

    pub fn material_at(&self, pos: Position) -> Option<Material> {
        self.universe.get(pos).map(|p| p.material)
    }

    /// Resets every cell to air.
    pub fn clear(&mut self) {
        self.universe.area.fill(Particle::default());
    }

    /// Number of cells holding `material`.
    pub fn count(&self, material: Material) -> usize {
        self.universe
            .area
            .iter()
            .filter(|p| p.material == material)
            .count()
    }

    pub fn set_all_unhandled(&mut self) {
        for cell in &mut self.universe.area {
            cell.handled = false;
        }
    }

    fn handle_collision(&mut self, index: usize) {
        let cell = &mut self.universe.area[index];
        if cell.handled {
            return;
        }

        cell.velocity = cell.velocity.saturating_add(1);
        let steps = cell.velocity.unsigned_abs();
        self.step(index, steps);
    }

    /// Moves the particle at `index` for up to `steps_remaining` steps.
    fn step(&mut self, index: usize, steps_remaining: u16) {
        if steps_remaining == 0 {
            // Used every step without stopping: free fall.
            self.universe.area[index].handled = true;
            return;
        }

        let material = self.universe.area[index].material;
        let dirs = ExtDirIterator::new(material.directions(), &mut self.rng);

        for dir in dirs {
            let Some(neighbor) = self.universe.neighbor_index(index, dir) else {
                continue;
            };
            if self.in_flight.contains(&neighbor) {
                continue;
            }

            let other = self.universe.area[neighbor].material;
            match material.collide(other, dir, &mut self.rng) {
                CollisionDesire::Evade => {}
                CollisionDesire::SwapAndMove => {
                    self.universe.swap(index, neighbor);

                    self.in_flight.push(neighbor);
                    self.handle_collision(index);
                    self.in_flight.pop();

                    return self.step(neighbor, steps_remaining - 1);
                }
                CollisionDesire::SwapAndStop => {
                    let cell = &mut self.universe.area[index];
                    cell.velocity = 0;
                    cell.handled = true;
                    self.universe.swap(index, neighbor);
                    return;
                }
                CollisionDesire::Convert(into) => {
                    self.universe.area[neighbor] = Particle::settled(into);
                    break;
                }
                CollisionDesire::Consume(leftover) => {
                    self.universe.area[neighbor] = Particle::from(leftover);
                    self.universe.swap(index, neighbor);
                    break;
                }
                CollisionDesire::GetConverted(into) => {
                    self.universe.area[index] = Particle::settled(into);
                    break;
                }
                CollisionDesire::Eradicate(own, theirs) => {
                    self.universe.area[index] = Particle::settled(own);
                    self.universe.area[neighbor] = Particle::settled(theirs);
                    break;
                }
            }
        }

        // No neighbour let the particle through, or it reacted in place.
        let cell = &mut self.universe.area[index];
        cell.velocity = 0;
        cell.handled = true;
    }
}
