//! The renderer contract driven by the front-end.
//!
//! A [`Renderer`] owns a [`Simulation`] and exposes the four operations the
//! frame loop needs: create, tick, read the RGBA pixel buffer, and inject a
//! material at a grid coordinate.  The pixel buffer is kept in step with the
//! grid: a tick repaints it whole, an injection repaints one pixel.

use std::path::Path;

use super::material::Material;
use super::scene::Scene;
use super::simulation::Simulation;
use super::universe::Position;
use super::RendererError;

pub const AIR_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0x00];
pub const WATER_COLOR: [u8; 4] = [0x00, 0x00, 0xff, 0xff];
pub const SAND_COLOR: [u8; 4] = [0xff, 0xff, 0x00, 0xff];
pub const WATER_GENERATOR_COLOR: [u8; 4] = [0x00, 0xff, 0xff, 0xff];
pub const SAND_GENERATOR_COLOR: [u8; 4] = [0xff, 0x00, 0xff, 0xff];
pub const FIRE_COLOR: [u8; 4] = [0xff, 0x00, 0x00, 0xff];
pub const SMOKE_COLOR: [u8; 4] = [0x7f, 0x7f, 0x7f, 0xff];
pub const VAPOR_COLOR: [u8; 4] = [0x7f, 0x7f, 0xff, 0xff];
pub const WOOD_COLOR: [u8; 4] = [0xde, 0xb8, 0x87, 0xff];

/// RGBA colour of a material in the pixel buffer.
pub fn color(material: Material) -> [u8; 4] {
    match material {
        Material::Sand => SAND_COLOR,
        Material::SandGenerator => SAND_GENERATOR_COLOR,
        Material::Water => WATER_COLOR,
        Material::WaterGenerator => WATER_GENERATOR_COLOR,
        Material::Air => AIR_COLOR,
        Material::Fire => FIRE_COLOR,
        Material::Smoke => SMOKE_COLOR,
        Material::Vapor => VAPOR_COLOR,
        Material::Wood => WOOD_COLOR,
    }
}

/// Character used for a material by [`Renderer::to_text`].
pub fn glyph(material: Material) -> char {
    match material {
        Material::Sand => '■',
        Material::SandGenerator => 'S',
        Material::Air => ' ',
        Material::Water => '◉',
        Material::WaterGenerator => 'W',
        Material::Fire => 'f',
        Material::Smoke => '~',
        Material::Vapor => '|',
        Material::Wood => '=',
    }
}

pub struct Renderer {
    sim: Simulation,
    pixels: Vec<u8>,
    ticks: u64,
}

impl Renderer {
    /// Creates a renderer over the default [`Scene`].
    pub fn create(width: usize, height: usize) -> Result<Self, RendererError> {
        Self::with_scene(width, height, Scene::default(), None)
    }

    /// Creates a renderer whose grid starts out as `scene`.  A `seed` makes
    /// the run reproducible.
    pub fn with_scene(
        width: usize,
        height: usize,
        scene: Scene,
        seed: Option<u64>,
    ) -> Result<Self, RendererError> {
        if width == 0 || height == 0 {
            return Err(RendererError::EmptyGrid { width, height });
        }

        let mut sim = match seed {
            Some(seed) => Simulation::with_seed(width, height, seed),
            None => Simulation::new(width, height),
        };
        sim.fill(&scene.layout(width, height));
        tracing::debug!(width, height, %scene, ?seed, "renderer created");

        let mut renderer = Self {
            sim,
            pixels: vec![0; width * height * 4],
            ticks: 0,
        };
        renderer.repaint();
        Ok(renderer)
    }

    pub fn width(&self) -> usize {
        self.sim.width()
    }

    pub fn height(&self) -> usize {
        self.sim.height()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self) {
        self.sim.tick();
        self.ticks += 1;
        self.repaint();
    }

    /// RGBA pixels, `width * height * 4` bytes, row-major from the top row.
    pub fn get_data(&self) -> &[u8] {
        &self.pixels
    }

    fn repaint(&mut self) {
        for (cell, pixel) in self
            .sim
            .universe
            .area
            .iter()
            .zip(self.pixels.chunks_exact_mut(4))
        {
            pixel.copy_from_slice(&color(cell.material));
        }
    }

    /// Injects one unit of the material called `name` at (`x`, `y`).
    pub fn add_material(&mut self, name: &str, x: isize, y: isize) -> Result<(), RendererError> {
        let material: Material = name.parse()?;
        let (width, height) = (self.width(), self.height());
        let out_of_bounds = || RendererError::OutOfBounds {
            x,
            y,
            width,
            height,
        };

        let pos = match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => Position::new(x, y),
            _ => return Err(out_of_bounds()),
        };
        if !self.sim.set(pos, material) {
            return Err(out_of_bounds());
        }

        let i = self.sim.universe.pos_to_i(pos) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color(material));
        Ok(())
    }

    /// Resets the whole grid to air.
    pub fn clear(&mut self) {
        self.sim.clear();
        self.repaint();
    }

    /// The grid as text, one character per cell and one line per row.
    pub fn to_text(&self) -> String {
        self.sim
            .universe
            .rows()
            .map(|row| row.iter().map(|p| glyph(p.material)).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Writes the current pixel buffer to `path` as a PNG.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), RendererError> {
        let (width, height) = (self.width() as u32, self.height() as u32);
        image::save_buffer_with_format(
            path,
            self.get_data(),
            width,
            height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|source| RendererError::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_grids_are_rejected() {
        assert!(matches!(
            Renderer::create(0, 10),
            Err(RendererError::EmptyGrid { width: 0, height: 10 })
        ));
    }

    #[test]
    fn pixel_buffer_covers_the_grid() {
        let r = Renderer::with_scene(6, 4, Scene::Empty, Some(1)).unwrap();
        let data = r.get_data();
        assert_eq!(data.len(), 6 * 4 * 4);
        assert!(data.chunks_exact(4).all(|px| px == AIR_COLOR));
    }

    #[test]
    fn added_material_shows_up_in_the_buffer() {
        let mut r = Renderer::with_scene(3, 3, Scene::Empty, Some(1)).unwrap();
        r.add_material("sand", 2, 1).unwrap();
        // Row 1, column 2 of a 3-wide grid.
        let i = (3 + 2) * 4;
        assert_eq!(&r.get_data()[i..i + 4], &SAND_COLOR);
    }

    #[test]
    fn add_material_rejects_bad_input() {
        let mut r = Renderer::with_scene(3, 3, Scene::Empty, Some(1)).unwrap();
        assert!(matches!(
            r.add_material("plasma", 0, 0),
            Err(RendererError::UnknownMaterial(_))
        ));
        assert!(matches!(
            r.add_material("sand", -1, 0),
            Err(RendererError::OutOfBounds { x: -1, .. })
        ));
        assert!(matches!(
            r.add_material("sand", 0, 3),
            Err(RendererError::OutOfBounds { y: 3, .. })
        ));
    }

    #[test]
    fn tick_moves_material_and_counts() {
        let mut r = Renderer::with_scene(1, 3, Scene::Empty, Some(1)).unwrap();
        r.add_material("sand", 0, 0).unwrap();
        r.tick();
        assert_eq!(r.ticks(), 1);
        assert_eq!(r.to_text(), " \n■\n ");
        let data = r.get_data();
        assert_eq!(&data[4..8], &SAND_COLOR);
        assert_eq!(&data[0..4], &AIR_COLOR);
    }

    #[test]
    fn text_rendering_uses_one_line_per_row() {
        let r = Renderer::with_scene(5, 3, Scene::Bonfire, Some(1)).unwrap();
        assert_eq!(r.to_text(), "  f  \n     \n=====");
    }

    #[test]
    fn clear_empties_the_grid() {
        let mut r = Renderer::with_scene(4, 4, Scene::Lake, Some(1)).unwrap();
        r.clear();
        assert_eq!(r.simulation().count(Material::Air), 16);
    }

    #[test]
    fn snapshot_writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let r = Renderer::with_scene(4, 2, Scene::Lake, Some(1)).unwrap();
        r.save_snapshot(&path).unwrap();
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(0, 1).0, WATER_COLOR);
    }
}
