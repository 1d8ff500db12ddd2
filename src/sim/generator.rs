//! Procedural town generation
//!
//! Builds a typed tile grid from a seed. Passes run in a fixed order and
//! later passes override earlier ones on the same cell:
//! highways → collector roads → local streets → open chase areas →
//! zoning → parks/water → sidewalks → materialize.
//!
//! Every pass after the highways writes only into `grass`, so roads always
//! survive the passes that follow them.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use rand::Rng;
use rand_pcg::Pcg32;

use super::rng::{TERRAIN_STREAM, stream_rng};
use super::terrain::Terrain;
use super::tile::{TerrainTile, TileKind};

/// Spacing between collector roads and between local streets
pub const STREET_SPACING: usize = 12;
/// Search window for the nearest road when zoning
const ROAD_SEARCH_RADIUS: i64 = 5;
/// Search window for the nearest highway when zoning
const HIGHWAY_SEARCH_RADIUS: i64 = 3;
/// Distance reported when nothing is found inside the window
const DISTANCE_NOT_FOUND: u32 = 10;
/// Rural noise frequency (samples at `x * 0.1, y * 0.1`)
const RURAL_NOISE_FREQUENCY: f32 = 0.1;

/// Land-use zone from the fixed spatial partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Residential,
    Commercial,
    Industrial,
    Rural,
}

impl Zone {
    /// Classify a grid cell. East is rural, south is industrial,
    /// the north-center band is commercial, everything else residential.
    pub fn classify(x: usize, y: usize, width: usize, height: usize) -> Self {
        let (x, y) = (x as f32, y as f32);
        let (w, h) = (width as f32, height as f32);
        if x > w * 0.7 {
            Zone::Rural
        } else if y > h * 0.6 {
            Zone::Industrial
        } else if x > w * 0.3 && x < w * 0.7 && y < h * 0.4 {
            Zone::Commercial
        } else {
            Zone::Residential
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoadClass {
    Highway,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
}

impl RoadClass {
    /// Direction is a property of the carve, never inferred afterwards
    fn tile(self, dir: Direction) -> TileKind {
        match (self, dir) {
            (RoadClass::Highway, Direction::Horizontal) => TileKind::HighwayHorizontal,
            (RoadClass::Highway, Direction::Vertical) => TileKind::HighwayVertical,
            (RoadClass::Local, Direction::Horizontal) => TileKind::RoadHorizontal,
            (RoadClass::Local, Direction::Vertical) => TileKind::RoadVertical,
        }
    }
}

/// Intermediate grid of type labels, discarded after materialization
#[derive(Debug, Clone)]
struct Layout {
    width: usize,
    height: usize,
    cells: Vec<TileKind>,
}

impl Layout {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![TileKind::Grass; width * height],
        }
    }

    fn is_valid_position(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn get(&self, x: i64, y: i64) -> Option<TileKind> {
        if !self.is_valid_position(x, y) {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    fn set(&mut self, x: i64, y: i64, kind: TileKind) {
        if self.is_valid_position(x, y) {
            self.cells[y as usize * self.width + x as usize] = kind;
        }
    }

    fn set_if_grass(&mut self, x: i64, y: i64, kind: TileKind) {
        if self.get(x, y) == Some(TileKind::Grass) {
            self.set(x, y, kind);
        }
    }

    /// Carve a full-length line. `line` is the row (horizontal) or column (vertical).
    fn carve_line(&mut self, line: usize, dir: Direction, class: RoadClass, grass_only: bool) {
        let kind = class.tile(dir);
        let (len, line) = match dir {
            Direction::Horizontal => (self.width, line as i64),
            Direction::Vertical => (self.height, line as i64),
        };
        for i in 0..len as i64 {
            let (x, y) = match dir {
                Direction::Horizontal => (i, line),
                Direction::Vertical => (line, i),
            };
            if grass_only {
                self.set_if_grass(x, y, kind);
            } else {
                self.set(x, y, kind);
            }
        }
    }

    /// Convert grass to `kind` in the square `center ± half` (inclusive)
    fn fill_square(&mut self, cx: usize, cy: usize, half: i64, kind: TileKind) {
        let (cx, cy) = (cx as i64, cy as i64);
        for y in cy - half..=cy + half {
            for x in cx - half..=cx + half {
                self.set_if_grass(x, y, kind);
            }
        }
    }

    /// Convert grass to `kind` in the `size × size` block starting at (x0, y0)
    fn fill_block(&mut self, x0: usize, y0: usize, size: usize, kind: TileKind) {
        for y in y0..(y0 + size).min(self.height) {
            for x in x0..(x0 + size).min(self.width) {
                self.set_if_grass(x as i64, y as i64, kind);
            }
        }
    }

    /// Manhattan distance to the nearest cell matching `pred` within a square window
    fn distance_to(&self, x: usize, y: usize, radius: i64, pred: impl Fn(TileKind) -> bool) -> u32 {
        let (x, y) = (x as i64, y as i64);
        let mut best: Option<u32> = None;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if self.get(x + dx, y + dy).is_some_and(&pred) {
                    let d = (dx.abs() + dy.abs()) as u32;
                    best = Some(best.map_or(d, |b| b.min(d)));
                }
            }
        }
        best.unwrap_or(DISTANCE_NOT_FOUND)
    }

    // ---- Road network ----

    fn carve_highways(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        // Main cross
        self.carve_line((h * 0.5) as usize, Direction::Horizontal, RoadClass::Highway, false);
        self.carve_line((w * 0.4) as usize, Direction::Vertical, RoadClass::Highway, false);
        // Secondary arterials
        self.carve_line((h * 0.25) as usize, Direction::Horizontal, RoadClass::Highway, false);
        self.carve_line((h * 0.75) as usize, Direction::Horizontal, RoadClass::Highway, false);
        self.carve_line((w * 0.2) as usize, Direction::Vertical, RoadClass::Highway, false);
        self.carve_line((w * 0.6) as usize, Direction::Vertical, RoadClass::Highway, false);
    }

    fn carve_collectors(&mut self) {
        for y in (STREET_SPACING..self.height).step_by(STREET_SPACING) {
            self.carve_line(y, Direction::Horizontal, RoadClass::Local, true);
        }
        for x in (STREET_SPACING..self.width).step_by(STREET_SPACING) {
            self.carve_line(x, Direction::Vertical, RoadClass::Local, true);
        }
    }

    /// Finer street grid inside the two northern residential quadrants
    fn carve_local_streets(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        let area_w = (w * 0.4) as usize;
        let area_h = (h * 0.4) as usize;
        let areas = [(0, 0), ((w * 0.6) as usize, 0)];

        for (ax, ay) in areas {
            for y in (ay + STREET_SPACING..ay + area_h).step_by(STREET_SPACING) {
                for x in ax..ax + area_w {
                    self.set_if_grass(x as i64, y as i64, TileKind::RoadHorizontal);
                }
            }
            for x in (ax + STREET_SPACING..ax + area_w).step_by(STREET_SPACING) {
                for y in ay..ay + area_h {
                    self.set_if_grass(x as i64, y as i64, TileKind::RoadVertical);
                }
            }
        }
    }

    /// Open fields for maneuvering: map center plus four spots flanking the highway cross
    fn clear_chase_areas(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        self.fill_square((w * 0.5) as usize, (h * 0.5) as usize, 8, TileKind::Field);

        let flanks = [
            ((w * 0.15) as usize, (h * 0.5) as usize, 6),
            ((w * 0.65) as usize, (h * 0.5) as usize, 6),
            ((w * 0.4) as usize, (h * 0.25) as usize, 5),
            ((w * 0.4) as usize, (h * 0.75) as usize, 5),
        ];
        for (x, y, half) in flanks {
            self.fill_square(x, y, half, TileKind::Field);
        }
    }

    fn add_parks_and_water(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        self.fill_block((w * 0.5) as usize, (h * 0.6) as usize, 6, TileKind::Field);
        self.fill_block((w * 0.8) as usize, (h * 0.2) as usize, 4, TileKind::Water);
    }

    /// Ring every road/highway cell with sidewalk on its remaining grass neighbors
    fn add_sidewalks(&mut self) {
        let roads: Vec<(i64, i64)> = (0..self.height as i64)
            .flat_map(|y| (0..self.width as i64).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y).is_some_and(|k| k.is_road_or_highway()))
            .collect();

        for (x, y) in roads {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    self.set_if_grass(x + dx, y + dy, TileKind::Sidewalk);
                }
            }
        }
    }
}

/// Seeded town generator
pub struct TerrainGenerator {
    seed: u64,
    tile_size: f32,
    noise: FastNoiseLite,
    rng: Pcg32,
}

impl TerrainGenerator {
    pub fn new(seed: u64, tile_size: f32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::Value));
        noise.set_frequency(Some(RURAL_NOISE_FREQUENCY));

        Self {
            seed,
            tile_size: if tile_size.is_finite() && tile_size > 0.0 {
                tile_size
            } else {
                crate::consts::TILE_SIZE
            },
            noise,
            rng: stream_rng(seed, TERRAIN_STREAM),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Generate terrain covering `world_width × world_height`
    pub fn generate(&mut self, world_width: f32, world_height: f32) -> Terrain {
        let tiles_x = grid_extent(world_width, self.tile_size);
        let tiles_y = grid_extent(world_height, self.tile_size);

        let layout = self.town_layout(tiles_x as usize, tiles_y as usize);

        let mut tiles = Vec::with_capacity(layout.cells.len());
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let kind = layout.cells[ty as usize * layout.width + tx as usize];
                tiles.push(TerrainTile::new(kind, tx, ty, self.tile_size));
            }
        }

        let terrain = Terrain::from_parts(self.tile_size, tiles_x, tiles_y, tiles);
        log::info!(
            "Generated {}x{} terrain (seed {}): {} tiles, {} collidable",
            tiles_x,
            tiles_y,
            self.seed,
            terrain.len(),
            terrain.tiles().iter().filter(|t| t.collidable).count()
        );
        terrain
    }

    fn town_layout(&mut self, width: usize, height: usize) -> Layout {
        let mut layout = Layout::new(width, height);
        layout.carve_highways();
        layout.carve_collectors();
        layout.carve_local_streets();
        layout.clear_chase_areas();
        self.zone(&mut layout);
        layout.add_parks_and_water();
        layout.add_sidewalks();
        layout
    }

    /// Place buildings and open space on every remaining grass cell
    fn zone(&mut self, layout: &mut Layout) {
        for y in 0..layout.height {
            for x in 0..layout.width {
                if layout.get(x as i64, y as i64) != Some(TileKind::Grass) {
                    continue;
                }
                let kind = self.building_for(layout, x, y);
                if kind != TileKind::Grass {
                    layout.set(x as i64, y as i64, kind);
                }
            }
        }
    }

    fn building_for(&mut self, layout: &Layout, x: usize, y: usize) -> TileKind {
        let road = layout.distance_to(x, y, ROAD_SEARCH_RADIUS, |k| k.is_road_or_highway());
        let highway = layout.distance_to(x, y, HIGHWAY_SEARCH_RADIUS, |k| k.is_highway());

        match Zone::classify(x, y, layout.width, layout.height) {
            Zone::Residential => self.residential(road),
            Zone::Commercial => self.commercial(road, highway),
            Zone::Industrial => self.industrial(road, highway),
            Zone::Rural => self.rural(x, y),
        }
    }

    /// Roll `p` and pick `hit` or `miss`
    fn pick(&mut self, p: f32, hit: TileKind, miss: TileKind) -> TileKind {
        if self.rng.random::<f32>() < p { hit } else { miss }
    }

    fn residential(&mut self, road: u32) -> TileKind {
        if road <= 2 {
            self.pick(0.5, TileKind::House, TileKind::Grass)
        } else if road > 4 {
            // Parks away from the street grid
            self.pick(0.4, TileKind::Field, TileKind::Grass)
        } else {
            TileKind::Grass
        }
    }

    fn commercial(&mut self, road: u32, highway: u32) -> TileKind {
        if highway <= 1 && road <= 2 {
            self.pick(0.2, TileKind::GasStation, TileKind::Office)
        } else if road <= 3 {
            self.pick(0.4, TileKind::Office, TileKind::Building)
        } else if road <= 5 {
            self.pick(0.2, TileKind::Parking, TileKind::Grass)
        } else {
            TileKind::Grass
        }
    }

    fn industrial(&mut self, road: u32, highway: u32) -> TileKind {
        if highway <= 2 {
            self.pick(0.5, TileKind::Building, TileKind::Grass)
        } else if road <= 4 {
            self.pick(0.3, TileKind::Building, TileKind::Grass)
        } else {
            TileKind::Grass
        }
    }

    fn rural(&mut self, x: usize, y: usize) -> TileKind {
        let n = self.noise.get_noise_2d(x as f32, y as f32);
        if n > 0.4 {
            TileKind::Field
        } else if n > 0.1 {
            TileKind::Farm
        } else if n > -0.2 {
            TileKind::Barn
        } else if n > -0.4 {
            TileKind::Silo
        } else {
            TileKind::Grass
        }
    }
}

fn grid_extent(world: f32, tile_size: f32) -> u32 {
    if !world.is_finite() || world <= 0.0 {
        return 0;
    }
    (world / tile_size).ceil() as u32
}

/// Generate a town for `seed`. Same seed and sizes always yield the same tiles.
pub fn generate(seed: u64, tile_size: f32, world_width: f32, world_height: f32) -> Terrain {
    TerrainGenerator::new(seed, tile_size).generate(world_width, world_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{TILE_SIZE, WORLD_HEIGHT, WORLD_WIDTH};

    fn kinds(t: &Terrain) -> Vec<TileKind> {
        t.tiles().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_grid_dimensions() {
        let t = generate(42, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
        assert_eq!(t.tiles_x, 32);
        assert_eq!(t.tiles_y, 18);
        assert_eq!(t.len(), 576);

        // Partial tiles round up
        let small = generate(1, 75.0, 100.0, 100.0);
        assert_eq!((small.tiles_x, small.tiles_y), (2, 2));

        assert!(generate(1, 75.0, 0.0, 100.0).is_empty());
    }

    #[test]
    fn test_deterministic_for_seed() {
        for seed in [0, 1, 42, 9_999_999] {
            let a = generate(seed, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
            let b = generate(seed, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
            assert_eq!(kinds(&a), kinds(&b), "seed {}", seed);
        }
    }

    #[test]
    fn test_seeds_vary_layout() {
        let a = generate(1, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
        let b = generate(2, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
        assert_ne!(kinds(&a), kinds(&b));
    }

    #[test]
    fn test_tile_centers() {
        let t = generate(42, 75.0, 2400.0, 1350.0);
        let first = t.tiles()[0];
        assert_eq!((first.pos.x, first.pos.y), (37.5, 37.5));
        let last = t.tiles()[t.len() - 1];
        assert_eq!((last.tx, last.ty), (31, 17));
        assert_eq!((last.pos.x, last.pos.y), (2362.5, 1312.5));
    }

    #[test]
    fn test_query_center_matches_tables() {
        let t = generate(42, 75.0, 2400.0, 1350.0);
        let tile = t.query_at(1200.0, 675.0).expect("center is on the grid");
        assert!(TileKind::ALL.contains(&tile.kind));
        assert_eq!(tile.speed_modifier, tile.kind.speed_modifier());
        assert_eq!((tile.tx, tile.ty), (16, 9));
    }

    #[test]
    fn test_collidable_flags_follow_type() {
        let t = generate(7, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
        for tile in t.tiles() {
            assert_eq!(tile.collidable, tile.kind.is_collidable(), "{:?}", tile);
            if tile.collidable {
                assert_eq!(tile.speed_modifier, 0.0);
            }
        }
    }

    #[test]
    fn test_highway_cross_survives_all_passes() {
        for seed in [3, 17, 42] {
            let t = generate(seed, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
            // Main horizontal at row 9, main vertical at column 12 (32 × 0.4)
            for tx in 0..t.tiles_x as i64 {
                assert!(t.tile(tx, 9).unwrap().kind.is_highway(), "({}, 9)", tx);
            }
            for ty in 0..t.tiles_y as i64 {
                assert!(t.tile(12, ty).unwrap().kind.is_highway(), "(12, {})", ty);
            }
        }
    }

    #[test]
    fn test_carve_direction_is_from_the_edit() {
        let t = generate(42, TILE_SIZE, WORLD_WIDTH, WORLD_HEIGHT);
        // Row 4 arterial is carved after the main vertical and wins the crossing
        assert_eq!(t.tile(12, 4).unwrap().kind, TileKind::HighwayHorizontal);
        // Column 6 arterial is carved after the main horizontal
        assert_eq!(t.tile(6, 9).unwrap().kind, TileKind::HighwayVertical);
        assert_eq!(t.tile(0, 9).unwrap().kind, TileKind::HighwayHorizontal);
    }

    #[test]
    fn test_open_areas_never_overwrite_roads() {
        let mut layout = Layout::new(32, 18);
        layout.carve_highways();
        layout.carve_collectors();
        layout.carve_local_streets();
        let roads_before: Vec<usize> = (0..layout.cells.len())
            .filter(|&i| layout.cells[i].is_road_or_highway())
            .collect();

        layout.clear_chase_areas();
        layout.add_parks_and_water();
        layout.add_sidewalks();

        for i in roads_before {
            assert!(layout.cells[i].is_road_or_highway(), "road cell {} overwritten", i);
        }
        assert!(layout.cells.contains(&TileKind::Field));
    }

    #[test]
    fn test_collectors_skip_existing_roads() {
        let mut layout = Layout::new(32, 18);
        layout.carve_highways();
        layout.carve_collectors();
        // Column 12 is the main highway, so the collector at column 12 leaves it intact
        assert_eq!(layout.get(12, 0), Some(TileKind::HighwayVertical));
        assert_eq!(layout.get(24, 0), Some(TileKind::RoadVertical));
        assert_eq!(layout.get(0, 12), Some(TileKind::RoadHorizontal));
        // Crossing a highway keeps the highway
        assert_eq!(layout.get(24, 9), Some(TileKind::HighwayHorizontal));
    }

    #[test]
    fn test_parks_and_water_on_open_grid() {
        let mut layout = Layout::new(32, 18);
        layout.add_parks_and_water();
        let water = layout.cells.iter().filter(|k| **k == TileKind::Water).count();
        let field = layout.cells.iter().filter(|k| **k == TileKind::Field).count();
        assert_eq!(water, 16);
        assert_eq!(field, 36);
        // Water block starts at (25, 3)
        assert_eq!(layout.get(25, 3), Some(TileKind::Water));
        assert_eq!(layout.get(24, 3), Some(TileKind::Grass));
    }

    #[test]
    fn test_sidewalks_ring_roads() {
        let mut layout = Layout::new(5, 5);
        layout.set(2, 2, TileKind::RoadHorizontal);
        layout.set(0, 0, TileKind::House);
        layout.add_sidewalks();
        let sidewalks = layout.cells.iter().filter(|k| **k == TileKind::Sidewalk).count();
        assert_eq!(sidewalks, 8);
        assert_eq!(layout.get(0, 0), Some(TileKind::House));
        assert_eq!(layout.get(2, 2), Some(TileKind::RoadHorizontal));
    }

    #[test]
    fn test_writes_outside_grid_are_ignored() {
        let mut layout = Layout::new(4, 4);
        layout.set(-1, 0, TileKind::Water);
        layout.set(4, 4, TileKind::Water);
        layout.fill_square(0, 0, 3, TileKind::Field);
        assert!(!layout.cells.contains(&TileKind::Water));
        assert_eq!(layout.cells.iter().filter(|k| **k == TileKind::Field).count(), 16);
    }

    #[test]
    fn test_zone_partition() {
        assert_eq!(Zone::classify(30, 2, 32, 18), Zone::Rural);
        assert_eq!(Zone::classify(5, 15, 32, 18), Zone::Industrial);
        assert_eq!(Zone::classify(15, 3, 32, 18), Zone::Commercial);
        assert_eq!(Zone::classify(2, 2, 32, 18), Zone::Residential);
        assert_eq!(Zone::classify(15, 9, 32, 18), Zone::Residential);
    }

    #[test]
    fn test_distance_window() {
        let mut layout = Layout::new(20, 20);
        layout.set(10, 13, TileKind::RoadVertical);
        assert_eq!(layout.distance_to(10, 10, 5, |k| k.is_road_or_highway()), 3);
        assert_eq!(layout.distance_to(0, 0, 5, |k| k.is_road_or_highway()), 10);
        assert_eq!(layout.distance_to(10, 10, 3, |k| k.is_highway()), 10);
    }
}
