//! Generated terrain grid and its runtime queries
//!
//! Read every tick by vehicle and tornado logic; written only when a
//! tornado flattens a building or tree.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile::{TerrainTile, TileKind};

/// Materialized tile grid (row-major)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    pub tile_size: f32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    tiles: Vec<TerrainTile>,
}

impl Terrain {
    /// Wrap a row-major tile list. Returns `None` if the count doesn't match the grid.
    pub fn from_tiles(
        tile_size: f32,
        tiles_x: u32,
        tiles_y: u32,
        tiles: Vec<TerrainTile>,
    ) -> Option<Self> {
        if tiles.len() != tiles_x as usize * tiles_y as usize {
            return None;
        }
        Some(Self::from_parts(tile_size, tiles_x, tiles_y, tiles))
    }

    /// Caller guarantees `tiles` is row-major and exactly `tiles_x * tiles_y` long
    pub(crate) fn from_parts(
        tile_size: f32,
        tiles_x: u32,
        tiles_y: u32,
        tiles: Vec<TerrainTile>,
    ) -> Self {
        debug_assert_eq!(tiles.len(), tiles_x as usize * tiles_y as usize);
        Self {
            tile_size,
            tiles_x,
            tiles_y,
            tiles,
        }
    }

    pub fn tiles(&self) -> &[TerrainTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// World width covered by the grid
    pub fn world_width(&self) -> f32 {
        self.tiles_x as f32 * self.tile_size
    }

    /// World height covered by the grid
    pub fn world_height(&self) -> f32 {
        self.tiles_y as f32 * self.tile_size
    }

    pub fn is_valid_position(&self, tx: i64, ty: i64) -> bool {
        tx >= 0 && ty >= 0 && tx < self.tiles_x as i64 && ty < self.tiles_y as i64
    }

    /// Grid cell containing a world point (may be out of range)
    pub fn cell_of(&self, world_x: f32, world_y: f32) -> (i64, i64) {
        (
            (world_x / self.tile_size).floor() as i64,
            (world_y / self.tile_size).floor() as i64,
        )
    }

    fn index(&self, tx: i64, ty: i64) -> Option<usize> {
        if !self.is_valid_position(tx, ty) {
            return None;
        }
        Some(ty as usize * self.tiles_x as usize + tx as usize)
    }

    pub fn tile(&self, tx: i64, ty: i64) -> Option<&TerrainTile> {
        self.index(tx, ty).map(|i| &self.tiles[i])
    }

    /// Tile whose cell contains the world point, `None` outside the grid
    pub fn query_at(&self, world_x: f32, world_y: f32) -> Option<&TerrainTile> {
        if !world_x.is_finite() || !world_y.is_finite() {
            return None;
        }
        let (tx, ty) = self.cell_of(world_x, world_y);
        self.tile(tx, ty)
    }

    pub fn kind_at(&self, world_x: f32, world_y: f32) -> Option<TileKind> {
        self.query_at(world_x, world_y).map(|t| t.kind)
    }

    /// Speed multiplier at a world point; off-grid is neutral
    pub fn speed_modifier_at(&self, world_x: f32, world_y: f32) -> f32 {
        self.query_at(world_x, world_y)
            .map(|t| t.speed_modifier)
            .unwrap_or(1.0)
    }

    pub fn is_water_at(&self, p: Vec2) -> bool {
        self.kind_at(p.x, p.y) == Some(TileKind::Water)
    }

    /// Set the type of the tile under a world point.
    /// Returns true if a tile changed; out-of-grid points are ignored.
    pub fn mutate(&mut self, world_x: f32, world_y: f32, kind: TileKind) -> bool {
        if !world_x.is_finite() || !world_y.is_finite() {
            return false;
        }
        let (tx, ty) = self.cell_of(world_x, world_y);
        let Some(i) = self.index(tx, ty) else {
            return false;
        };
        let tile = &mut self.tiles[i];
        if tile.kind == kind {
            return false;
        }
        tile.set_kind(kind);
        true
    }

    /// Flatten the building/tree under a world point into debris.
    /// Idempotent: anything not destructible (debris included) is left alone.
    pub fn destroy_at(&mut self, world_x: f32, world_y: f32) -> bool {
        match self.kind_at(world_x, world_y) {
            Some(kind) if kind.is_destructible() => {
                self.mutate(world_x, world_y, TileKind::Debris)
            }
            _ => false,
        }
    }

    /// Flatten every destructible tile whose center lies within `radius` of `center`.
    /// Returns the tiles as they were before destruction.
    pub fn destroy_within(&mut self, center: Vec2, radius: f32) -> Vec<TerrainTile> {
        let mut destroyed = Vec::new();
        if radius <= 0.0 || !center.is_finite() {
            return destroyed;
        }

        let (min_x, min_y) = self.cell_of(center.x - radius, center.y - radius);
        let (max_x, max_y) = self.cell_of(center.x + radius, center.y + radius);
        let min_x = min_x.max(0);
        let min_y = min_y.max(0);
        let max_x = max_x.min(self.tiles_x as i64 - 1);
        let max_y = max_y.min(self.tiles_y as i64 - 1);

        for ty in min_y..=max_y {
            for tx in min_x..=max_x {
                let Some(i) = self.index(tx, ty) else {
                    continue;
                };
                let tile = self.tiles[i];
                if tile.kind.is_destructible() && tile.pos.distance(center) <= radius {
                    self.tiles[i].set_kind(TileKind::Debris);
                    destroyed.push(tile);
                }
            }
        }
        destroyed
    }

    /// Number of tiles of a given kind
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }
}
