//! Terrain tile types and their fixed property tables

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closed set of tile types. Serialized as snake_case tags (`highway_vertical`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    #[default]
    Grass,
    Field,
    Forest,
    RoadHorizontal,
    RoadVertical,
    HighwayHorizontal,
    HighwayVertical,
    Building,
    Tree,
    Water,
    Mud,
    Desert,
    House,
    Farm,
    Barn,
    Silo,
    Office,
    GasStation,
    Parking,
    Sidewalk,
    /// Remains of a building or tree flattened by a tornado
    Debris,
}

impl TileKind {
    pub const ALL: [TileKind; 21] = [
        TileKind::Grass,
        TileKind::Field,
        TileKind::Forest,
        TileKind::RoadHorizontal,
        TileKind::RoadVertical,
        TileKind::HighwayHorizontal,
        TileKind::HighwayVertical,
        TileKind::Building,
        TileKind::Tree,
        TileKind::Water,
        TileKind::Mud,
        TileKind::Desert,
        TileKind::House,
        TileKind::Farm,
        TileKind::Barn,
        TileKind::Silo,
        TileKind::Office,
        TileKind::GasStation,
        TileKind::Parking,
        TileKind::Sidewalk,
        TileKind::Debris,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Grass => "grass",
            TileKind::Field => "field",
            TileKind::Forest => "forest",
            TileKind::RoadHorizontal => "road_horizontal",
            TileKind::RoadVertical => "road_vertical",
            TileKind::HighwayHorizontal => "highway_horizontal",
            TileKind::HighwayVertical => "highway_vertical",
            TileKind::Building => "building",
            TileKind::Tree => "tree",
            TileKind::Water => "water",
            TileKind::Mud => "mud",
            TileKind::Desert => "desert",
            TileKind::House => "house",
            TileKind::Farm => "farm",
            TileKind::Barn => "barn",
            TileKind::Silo => "silo",
            TileKind::Office => "office",
            TileKind::GasStation => "gas_station",
            TileKind::Parking => "parking",
            TileKind::Sidewalk => "sidewalk",
            TileKind::Debris => "debris",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    pub fn is_highway(&self) -> bool {
        matches!(self, TileKind::HighwayHorizontal | TileKind::HighwayVertical)
    }

    /// Any drivable lane: local/collector road or highway, either direction
    pub fn is_road_or_highway(&self) -> bool {
        self.is_highway() || matches!(self, TileKind::RoadHorizontal | TileKind::RoadVertical)
    }

    /// Solid obstacles vehicles cannot pass through
    pub fn is_collidable(&self) -> bool {
        matches!(
            self,
            TileKind::Building
                | TileKind::Tree
                | TileKind::House
                | TileKind::Barn
                | TileKind::Silo
                | TileKind::Office
                | TileKind::GasStation
        )
    }

    /// Tiles a passing tornado flattens into debris
    pub fn is_destructible(&self) -> bool {
        matches!(self, TileKind::Building | TileKind::Tree)
    }

    /// Vehicle speed multiplier (0 = impassable)
    pub fn speed_modifier(&self) -> f32 {
        if self.is_collidable() {
            return 0.0;
        }
        match self {
            TileKind::HighwayHorizontal | TileKind::HighwayVertical => 1.3,
            TileKind::RoadHorizontal | TileKind::RoadVertical => 1.1,
            TileKind::Sidewalk | TileKind::Parking => 0.9,
            TileKind::Grass => 0.8,
            TileKind::Field => 0.7,
            TileKind::Mud => 0.5,
            TileKind::Water => 0.3,
            _ => 1.0,
        }
    }

    /// Base render color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            TileKind::Grass => 0x4a7c59,
            TileKind::Field => 0x8b7355,
            TileKind::Forest => 0x2d5016,
            TileKind::RoadHorizontal | TileKind::RoadVertical => 0x404040,
            TileKind::HighwayHorizontal | TileKind::HighwayVertical => 0x2a2a2a,
            TileKind::Building => 0x654321,
            TileKind::Tree => 0x2d5016,
            TileKind::Water => 0x4682b4,
            TileKind::Mud => 0x8b7355,
            TileKind::Desert => 0xf4a460,
            TileKind::House => 0x8b4513,
            TileKind::Farm => 0x9acd32,
            TileKind::Barn => 0xa0522d,
            TileKind::Silo => 0x696969,
            TileKind::Office => 0x708090,
            TileKind::GasStation => 0xff6347,
            TileKind::Parking => 0x708090,
            TileKind::Sidewalk => 0x696969,
            TileKind::Debris => 0x4a7c59,
        }
    }
}

/// One grid cell of generated terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainTile {
    /// Grid column
    pub tx: u32,
    /// Grid row
    pub ty: u32,
    /// World-space center
    pub pos: Vec2,
    pub kind: TileKind,
    pub color: u32,
    pub collidable: bool,
    pub speed_modifier: f32,
}

impl TerrainTile {
    pub fn new(kind: TileKind, tx: u32, ty: u32, tile_size: f32) -> Self {
        let pos = Vec2::new(
            tx as f32 * tile_size + tile_size / 2.0,
            ty as f32 * tile_size + tile_size / 2.0,
        );
        let mut tile = Self {
            tx,
            ty,
            pos,
            kind,
            color: 0,
            collidable: false,
            speed_modifier: 1.0,
        };
        tile.set_kind(kind);
        tile
    }

    /// Change type and re-derive every dependent property
    pub fn set_kind(&mut self, kind: TileKind) {
        self.kind = kind;
        self.color = kind.color();
        self.collidable = kind.is_collidable();
        self.speed_modifier = kind.speed_modifier();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collidable_implies_impassable() {
        for kind in TileKind::ALL {
            if kind.is_collidable() {
                assert_eq!(kind.speed_modifier(), 0.0, "{:?}", kind);
            }
        }
    }

    #[test]
    fn test_speed_table() {
        assert_eq!(TileKind::HighwayVertical.speed_modifier(), 1.3);
        assert_eq!(TileKind::RoadHorizontal.speed_modifier(), 1.1);
        assert_eq!(TileKind::Sidewalk.speed_modifier(), 0.9);
        assert_eq!(TileKind::Parking.speed_modifier(), 0.9);
        assert_eq!(TileKind::Grass.speed_modifier(), 0.8);
        assert_eq!(TileKind::Field.speed_modifier(), 0.7);
        assert_eq!(TileKind::Mud.speed_modifier(), 0.5);
        assert_eq!(TileKind::Water.speed_modifier(), 0.3);
        assert_eq!(TileKind::GasStation.speed_modifier(), 0.0);
        // Unlisted types are neutral
        assert_eq!(TileKind::Farm.speed_modifier(), 1.0);
        assert_eq!(TileKind::Debris.speed_modifier(), 1.0);
    }

    #[test]
    fn test_collidable_set() {
        let solid: Vec<TileKind> = TileKind::ALL
            .iter()
            .copied()
            .filter(TileKind::is_collidable)
            .collect();
        assert_eq!(
            solid,
            vec![
                TileKind::Building,
                TileKind::Tree,
                TileKind::House,
                TileKind::Barn,
                TileKind::Silo,
                TileKind::Office,
                TileKind::GasStation,
            ]
        );
    }

    #[test]
    fn test_tag_round_trip_matches_serde() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_str(kind.as_str()), Some(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(TileKind::from_str("lava"), None);
    }

    #[test]
    fn test_tile_center() {
        let tile = TerrainTile::new(TileKind::House, 2, 1, 75.0);
        assert_eq!(tile.pos, Vec2::new(187.5, 112.5));
        assert!(tile.collidable);
        assert_eq!(tile.speed_modifier, 0.0);
    }
}
