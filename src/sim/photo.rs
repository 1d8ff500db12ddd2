//! Tornado photography scoring

use serde::{Deserialize, Serialize};

/// Aim time that earns the full aim bonus
pub const FULL_AIM_SECS: f32 = 2.0;
/// Distance band that earns the full distance bonus
pub const IDEAL_DISTANCE_MIN: f32 = 100.0;
pub const IDEAL_DISTANCE_MAX: f32 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoQuality {
    Poor,
    Decent,
    Good,
    Excellent,
    Perfect,
}

impl PhotoQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoQuality::Poor => "poor",
            PhotoQuality::Decent => "decent",
            PhotoQuality::Good => "good",
            PhotoQuality::Excellent => "excellent",
            PhotoQuality::Perfect => "perfect",
        }
    }

    pub fn grade(aim: f32, distance: f32) -> Self {
        if distance <= 0.2 || aim <= 0.1 {
            PhotoQuality::Poor
        } else if aim > 0.8 && distance > 0.7 {
            PhotoQuality::Perfect
        } else if aim > 0.6 && distance > 0.5 {
            PhotoQuality::Excellent
        } else if aim > 0.4 && distance > 0.3 {
            PhotoQuality::Good
        } else {
            PhotoQuality::Decent
        }
    }
}

/// A scored photo
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Session time at which the shutter fired
    pub taken_at: f32,
    pub distance: f32,
    pub strength: f32,
    pub aim_secs: f32,
    pub score: u32,
    pub quality: PhotoQuality,
}

/// Aim component in [0, 1]
pub fn aim_score(aim_secs: f32) -> f32 {
    (aim_secs / FULL_AIM_SECS).clamp(0.0, 1.0)
}

/// Distance component: full inside the ideal band, tapering either side
pub fn distance_score(distance: f32) -> f32 {
    if distance < IDEAL_DISTANCE_MIN {
        (distance / 100.0).max(0.3)
    } else if distance > IDEAL_DISTANCE_MAX {
        (1.0 - (distance - IDEAL_DISTANCE_MAX) / 200.0).max(0.1)
    } else {
        1.0
    }
}

pub fn score_photo(distance: f32, strength: f32, aim_secs: f32, taken_at: f32) -> Photo {
    let aim = aim_score(aim_secs);
    let dist = distance_score(distance);
    let total = strength * 50.0 + aim * 30.0 + dist * 20.0;
    Photo {
        taken_at,
        distance,
        strength,
        aim_secs,
        score: total.max(0.0).floor() as u32,
        quality: PhotoQuality::grade(aim, dist),
    }
}

/// Highest-scoring photo; the earliest wins a tie
pub fn best_photo(photos: &[Photo]) -> Option<&Photo> {
    photos
        .iter()
        .fold(None, |best: Option<&Photo>, p| match best {
            Some(b) if b.score >= p.score => Some(b),
            _ => Some(p),
        })
}

/// Aim tracking and the photo roll
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Camera {
    aiming: bool,
    aim_secs: f32,
    photos: Vec<Photo>,
}

impl Camera {
    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn aim_secs(&self) -> f32 {
        self.aim_secs
    }

    /// Aim progress in [0, 1] for the crosshair
    pub fn aim_progress(&self) -> f32 {
        aim_score(self.aim_secs)
    }

    /// Keep the shutter held for another `dt`
    pub fn hold(&mut self, dt: f32) {
        self.aiming = true;
        self.aim_secs += dt;
    }

    /// Release the shutter and take the picture
    pub fn release(&mut self, distance: f32, strength: f32, now: f32) -> Option<Photo> {
        if !self.aiming {
            return None;
        }
        let photo = score_photo(distance, strength, self.aim_secs, now);
        self.photos.push(photo);
        self.cancel();
        Some(photo)
    }

    /// Drop the current aim without a photo
    pub fn cancel(&mut self) {
        self.aiming = false;
        self.aim_secs = 0.0;
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn best(&self) -> Option<&Photo> {
        best_photo(&self.photos)
    }
}
