use super::genome::Color;
use serde::{Deserialize, Serialize};

/// Planar world coordinate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_sq(other).sqrt()
    }

    #[must_use]
    pub fn distance_sq(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }

    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Weather category driven by the weather state machine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeatherType {
    #[default]
    Clear,
    Cloudy,
    Overcast,
    LightRain,
    HeavyRain,
    Storm,
    Fog,
    Snow,
}

impl WeatherType {
    pub const ALL: [Self; 8] = [
        Self::Clear,
        Self::Cloudy,
        Self::Overcast,
        Self::LightRain,
        Self::HeavyRain,
        Self::Storm,
        Self::Fog,
        Self::Snow,
    ];
}

/// Coarse band of the 24-hour clock.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeOfDay {
    Dawn,
    Morning,
    #[default]
    Noon,
    Afternoon,
    Dusk,
    Night,
}

impl TimeOfDay {
    /// Maps an hour in `[0, 24)` to its band.
    #[must_use]
    pub fn from_hour(hour: f32) -> Self {
        match hour {
            h if (5.0..7.0).contains(&h) => Self::Dawn,
            h if (7.0..11.0).contains(&h) => Self::Morning,
            h if (11.0..14.0).contains(&h) => Self::Noon,
            h if (14.0..18.0).contains(&h) => Self::Afternoon,
            h if (18.0..20.0).contains(&h) => Self::Dusk,
            _ => Self::Night,
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Self::Night | Self::Dawn)
    }
}

/// Continuous atmospheric parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WeatherSettings {
    pub cloud_coverage: f32,
    pub rain_intensity: f32,
    pub fog_density: f32,
    pub wind_strength: f32,
    pub sky_tint: Color,
    pub light_intensity: f32,
    /// Normalized temperature in `[0, 1]`; 0.5 is comfortable.
    pub temperature: f32,
}

impl WeatherSettings {
    /// Linear blend of every parameter between `self` and `target`.
    #[must_use]
    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            cloud_coverage: mix(self.cloud_coverage, target.cloud_coverage),
            rain_intensity: mix(self.rain_intensity, target.rain_intensity),
            fog_density: mix(self.fog_density, target.fog_density),
            wind_strength: mix(self.wind_strength, target.wind_strength),
            sky_tint: self.sky_tint.lerp(target.sky_tint, t),
            light_intensity: mix(self.light_intensity, target.light_intensity),
            temperature: mix(self.temperature, target.temperature),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            cloud_coverage: 0.0,
            rain_intensity: 0.0,
            fog_density: 0.0,
            wind_strength: 0.2,
            sky_tint: Color::WHITE,
            light_intensity: 1.0,
            temperature: 0.5,
        }
    }
}

/// Full state of the weather and day cycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct WeatherState {
    pub current_weather: WeatherType,
    pub current: WeatherSettings,
    pub target: WeatherSettings,
    /// Progress of the active transition in `[0, 1]`.
    pub transition_progress: f32,
    /// Hour of day in `[0, 24)`.
    pub hour: f32,
    pub time_of_day: TimeOfDay,
}

/// Scalars published by the weather each tick and read by every creature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentModifiers {
    pub temperature: f32,
    pub visibility: f32,
    pub movement: f32,
}

impl Default for EnvironmentModifiers {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            visibility: 1.0,
            movement: 1.0,
        }
    }
}

/// Category of a nutrient source.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceType {
    Tree,
    #[default]
    Bush,
    Grass,
    Rock,
    Flower,
}

/// One placed nutrient source. Instances are never removed; a destroyed
/// instance counts down until it regrows in place.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    pub position: Position,
    pub resource_type: ResourceType,
    /// Yaw in degrees.
    pub rotation: f32,
    pub scale: f32,
    pub health: f32,
    pub nutrient_value: f64,
    pub destroyed: bool,
    pub regrowth_time: f64,
    pub regrowth_remaining: f64,
}

impl ResourceInstance {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.destroyed
    }
}
