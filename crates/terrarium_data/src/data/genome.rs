use serde::{Deserialize, Serialize};

/// Locomotion category of a creature.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub enum MovementType {
    #[default]
    Walker,
    Flyer,
    Swimmer,
    Crawler,
    Jumper,
}

impl MovementType {
    pub const ALL: [Self; 5] = [
        Self::Walker,
        Self::Flyer,
        Self::Swimmer,
        Self::Crawler,
        Self::Jumper,
    ];
}

/// Temperament used when two creatures meet.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub enum AggressionLevel {
    #[default]
    Peaceful,
    Defensive,
    Territorial,
    Aggressive,
    Predatory,
}

impl AggressionLevel {
    pub const ALL: [Self; 5] = [
        Self::Peaceful,
        Self::Defensive,
        Self::Territorial,
        Self::Aggressive,
        Self::Predatory,
    ];

    /// Whether this temperament initiates combat on contact.
    #[must_use]
    pub fn is_hostile(self) -> bool {
        matches!(self, Self::Aggressive | Self::Predatory)
    }
}

/// Linear RGBA display color.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);

    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Channel-wise linear interpolation.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Inclusive clamp range of a numeric genome trait.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TraitBounds {
    pub min: f32,
    pub max: f32,
}

impl TraitBounds {
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn clamp(self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Heritable trait vector of a creature.
///
/// Numeric traits are always kept inside their [`TraitBounds`]; the genetic
/// operators in `terrarium_core::genetics` clamp after every change.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Genome {
    pub size: f32,
    pub speed: f32,
    pub strength: f32,
    pub endurance: f32,
    pub movement_type: MovementType,
    pub aggression_level: AggressionLevel,
    pub reproduction_rate: f32,
    pub lifespan: f32,
    pub intelligence: f32,
    pub vision_range: f32,
    pub social_tendency: f32,
    pub hunger_resistance: f32,
    pub damage_resistance: f32,
    pub primary_color: Color,
    pub secondary_color: Color,
}

/// Number of numeric (clamped) traits in a [`Genome`].
pub const NUMERIC_TRAIT_COUNT: usize = 11;

impl Genome {
    pub const SIZE: TraitBounds = TraitBounds::new(0.1, 5.0);
    pub const SPEED: TraitBounds = TraitBounds::new(0.1, 10.0);
    pub const STRENGTH: TraitBounds = TraitBounds::new(0.1, 3.0);
    pub const ENDURANCE: TraitBounds = TraitBounds::new(0.1, 2.0);
    pub const REPRODUCTION_RATE: TraitBounds = TraitBounds::new(0.01, 1.0);
    pub const LIFESPAN: TraitBounds = TraitBounds::new(1.0, 100.0);
    pub const INTELLIGENCE: TraitBounds = TraitBounds::new(0.1, 3.0);
    pub const VISION_RANGE: TraitBounds = TraitBounds::new(100.0, 2000.0);
    pub const SOCIAL_TENDENCY: TraitBounds = TraitBounds::new(0.1, 2.0);
    pub const HUNGER_RESISTANCE: TraitBounds = TraitBounds::new(0.1, 3.0);
    pub const DAMAGE_RESISTANCE: TraitBounds = TraitBounds::new(0.1, 3.0);

    /// Named numeric traits with their current values and bounds.
    #[must_use]
    pub fn numeric_traits(&self) -> [(&'static str, f32, TraitBounds); NUMERIC_TRAIT_COUNT] {
        [
            ("size", self.size, Self::SIZE),
            ("speed", self.speed, Self::SPEED),
            ("strength", self.strength, Self::STRENGTH),
            ("endurance", self.endurance, Self::ENDURANCE),
            ("reproduction_rate", self.reproduction_rate, Self::REPRODUCTION_RATE),
            ("lifespan", self.lifespan, Self::LIFESPAN),
            ("intelligence", self.intelligence, Self::INTELLIGENCE),
            ("vision_range", self.vision_range, Self::VISION_RANGE),
            ("social_tendency", self.social_tendency, Self::SOCIAL_TENDENCY),
            ("hunger_resistance", self.hunger_resistance, Self::HUNGER_RESISTANCE),
            ("damage_resistance", self.damage_resistance, Self::DAMAGE_RESISTANCE),
        ]
    }

    /// Mutable access to every numeric trait paired with its bounds.
    pub fn numeric_traits_mut(&mut self) -> [(&mut f32, TraitBounds); NUMERIC_TRAIT_COUNT] {
        [
            (&mut self.size, Self::SIZE),
            (&mut self.speed, Self::SPEED),
            (&mut self.strength, Self::STRENGTH),
            (&mut self.endurance, Self::ENDURANCE),
            (&mut self.reproduction_rate, Self::REPRODUCTION_RATE),
            (&mut self.lifespan, Self::LIFESPAN),
            (&mut self.intelligence, Self::INTELLIGENCE),
            (&mut self.vision_range, Self::VISION_RANGE),
            (&mut self.social_tendency, Self::SOCIAL_TENDENCY),
            (&mut self.hunger_resistance, Self::HUNGER_RESISTANCE),
            (&mut self.damage_resistance, Self::DAMAGE_RESISTANCE),
        ]
    }

    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        self.numeric_traits()
            .iter()
            .all(|&(_, value, bounds)| bounds.contains(value))
    }

    /// Clamps every numeric trait back into its bounds.
    pub fn clamp_to_bounds(&mut self) {
        for (value, bounds) in self.numeric_traits_mut() {
            *value = bounds.clamp(*value);
        }
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self {
            size: 1.0,
            speed: 1.0,
            strength: 1.0,
            endurance: 1.0,
            movement_type: MovementType::Walker,
            aggression_level: AggressionLevel::Peaceful,
            reproduction_rate: 0.1,
            lifespan: 30.0,
            intelligence: 1.0,
            vision_range: 500.0,
            social_tendency: 1.0,
            hunger_resistance: 1.0,
            damage_resistance: 1.0,
            primary_color: Color::WHITE,
            secondary_color: Color::GRAY,
        }
    }
}
