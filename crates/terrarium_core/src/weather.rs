//! Weather and day-cycle state machine.
//!
//! [`WeatherModulator`] owns the only mutable [`WeatherState`] and publishes
//! the [`EnvironmentModifiers`] every creature reads during its tick.

use crate::config::{AppConfig, WeatherConfig};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use terrarium_data::{
    Color, EnvironmentModifiers, SimEvent, TimeOfDay, WeatherSettings, WeatherState, WeatherType,
};

/// RNG stream reserved for weather rolls.
pub const WEATHER_RNG_STREAM: u64 = 1;

/// Transition length used by [`WeatherModulator::set_weather`] callers that
/// have no preference.
pub const DEFAULT_TRANSITION_TIME: f64 = 5.0;

const BASELINE_WIND: f32 = 0.2;
const STORM_WIND: f32 = 0.8;

/// Target parameters of a weather category.
#[must_use]
pub fn target_settings(weather: WeatherType) -> WeatherSettings {
    let (cloud, rain, fog, light, tint, temperature) = match weather {
        WeatherType::Clear => (0.1, 0.0, 0.0, 3.0, (0.5, 0.7, 1.0), 0.7),
        WeatherType::Cloudy => (0.6, 0.0, 0.1, 2.0, (0.6, 0.7, 0.8), 0.5),
        WeatherType::Overcast => (0.9, 0.0, 0.15, 1.2, (0.5, 0.55, 0.6), 0.45),
        WeatherType::LightRain => (0.8, 0.3, 0.2, 1.5, (0.4, 0.5, 0.6), 0.4),
        WeatherType::HeavyRain => (1.0, 0.8, 0.4, 0.8, (0.3, 0.4, 0.5), 0.3),
        WeatherType::Storm => (1.0, 1.0, 0.3, 0.5, (0.2, 0.3, 0.4), 0.2),
        WeatherType::Fog => (0.7, 0.0, 0.8, 1.0, (0.7, 0.7, 0.7), 0.4),
        WeatherType::Snow => (0.9, 0.0, 0.2, 2.0, (0.8, 0.9, 1.0), 0.1),
    };
    WeatherSettings {
        cloud_coverage: cloud,
        rain_intensity: rain,
        fog_density: fog,
        wind_strength: if weather == WeatherType::Storm {
            STORM_WIND
        } else {
            BASELINE_WIND
        },
        sky_tint: Color::rgb(tint.0, tint.1, tint.2),
        light_intensity: light,
        temperature,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct WeightedWeather {
    pub weather: WeatherType,
    pub weight: f32,
}

impl WeightedWeather {
    #[must_use]
    pub const fn even(weather: WeatherType) -> Self {
        Self {
            weather,
            weight: 1.0,
        }
    }
}

/// Candidate successors of one weather category.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherTransitionRule {
    pub from: WeatherType,
    pub to: Vec<WeightedWeather>,
}

/// Weighted adjacency used for random weather changes.
///
/// Categories without a rule draw from `fallback`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeatherTransitionTable {
    pub rules: Vec<WeatherTransitionRule>,
    pub fallback: Vec<WeightedWeather>,
}

impl WeatherTransitionTable {
    #[must_use]
    pub fn candidates(&self, from: WeatherType) -> &[WeightedWeather] {
        self.rules
            .iter()
            .find(|rule| rule.from == from)
            .map_or(self.fallback.as_slice(), |rule| rule.to.as_slice())
    }

    /// Weighted draw of the successor of `from`.
    pub fn pick<R: Rng>(&self, from: WeatherType, rng: &mut R) -> Option<WeatherType> {
        let candidates = self.candidates(from);
        let dist = WeightedIndex::new(candidates.iter().map(|c| c.weight)).ok()?;
        Some(candidates[dist.sample(rng)].weather)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.fallback.is_empty(),
            "Weather transition fallback must not be empty"
        );
        let lists = self
            .rules
            .iter()
            .map(|r| r.to.as_slice())
            .chain(std::iter::once(self.fallback.as_slice()));
        for list in lists {
            anyhow::ensure!(
                list.iter().all(|c| c.weight >= 0.0),
                "Weather transition weights must be non-negative"
            );
            anyhow::ensure!(
                list.iter().map(|c| c.weight).sum::<f32>() > 0.0,
                "Weather transition weights must not all be zero"
            );
        }
        Ok(())
    }
}

impl Default for WeatherTransitionTable {
    fn default() -> Self {
        use WeatherType::*;
        let rule = |from: WeatherType, to: &[WeatherType]| WeatherTransitionRule {
            from,
            to: to.iter().copied().map(WeightedWeather::even).collect(),
        };
        Self {
            rules: vec![
                rule(Clear, &[Clear, Cloudy, Fog]),
                rule(Cloudy, &[Clear, Cloudy, LightRain, Overcast]),
                rule(LightRain, &[Cloudy, LightRain, HeavyRain]),
                rule(HeavyRain, &[LightRain, HeavyRain, Storm]),
            ],
            fallback: [Clear, Cloudy, LightRain]
                .into_iter()
                .map(WeightedWeather::even)
                .collect(),
        }
    }
}

pub struct WeatherModulator {
    config: WeatherConfig,
    state: WeatherState,
    transition_start: WeatherSettings,
    transition_duration: f64,
    transitioning: bool,
    time_since_change: f64,
    rng: ChaCha8Rng,
    events: Vec<SimEvent>,
}

impl WeatherModulator {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_rng(
            config.weather.clone(),
            config.world.rng_for(WEATHER_RNG_STREAM),
        )
    }

    #[must_use]
    pub fn with_rng(config: WeatherConfig, rng: ChaCha8Rng) -> Self {
        let settings = target_settings(config.initial_weather);
        let hour = config.initial_hour.rem_euclid(24.0);
        Self {
            state: WeatherState {
                current_weather: config.initial_weather,
                current: settings,
                target: settings,
                transition_progress: 1.0,
                hour,
                time_of_day: TimeOfDay::from_hour(hour),
            },
            transition_start: settings,
            transition_duration: 0.0,
            transitioning: false,
            time_since_change: 0.0,
            config,
            rng,
            events: Vec::new(),
        }
    }

    /// Advances the day clock, any active transition and the random weather roll.
    pub fn update(&mut self, dt: f64) {
        if self.config.dynamic_time_of_day {
            self.advance_clock(dt);
        }

        if self.transitioning {
            self.advance_transition(dt);
        }

        if self.config.dynamic_weather {
            self.time_since_change += dt;
            if self.time_since_change >= self.config.change_interval {
                self.time_since_change = 0.0;
                let from = self.state.current_weather;
                if let Some(next) = self.config.transitions.pick(from, &mut self.rng) {
                    let transition = self.config.random_transition_time;
                    self.set_weather(next, transition);
                }
            }
        }
    }

    /// Starts a transition to `weather`. Returns `false` if it is already current.
    ///
    /// A non-positive `transition_time` applies the target immediately.
    pub fn set_weather(&mut self, weather: WeatherType, transition_time: f64) -> bool {
        let previous = self.state.current_weather;
        if weather == previous {
            return false;
        }

        self.state.current_weather = weather;
        self.state.target = target_settings(weather);
        self.transition_start = self.state.current;

        if transition_time > 0.0 {
            self.transition_duration = transition_time;
            self.state.transition_progress = 0.0;
            self.transitioning = true;
        } else {
            self.finish_transition();
        }

        tracing::debug!(?previous, new = ?weather, transition_time, "Weather changing");
        self.events.push(SimEvent::WeatherChanged {
            new: weather,
            previous,
        });
        true
    }

    /// Jumps the clock to `hour` (wrapped into `[0, 24)`) without announcing a band change.
    pub fn set_time_of_day(&mut self, hour: f32) {
        self.state.hour = hour.rem_euclid(24.0);
        self.state.time_of_day = TimeOfDay::from_hour(self.state.hour);
    }

    /// Restores the configured starting weather and hour.
    pub fn reset(&mut self) {
        let settings = target_settings(self.config.initial_weather);
        self.state.current_weather = self.config.initial_weather;
        self.state.current = settings;
        self.state.target = settings;
        self.state.transition_progress = 1.0;
        self.transition_start = settings;
        self.transitioning = false;
        self.time_since_change = 0.0;
        self.set_time_of_day(self.config.initial_hour);
    }

    fn advance_clock(&mut self, dt: f64) {
        let hours_per_second = 24.0 / self.config.day_duration;
        self.state.hour = (self.state.hour + (hours_per_second * dt) as f32).rem_euclid(24.0);

        let band = TimeOfDay::from_hour(self.state.hour);
        if band != self.state.time_of_day {
            self.state.time_of_day = band;
            self.events.push(SimEvent::TimeOfDayChanged {
                band,
                hour: self.state.hour,
            });
        }
    }

    fn advance_transition(&mut self, dt: f64) {
        let progress =
            self.state.transition_progress + (dt / self.transition_duration) as f32;
        if progress >= 1.0 {
            self.finish_transition();
        } else {
            self.state.transition_progress = progress;
            self.state.current = self.transition_start.lerp(&self.state.target, progress);
        }
    }

    fn finish_transition(&mut self) {
        self.state.current = self.state.target;
        self.state.transition_progress = 1.0;
        self.transitioning = false;
    }

    #[must_use]
    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    #[must_use]
    pub fn current_weather(&self) -> WeatherType {
        self.state.current_weather
    }

    #[must_use]
    pub fn settings(&self) -> &WeatherSettings {
        &self.state.current
    }

    #[must_use]
    pub fn hour(&self) -> f32 {
        self.state.hour
    }

    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.state.time_of_day
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    #[must_use]
    pub fn temperature_effect(&self) -> f32 {
        self.state.current.temperature
    }

    #[must_use]
    pub fn visibility_modifier(&self) -> f32 {
        let s = &self.state.current;
        let mut visibility =
            1.0 - s.fog_density * 0.7 - s.rain_intensity * 0.3 - s.cloud_coverage * 0.2;
        if self.state.time_of_day.is_dark() {
            visibility *= 0.3;
        }
        visibility.clamp(0.1, 1.0)
    }

    #[must_use]
    pub fn movement_modifier(&self) -> f32 {
        let s = &self.state.current;
        let mut movement =
            1.0 - s.rain_intensity * 0.2 - s.wind_strength * 0.1 - s.fog_density * 0.1;
        if s.temperature < 0.3 {
            movement *= 0.9;
        } else if s.temperature > 0.8 {
            movement *= 0.95;
        }
        movement.clamp(0.5, 1.0)
    }

    /// Snapshot of the scalars creatures read this tick.
    #[must_use]
    pub fn modifiers(&self) -> EnvironmentModifiers {
        EnvironmentModifiers {
            temperature: self.temperature_effect(),
            visibility: self.visibility_modifier(),
            movement: self.movement_modifier(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn static_config() -> WeatherConfig {
        WeatherConfig {
            dynamic_weather: false,
            dynamic_time_of_day: false,
            ..Default::default()
        }
    }

    fn modulator(config: WeatherConfig) -> WeatherModulator {
        WeatherModulator::with_rng(config, ChaCha8Rng::seed_from_u64(17))
    }

    fn strictly_between(value: f32, a: f32, b: f32) -> bool {
        value > a.min(b) && value < a.max(b)
    }

    #[test]
    fn test_starts_clear_at_noon() {
        let weather = modulator(WeatherConfig::default());
        assert_eq!(weather.current_weather(), WeatherType::Clear);
        assert_eq!(weather.time_of_day(), TimeOfDay::Noon);
        assert_eq!(*weather.settings(), target_settings(WeatherType::Clear));
    }

    #[test]
    fn test_same_weather_is_noop() {
        let mut weather = modulator(static_config());
        assert!(!weather.set_weather(WeatherType::Clear, 5.0));
        assert!(weather.drain_events().is_empty());
        assert!(!weather.is_transitioning());
    }

    #[test]
    fn test_transition_interpolates_linearly() {
        let mut weather = modulator(static_config());
        let from = target_settings(WeatherType::Clear);
        let to = target_settings(WeatherType::Storm);

        assert!(weather.set_weather(WeatherType::Storm, 10.0));
        assert_eq!(
            weather.drain_events(),
            vec![SimEvent::WeatherChanged {
                new: WeatherType::Storm,
                previous: WeatherType::Clear,
            }]
        );

        for _ in 0..5 {
            weather.update(1.0);
        }
        let mid = *weather.settings();
        assert!(strictly_between(mid.cloud_coverage, from.cloud_coverage, to.cloud_coverage));
        assert!(strictly_between(mid.rain_intensity, from.rain_intensity, to.rain_intensity));
        assert!(strictly_between(mid.fog_density, from.fog_density, to.fog_density));
        assert!(strictly_between(mid.wind_strength, from.wind_strength, to.wind_strength));
        assert!(strictly_between(mid.light_intensity, from.light_intensity, to.light_intensity));
        assert!(strictly_between(mid.temperature, from.temperature, to.temperature));
        assert!(strictly_between(mid.sky_tint.b, from.sky_tint.b, to.sky_tint.b));
        assert!((mid.rain_intensity - 0.5).abs() < 1e-4);

        for _ in 0..6 {
            weather.update(1.0);
        }
        assert!(!weather.is_transitioning());
        assert_eq!(*weather.settings(), to);
    }

    #[test]
    fn test_zero_transition_snaps() {
        let mut weather = modulator(static_config());
        weather.set_weather(WeatherType::Fog, 0.0);
        assert_eq!(*weather.settings(), target_settings(WeatherType::Fog));
        assert!(!weather.is_transitioning());
    }

    #[test]
    fn test_random_change_follows_adjacency() {
        let config = WeatherConfig {
            dynamic_time_of_day: false,
            ..Default::default()
        };
        let allowed = [WeatherType::Clear, WeatherType::Cloudy, WeatherType::Fog];
        for seed in 0..20 {
            let mut weather = WeatherModulator::with_rng(config.clone(), ChaCha8Rng::seed_from_u64(seed));
            weather.update(120.0);
            assert!(allowed.contains(&weather.current_weather()));
        }
    }

    #[test]
    fn test_custom_table_forces_successor() {
        let mut config = WeatherConfig {
            dynamic_time_of_day: false,
            ..Default::default()
        };
        config.transitions.rules = vec![WeatherTransitionRule {
            from: WeatherType::Clear,
            to: vec![
                WeightedWeather {
                    weather: WeatherType::Snow,
                    weight: 1.0,
                },
                WeightedWeather {
                    weather: WeatherType::Fog,
                    weight: 0.0,
                },
            ],
        }];
        let mut weather = modulator(config);
        weather.update(120.0);
        assert_eq!(weather.current_weather(), WeatherType::Snow);
        assert!(weather.is_transitioning());
    }

    #[test]
    fn test_storm_uses_fallback() {
        let table = WeatherTransitionTable::default();
        let fallback: Vec<_> = table
            .candidates(WeatherType::Storm)
            .iter()
            .map(|c| c.weather)
            .collect();
        assert_eq!(
            fallback,
            vec![WeatherType::Clear, WeatherType::Cloudy, WeatherType::LightRain]
        );
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_band_change_emits_event() {
        let config = WeatherConfig {
            dynamic_weather: false,
            ..Default::default()
        };
        let mut weather = modulator(config);
        // 600s per day: 2 hours take 50s.
        for _ in 0..51 {
            weather.update(1.0);
        }
        assert_eq!(weather.time_of_day(), TimeOfDay::Afternoon);
        let events = weather.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            SimEvent::TimeOfDayChanged {
                band: TimeOfDay::Afternoon,
                ..
            }
        ));
    }

    #[test]
    fn test_clock_wraps_at_midnight() {
        let mut weather = modulator(WeatherConfig {
            dynamic_weather: false,
            initial_hour: 23.5,
            ..Default::default()
        });
        weather.update(25.0);
        assert!(weather.hour() < 1.0);
        assert_eq!(weather.time_of_day(), TimeOfDay::Night);
    }

    #[test]
    fn test_set_time_of_day_is_silent() {
        let mut weather = modulator(static_config());
        weather.set_time_of_day(30.0);
        assert!((weather.hour() - 6.0).abs() < 1e-5);
        assert_eq!(weather.time_of_day(), TimeOfDay::Dawn);
        assert!(weather.drain_events().is_empty());
    }

    #[test]
    fn test_clear_noon_modifiers() {
        let weather = modulator(static_config());
        let m = weather.modifiers();
        assert!((m.temperature - 0.7).abs() < 1e-6);
        // 1 - 0.1 * 0.2
        assert!((m.visibility - 0.98).abs() < 1e-5);
        // 1 - 0.2 * 0.1
        assert!((m.movement - 0.98).abs() < 1e-5);
    }

    #[test]
    fn test_night_fog_visibility_floor() {
        let mut weather = modulator(static_config());
        weather.set_weather(WeatherType::Fog, 0.0);
        weather.set_time_of_day(2.0);
        assert!((weather.visibility_modifier() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_storm_movement_penalty() {
        let mut weather = modulator(static_config());
        weather.set_weather(WeatherType::Storm, 0.0);
        // (1 - 0.2 - 0.08 - 0.03) * 0.9
        assert!((weather.movement_modifier() - 0.621).abs() < 1e-4);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut weather = modulator(static_config());
        weather.set_weather(WeatherType::Snow, 3.0);
        weather.set_time_of_day(3.0);
        weather.reset();
        assert_eq!(weather.current_weather(), WeatherType::Clear);
        assert_eq!(weather.time_of_day(), TimeOfDay::Noon);
        assert!(!weather.is_transitioning());
    }
}
