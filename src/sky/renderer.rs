use chrono::NaiveDateTime;
use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    domain::sky::{CategoryFlags, SkyInput},
    render::surface::Surface,
    sky::{
        passes,
        population::{Density, Population},
        trajectory::{ArcDirection, celestial_body},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyConfig {
    pub density: Density,
    pub arc: ArcDirection,
    /// Stars pulse with wall-clock time; otherwise they hold their base opacity.
    pub twinkle: bool,
    /// Particles advance every frame; otherwise the sky is a still image.
    pub animate: bool,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            density: Density::default(),
            arc: ArcDirection::default(),
            twinkle: true,
            animate: true,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkyError {
    #[error("surface {width}x{height} has no drawing context")]
    NoDrawingContext { width: u32, height: u32 },
    #[error("sky renderer is already mounted")]
    AlreadyMounted,
}

/// Inputs that decide which populations exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PopulationKey {
    flags: CategoryFlags,
    is_day: bool,
}

impl PopulationKey {
    fn of(input: &SkyInput) -> Self {
        Self {
            flags: input.flags(),
            is_day: input.is_day,
        }
    }
}

#[derive(Debug)]
struct Scene<S> {
    surface: S,
    input: SkyInput,
    key: PopulationKey,
    population: Population,
}

#[derive(Debug)]
enum RendererState<S> {
    Stopped,
    Running(Scene<S>),
}

/// Animated sky drawn into an exclusively owned surface.
///
/// The renderer is either `Stopped` (before `mount` and after `unmount`) or
/// `Running`. Ticks, updates and resizes on a stopped renderer are no-ops.
#[derive(Debug)]
pub struct SkyRenderer<S: Surface> {
    config: SkyConfig,
    rng: StdRng,
    state: RendererState<S>,
    frames_drawn: u64,
}

impl<S: Surface> SkyRenderer<S> {
    #[must_use]
    pub fn new(config: SkyConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic populations, for tests and golden frames.
    #[must_use]
    pub fn with_seed(config: SkyConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SkyConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            state: RendererState::Stopped,
            frames_drawn: 0,
        }
    }

    /// Takes ownership of `surface` and builds the initial populations.
    ///
    /// # Errors
    ///
    /// [`SkyError::AlreadyMounted`] when running, and
    /// [`SkyError::NoDrawingContext`] for a surface without pixels.
    pub fn mount(&mut self, surface: S, input: SkyInput) -> Result<(), SkyError> {
        if self.is_running() {
            return Err(SkyError::AlreadyMounted);
        }
        if !surface.is_drawable() {
            let (width, height) = surface.size();
            return Err(SkyError::NoDrawingContext { width, height });
        }

        let key = PopulationKey::of(&input);
        let population = self.build_population(key, surface.size());
        info!(
            size = ?surface.size(),
            category = ?key.flags.category(),
            is_day = key.is_day,
            "sky mounted"
        );
        self.state = RendererState::Running(Scene {
            surface,
            input,
            key,
            population,
        });
        Ok(())
    }

    /// Replaces the active input. Returns `true` when the populations were
    /// rebuilt because the category or day flag changed.
    pub fn update(&mut self, input: SkyInput) -> bool {
        let RendererState::Running(scene) = &mut self.state else {
            return false;
        };
        let key = PopulationKey::of(&input);
        scene.input = input;
        if key == scene.key {
            return false;
        }

        debug!(
            from = ?scene.key.flags.category(),
            to = ?key.flags.category(),
            is_day = key.is_day,
            "rebuilding sky populations"
        );
        scene.key = key;
        let size = scene.surface.size();
        scene.population =
            Population::build(key.flags, key.is_day, size, self.config.density, &mut self.rng);
        true
    }

    /// Re-targets the surface and regenerates the populations for the new
    /// bounds.
    pub fn resize(&mut self, width: u32, height: u32) {
        let RendererState::Running(scene) = &mut self.state else {
            return;
        };
        if scene.surface.size() == (width, height) {
            return;
        }
        debug!(width, height, "sky resized");
        scene.surface.resize(width, height);
        scene.population = Population::build(
            scene.key.flags,
            scene.key.is_day,
            (width, height),
            self.config.density,
            &mut self.rng,
        );
    }

    /// Draws one frame back to front, then advances the particles. Returns
    /// `false` when nothing was drawn.
    pub fn tick(&mut self, now: NaiveDateTime) -> bool {
        let RendererState::Running(scene) = &mut self.state else {
            return false;
        };
        if !scene.surface.is_drawable() {
            return false;
        }

        let size = scene.surface.size();
        let flags = scene.key.flags;
        let surface = &mut scene.surface;

        surface.clear();
        passes::draw_background(surface, scene.input.is_day, flags);
        if !scene.input.is_day {
            passes::draw_stars(surface, &scene.population.stars, now, self.config.twinkle);
        }
        if let Some(body) = celestial_body(&scene.input, now, size, self.config.arc) {
            passes::draw_celestial(surface, &body);
        }
        passes::draw_precipitation(surface, &scene.population.precipitation);

        if self.config.animate {
            scene.population.advance(size.0, size.1);
        }
        self.frames_drawn += 1;
        true
    }

    /// Stops the renderer and hands the surface back. Idempotent.
    pub fn unmount(&mut self) -> Option<S> {
        match std::mem::replace(&mut self.state, RendererState::Stopped) {
            RendererState::Running(scene) => {
                info!(frames = self.frames_drawn, "sky unmounted");
                Some(scene.surface)
            }
            RendererState::Stopped => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, RendererState::Running(_))
    }

    #[must_use]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        match &self.state {
            RendererState::Running(scene) => Some(&scene.surface),
            RendererState::Stopped => None,
        }
    }

    #[must_use]
    pub fn input(&self) -> Option<&SkyInput> {
        match &self.state {
            RendererState::Running(scene) => Some(&scene.input),
            RendererState::Stopped => None,
        }
    }

    #[must_use]
    pub fn population(&self) -> Option<&Population> {
        match &self.state {
            RendererState::Running(scene) => Some(&scene.population),
            RendererState::Stopped => None,
        }
    }

    fn build_population(&mut self, key: PopulationKey, size: (u32, u32)) -> Population {
        Population::build(key.flags, key.is_day, size, self.config.density, &mut self.rng)
    }
}
