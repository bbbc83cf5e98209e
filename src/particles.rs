//! Particle burst emitter.
//!
//! One call to [`ParticleEmitter::trigger_explosion`] produces a batch of
//! [`PARTICLES_PER_BURST`] particles radiating from the click point. The batch
//! replaces whatever batch is on screen and is emptied by a deferred clear
//! [`BURST_LIFETIME_MS`] later. Motion itself is CSS-driven (see
//! [`KEYFRAMES_CSS`]); Rust only samples the per-particle parameters.

use rand::Rng;
use std::f64::consts::TAU;

pub const PARTICLES_PER_BURST: usize = 30;
pub const BURST_LIFETIME_MS: u32 = 4000;

pub const ANGLE_JITTER_RAD: f64 = 0.25;
pub const DISTANCE_MIN: f64 = 120.0;
pub const DISTANCE_MAX: f64 = 300.0;
pub const LIFT_MIN: f64 = 40.0;
pub const LIFT_MAX: f64 = 120.0;
pub const DELAY_MAX_MS: f64 = 200.0;

pub const COLOR_PALETTE: &[&str] = &[
    "#ffffff", "#ffdd44", "#ff4444", "#44ff44", "#4444ff", "#ff44ff",
];
pub const EMOJI_PALETTE: &[&str] = &["💥", "✨", "🔥", "⭐", "💫", "🎉"];

/// Cosmetic variant of the burst.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ParticleStyle {
    #[default]
    ColorDot,
    EmojiGlyph,
}

impl ParticleStyle {
    pub fn palette(self) -> &'static [&'static str] {
        match self {
            ParticleStyle::ColorDot => COLOR_PALETTE,
            ParticleStyle::EmojiGlyph => EMOJI_PALETTE,
        }
    }

    /// Half-open size range in px (dot diameter or emoji font size).
    pub fn size_range(self) -> (f64, f64) {
        match self {
            ParticleStyle::ColorDot => (4.0, 12.0),
            ParticleStyle::EmojiGlyph => (20.0, 40.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleLook {
    Color(&'static str),
    Glyph(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub look: ParticleLook,
    pub size: f64,
    pub delay_ms: f64,
    /// Sampled radial distance, kept for inspection.
    pub distance: f64,
    /// Sampled upward bias subtracted from `dy`.
    pub lift: f64,
}

impl Particle {
    /// Inline style for the particle element; the shared animation lives in
    /// the `.cs-particle` class.
    pub fn style_css(&self) -> String {
        let half = self.size / 2.0;
        let mut css = format!(
            "left:{}px; top:{}px; animation-delay:{}ms; --dx:{}px; --dy:{}px;",
            self.x - half,
            self.y - half,
            self.delay_ms,
            self.dx,
            self.dy
        );
        match self.look {
            ParticleLook::Color(color) => css.push_str(&format!(
                " width:{s}px; height:{s}px; background-color:{color}; box-shadow:0 0 {g}px {color};",
                s = self.size,
                g = self.size * 2.0
            )),
            ParticleLook::Glyph(_) => css.push_str(&format!(
                " font-size:{s}px; line-height:{s}px; width:{s}px; height:{s}px;",
                s = self.size
            )),
        }
        css
    }

    pub fn text(&self) -> Option<&'static str> {
        match self.look {
            ParticleLook::Glyph(g) => Some(g),
            ParticleLook::Color(_) => None,
        }
    }
}

/// Build one burst around `(x, y)`. Ids start at `first_id`.
pub fn spawn_burst<R: Rng + ?Sized>(
    x: f64,
    y: f64,
    style: ParticleStyle,
    first_id: u64,
    rng: &mut R,
) -> Vec<Particle> {
    let palette = style.palette();
    let (size_min, size_max) = style.size_range();
    (0..PARTICLES_PER_BURST)
        .map(|i| {
            let angle = TAU * i as f64 / PARTICLES_PER_BURST as f64
                + rng.gen_range(-ANGLE_JITTER_RAD..ANGLE_JITTER_RAD);
            let distance = rng.gen_range(DISTANCE_MIN..DISTANCE_MAX);
            let lift = rng.gen_range(LIFT_MIN..LIFT_MAX);
            let pick = palette[rng.gen_range(0..palette.len())];
            let look = match style {
                ParticleStyle::ColorDot => ParticleLook::Color(pick),
                ParticleStyle::EmojiGlyph => ParticleLook::Glyph(pick),
            };
            Particle {
                id: first_id + i as u64,
                x,
                y,
                dx: angle.cos() * distance,
                dy: angle.sin() * distance - lift,
                look,
                size: rng.gen_range(size_min..size_max),
                delay_ms: rng.gen_range(0.0..DELAY_MAX_MS),
                distance,
                lift,
            }
        })
        .collect()
}

/// Owner of the single on-screen batch.
#[derive(Debug, Default)]
pub struct ParticleEmitter {
    style: ParticleStyle,
    batch: Vec<Particle>,
    generation: u64,
    next_id: u64,
}

impl ParticleEmitter {
    pub fn new(style: ParticleStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Replace the current batch with a fresh burst at `(x, y)`. Returns the
    /// batch generation the caller should attach to its deferred clear.
    pub fn trigger_explosion<R: Rng + ?Sized>(&mut self, x: f64, y: f64, rng: &mut R) -> u64 {
        tracing::debug!(x, y, "creating particle burst");
        self.batch = spawn_burst(x, y, self.style, self.next_id, rng);
        self.next_id += PARTICLES_PER_BURST as u64;
        self.generation += 1;
        self.generation
    }

    /// Empty the batch regardless of which burst it holds.
    pub fn clear(&mut self) {
        self.batch.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.batch
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn style(&self) -> ParticleStyle {
        self.style
    }
}

pub const KEYFRAMES_CSS: &str = r#"
.cs-particle {
  position: fixed;
  border-radius: 50%;
  pointer-events: none;
  z-index: 2;
  text-align: center;
  animation:
    particle-move 3s cubic-bezier(0.165, 0.84, 0.44, 1) forwards,
    particle-fade 3s ease-out forwards;
}
@keyframes particle-move {
  0% { transform: translate(0, 0) scale(1) rotate(0deg); }
  50% { transform: translate(calc(var(--dx) * 0.7), calc(var(--dy) * 0.6)) scale(0.8) rotate(180deg); }
  100% { transform: translate(var(--dx), calc(var(--dy) + 60px)) scale(0.3) rotate(360deg); }
}
@keyframes particle-fade {
  0% { opacity: 1; filter: brightness(1.2); }
  60% { opacity: 0.8; filter: brightness(1); }
  100% { opacity: 0; filter: brightness(0.5); }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_burst_has_fixed_size_and_shared_origin() {
        let mut rng = StdRng::seed_from_u64(7);
        let burst = spawn_burst(100.0, 200.0, ParticleStyle::ColorDot, 0, &mut rng);
        assert_eq!(burst.len(), PARTICLES_PER_BURST);
        for p in &burst {
            assert_eq!((p.x, p.y), (100.0, 200.0));
            assert!((DISTANCE_MIN..DISTANCE_MAX).contains(&p.distance));
            assert!((LIFT_MIN..LIFT_MAX).contains(&p.lift));
            assert!((0.0..DELAY_MAX_MS).contains(&p.delay_ms));
            assert!((4.0..12.0).contains(&p.size));
            assert!(matches!(p.look, ParticleLook::Color(c) if COLOR_PALETTE.contains(&c)));
        }
    }

    #[test]
    fn test_displacement_follows_angle_and_lift() {
        let mut rng = StdRng::seed_from_u64(11);
        let burst = spawn_burst(0.0, 0.0, ParticleStyle::ColorDot, 0, &mut rng);
        for (i, p) in burst.iter().enumerate() {
            // Undo the lift; what remains lies on a circle of radius `distance`
            // whose angle is within jitter of the slot angle.
            let (dx, dy) = (p.dx, p.dy + p.lift);
            assert!(((dx * dx + dy * dy).sqrt() - p.distance).abs() < 1e-6);
            let slot = TAU * i as f64 / PARTICLES_PER_BURST as f64;
            let mut diff = dy.atan2(dx) - slot;
            while diff > std::f64::consts::PI {
                diff -= TAU;
            }
            while diff < -std::f64::consts::PI {
                diff += TAU;
            }
            assert!(diff.abs() <= ANGLE_JITTER_RAD + 1e-9, "particle {i} off slot by {diff}");
        }
    }

    #[test]
    fn test_emoji_style_uses_glyphs() {
        let mut rng = StdRng::seed_from_u64(3);
        let burst = spawn_burst(5.0, 5.0, ParticleStyle::EmojiGlyph, 0, &mut rng);
        for p in &burst {
            assert!(p.text().is_some_and(|g| EMOJI_PALETTE.contains(&g)));
            assert!((20.0..40.0).contains(&p.size));
            assert!(p.style_css().contains("font-size"));
        }
    }

    #[test]
    fn test_new_explosion_replaces_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut emitter = ParticleEmitter::new(ParticleStyle::ColorDot);
        let g1 = emitter.trigger_explosion(10.0, 10.0, &mut rng);
        let first_ids: Vec<u64> = emitter.particles().iter().map(|p| p.id).collect();
        let g2 = emitter.trigger_explosion(50.0, 60.0, &mut rng);
        assert!(g2 > g1);
        assert_eq!(emitter.particles().len(), PARTICLES_PER_BURST);
        assert!(emitter.particles().iter().all(|p| (p.x, p.y) == (50.0, 60.0)));
        assert!(emitter.particles().iter().all(|p| !first_ids.contains(&p.id)));
        emitter.clear();
        assert!(emitter.particles().is_empty());
    }

    #[test]
    fn test_color_style_css_centres_dot() {
        let p = Particle {
            id: 0,
            x: 100.0,
            y: 50.0,
            dx: 1.5,
            dy: -2.0,
            look: ParticleLook::Color("#ff4444"),
            size: 8.0,
            delay_ms: 20.0,
            distance: 150.0,
            lift: 50.0,
        };
        let css = p.style_css();
        assert!(css.contains("left:96px"));
        assert!(css.contains("top:46px"));
        assert!(css.contains("--dx:1.5px"));
        assert!(css.contains("box-shadow:0 0 16px #ff4444"));
        assert!(p.text().is_none());
    }
}
