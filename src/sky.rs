use crate::particle::Particle;
use crate::surface::{Rgb, Surface};

// The whole sky drifts along one compass bearing so the layers read as
// parallax bands rather than independent swarms.
const DRIFT_ANGLE_DEG: f32 = 145.0;

// Shooting star tuning
const SHOOTING_SPEED_MIN: f32 = 15.0;
const SHOOTING_SPEED_MAX: f32 = 20.0;
const OPACITY_DELTA: f32 = 0.01; // per tick, fade-in and fade-out
const TRAIL_DELTA: f32 = 0.01; // per tick
const SPAWN_INTERVAL: f32 = 5.0; // seconds between spawns
const STEADY_LIFETIME: f32 = 0.5; // seconds at full opacity before fading
const MAX_TRAIL_LENGTH: f32 = 300.0;
const SHOOTING_STAR_RADIUS: f32 = 3.0;

const STAR_BASE_RADIUS: f32 = 2.0;

const STAR_COLOR: Rgb = (255, 221, 157);
const SHOOTING_STAR_COLOR: Rgb = (255, 255, 255);
const TRAIL_COLOR: Rgb = (255, 221, 157);
const DEFAULT_BG: Rgb = (40, 42, 58); // #282A3A

// Slow/small/numerous in back, fast/large/sparse in front.
const LAYERS: [Layer; 3] = [
    Layer {
        speed: 0.0175,
        scale: 0.25,
        count: 350,
    },
    Layer {
        speed: 0.03,
        scale: 0.55,
        count: 50,
    },
    Layer {
        speed: 0.05,
        scale: 0.75,
        count: 35,
    },
];

#[derive(Clone, Copy)]
struct Layer {
    speed: f32,
    scale: f32,
    count: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Phase {
    Spawning,
    Steady,
    Dying,
    Dead,
}

// A shooting star is a particle plus fade state: opacity ramps up while
// spawning, holds through the steady window, then ramps back down once the
// scheduled dying deadline passes. The trail keeps growing the whole time.
struct ShootingStar {
    motion: Particle,
    opacity: f32,
    trail: f32,
    phase: Phase,
    dying_at: Option<f32>,
}

impl ShootingStar {
    fn new(x: f32, y: f32) -> Self {
        Self {
            motion: Particle::new(x, y, SHOOTING_STAR_RADIUS),
            opacity: 0.0,
            trail: 0.0,
            phase: Phase::Spawning,
            dying_at: None,
        }
    }
}

pub struct SkyField {
    width: f32,
    height: f32,
    bg: Rgb,
    paused: bool,
    time: f32,
    next_spawn: Option<f32>,
    layers: Vec<Layer>,
    stars: Vec<Particle>,
    shooting_stars: Vec<ShootingStar>,
    surface: Surface,
}

impl SkyField {
    pub fn new(width: usize, height: usize, bg: Option<Rgb>) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            bg: bg.unwrap_or(DEFAULT_BG),
            paused: true,
            time: 0.0,
            next_spawn: None,
            layers: LAYERS.to_vec(),
            stars: Vec::new(),
            shooting_stars: Vec::new(),
            surface: Surface::new(width, height),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // Begin or resume animating at the given viewport size. The drift
    // layers are reseeded from scratch on every call; shooting stars
    // already in flight are left alone and carry across a hide()/start()
    // cycle.
    pub fn start(&mut self, width: usize, height: usize) {
        self.width = width as f32;
        self.height = height as f32;
        self.surface.resize(width, height);
        self.paused = false;

        self.stars.clear();
        for layer in &self.layers {
            for _ in 0..layer.count {
                let mut star = Particle::new(
                    random_range(0.0, self.width),
                    random_range(0.0, self.height),
                    STAR_BASE_RADIUS * layer.scale,
                );
                star.set_speed(layer.speed);
                star.set_heading(DRIFT_ANGLE_DEG.to_radians());
                self.stars.push(star);
            }
        }

        // Re-arm rather than stack: repeated starts keep a single spawn
        // cadence.
        self.next_spawn = Some(self.time + SPAWN_INTERVAL);
    }

    // Pause and blank the output. Nothing is torn down; update() keeps
    // running cheaply and start() resumes where the field left off.
    pub fn hide(&mut self) {
        self.paused = true;
        self.surface.clear();
    }

    // Full teardown: stops the spawn timer, cancels every pending dying
    // deadline, and drops both populations.
    pub fn dispose(&mut self) {
        self.paused = true;
        self.next_spawn = None;
        self.stars.clear();
        self.shooting_stars.clear();
        self.surface.clear();
    }

    // One animation tick. The clock and both timers always advance;
    // simulation and drawing only happen while running.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        // Rebase the clock to keep f32 precision over long sessions.
        if self.time > 10000.0 {
            self.time -= 10000.0;
            if let Some(at) = &mut self.next_spawn {
                *at -= 10000.0;
            }
            for star in &mut self.shooting_stars {
                if let Some(at) = &mut star.dying_at {
                    *at -= 10000.0;
                }
            }
        }

        // The spawn timer keeps its cadence while paused but only emits
        // while running.
        if let Some(at) = self.next_spawn {
            if self.time >= at {
                if !self.paused {
                    self.spawn_shooting_star();
                }
                self.next_spawn = Some(self.time + SPAWN_INTERVAL);
            }
        }

        // Dying deadlines fire on the clock regardless of pause; they only
        // flip the phase.
        for star in &mut self.shooting_stars {
            if star.phase == Phase::Steady {
                if let Some(at) = star.dying_at {
                    if self.time >= at {
                        star.phase = Phase::Dying;
                        star.dying_at = None;
                    }
                }
            }
        }

        if self.paused {
            return;
        }

        self.surface.fill(self.bg);

        // Advance and draw the drift layers, wrapping to the opposite edge
        // after drawing so the field reads as endless.
        for star in &mut self.stars {
            star.update();
            self.surface
                .fill_circle(star.x, star.y, star.radius, STAR_COLOR, 1.0);
            if star.x > self.width {
                star.x = 0.0;
            }
            if star.x < 0.0 {
                star.x = self.width;
            }
            if star.y > self.height {
                star.y = 0.0;
            }
            if star.y < 0.0 {
                star.y = self.height;
            }
        }

        // Advance and draw shooting stars.
        for star in &mut self.shooting_stars {
            match star.phase {
                Phase::Spawning => {
                    star.opacity += OPACITY_DELTA;
                    if star.opacity >= 1.0 {
                        star.phase = Phase::Steady;
                        star.dying_at = Some(self.time + STEADY_LIFETIME);
                    }
                }
                Phase::Dying => {
                    star.opacity -= OPACITY_DELTA;
                    if star.opacity <= 0.0 {
                        star.phase = Phase::Dead;
                    }
                }
                Phase::Steady | Phase::Dead => {}
            }

            star.trail += TRAIL_DELTA;
            star.motion.update();

            if star.opacity > 0.0 {
                draw_shooting_star(&mut self.surface, star);
            }
        }

        // Sweep only after the draw pass so a star that died this tick
        // still got its final frame.
        self.shooting_stars.retain(|star| star.phase != Phase::Dead);
    }

    fn spawn_shooting_star(&mut self) {
        let mut star = ShootingStar::new(
            random_range(self.width / 2.0, self.width),
            random_range(0.0, self.height / 2.0),
        );
        star.motion
            .set_speed(random_range(SHOOTING_SPEED_MIN, SHOOTING_SPEED_MAX));
        star.motion.set_heading(DRIFT_ANGLE_DEG.to_radians());
        self.shooting_stars.push(star);
    }
}

fn draw_shooting_star(surface: &mut Surface, star: &ShootingStar) {
    let x = star.motion.x;
    let y = star.motion.y;
    let alpha = star.opacity.min(1.0);
    let len = 5.0;

    // Eight-pointed head glyph.
    surface.fill_polygon(
        &[
            (x - 1.0, y + 1.0),
            (x, y + len),
            (x + 1.0, y + 1.0),
            (x + len, y),
            (x + 1.0, y - 1.0),
            (x, y + 1.0),
            (x, y - len),
            (x - 1.0, y - 1.0),
            (x - len, y),
            (x - 1.0, y + 1.0),
            (x - len, y),
        ],
        SHOOTING_STAR_COLOR,
        alpha,
    );

    // Trail: a sliver reaching back along the negative heading, growing
    // toward the full trail length as the star ages.
    let (tx, ty) = line_to_angle(x, y, -(MAX_TRAIL_LENGTH * star.trail), star.motion.heading());
    surface.fill_polygon(
        &[(x - 1.0, y - 1.0), (tx, ty), (x + 1.0, y + 1.0)],
        TRAIL_COLOR,
        alpha,
    );
}

fn line_to_angle(x: f32, y: f32, length: f32, radians: f32) -> (f32, f32) {
    (x + length * radians.cos(), y + length * radians.sin())
}

fn random_range(min: f32, max: f32) -> f32 {
    min + fastrand::f32() * (max - min)
}
