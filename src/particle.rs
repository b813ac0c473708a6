// Motion component shared by drifting stars and shooting stars: a point
// with velocity and a fixed radius. Speed and heading are derived from the
// velocity vector, and setting one preserves the other.
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

impl Particle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            radius,
        }
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    // At rest the heading reads as atan2(0, 0) = 0, so the first set_speed
    // on a fresh particle points it east until a heading is assigned.
    pub fn set_speed(&mut self, speed: f32) {
        let heading = self.heading();
        self.vx = heading.cos() * speed;
        self.vy = heading.sin() * speed;
    }

    pub fn heading(&self) -> f32 {
        self.vy.atan2(self.vx)
    }

    pub fn set_heading(&mut self, heading: f32) {
        let speed = self.speed();
        self.vx = heading.cos() * speed;
        self.vy = heading.sin() * speed;
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }
}
