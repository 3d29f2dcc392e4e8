use serde::{Deserialize, Serialize};

/// Plain 3-component vector used by the CPU world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Point-mass rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec3,
    pub vel: Vec3,
    pub mass: f32,
}

impl Body {
    #[must_use]
    pub fn at(pos: Vec3, mass: f32) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            mass,
        }
    }
}

/// Deterministic point-mass world stepped with semi-implicit Euler:
/// velocities integrate first, then positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub gravity: Vec3,
    pub timestep: f32,
    pub bodies: Vec<Body>,
}

impl World {
    #[must_use]
    pub fn new(gravity: Vec3, timestep: f32) -> Self {
        Self {
            gravity,
            timestep,
            bodies: Vec::new(),
        }
    }

    /// Add a body and return its index.
    pub fn add_body(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Advance every body by one timestep under gravity plus the supplied
    /// per-body external forces. Missing entries mean no force.
    pub fn step(&mut self, forces: &[Vec3]) {
        let dt = self.timestep;
        for (index, body) in self.bodies.iter_mut().enumerate() {
            let force = forces.get(index).copied().unwrap_or(Vec3::ZERO);
            let accel = self.gravity + force * (1.0 / body.mass);
            body.vel = body.vel + accel * dt;
            body.pos = body.pos + body.vel * dt;
        }
    }
}
