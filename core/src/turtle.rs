use glam::{Quat, Vec3};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result, StructuralError};

// Axis for `+` / `-`
const TURN_AXIS: Vec3 = Vec3::Z;
// Axis for `*` / `^`
const PITCH_AXIS: Vec3 = Vec3::X;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TurtleConfig {
    // Fixed rotation in degrees; absent or zero switches to the jittered range
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default)]
    pub min_angle: f32,
    #[serde(default)]
    pub max_angle: f32,
    pub distance: f32,
}

impl TurtleConfig {
    pub fn fixed(angle: f32, distance: f32) -> Self {
        Self {
            angle: Some(angle),
            min_angle: 0.0,
            max_angle: 0.0,
            distance,
        }
    }

    pub fn jittered(min_angle: f32, max_angle: f32, distance: f32) -> Self {
        Self {
            angle: None,
            min_angle,
            max_angle,
            distance,
        }
    }

    fn fixed_angle(&self) -> Option<f32> {
        self.angle.filter(|a| *a != 0.0)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(ConfigError::InvalidDistance(self.distance));
        }
        match self.fixed_angle() {
            Some(a) if !a.is_finite() => Err(ConfigError::InvalidAngleRange { min: a, max: a }),
            Some(_) => Ok(()),
            None => {
                let (min, max) = (self.min_angle, self.max_angle);
                if min.is_finite() && max.is_finite() && min <= max {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidAngleRange { min, max })
                }
            }
        }
    }

    // Rotation in degrees applied by the symbol at position `index`
    pub fn angle_at(&self, index: usize) -> f32 {
        match self.fixed_angle() {
            Some(a) => a,
            None => {
                let t = seeded_unit(seeded_unit(index as f64));
                (t * (self.max_angle - self.min_angle) as f64 + self.min_angle as f64) as f32
            }
        }
    }
}

// Sine hash into [0, 1); deterministic in `seed`, no RNG state
pub fn seeded_unit(seed: f64) -> f64 {
    let x = seed.sin() * 10000.0;
    x - x.floor()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurtleState {
    pub position: Vec3,
    pub direction: Vec3,
}

impl TurtleState {
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction,
        }
    }
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

// Line-segment buffers ready for a line renderer
// Each segment owns both endpoints; nothing is shared or deduplicated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantGeometry {
    pub branches: Vec<Segment>,
    pub leaves: Vec<Segment>,
}

impl PlantGeometry {
    pub fn branch_positions(&self) -> Vec<f32> {
        crate::utils::flatten_segments(&self.branches)
    }

    pub fn leaf_positions(&self) -> Vec<f32> {
        crate::utils::flatten_segments(&self.leaves)
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.leaves.is_empty()
    }
}

// Saved on `[`; `steps` is the forward count at the time of the push
#[derive(Debug, Clone, Copy)]
struct Frame {
    state: TurtleState,
    steps: usize,
}

struct Turtle<'a> {
    config: &'a TurtleConfig,
    state: TurtleState,
    stack: Vec<Frame>,
    geometry: PlantGeometry,
    // tip of the most recent `F`
    last_tip: Option<Vec3>,
    steps: usize,
    leaf_closed: bool,
    max_depth: usize,
}

impl<'a> Turtle<'a> {
    fn new(config: &'a TurtleConfig, start: TurtleState) -> Self {
        Self {
            config,
            state: start,
            stack: Vec::new(),
            geometry: PlantGeometry::default(),
            last_tip: None,
            steps: 0,
            leaf_closed: false,
            max_depth: 0,
        }
    }

    fn forward(&mut self) {
        let next = self.state.position + self.state.direction * self.config.distance;
        self.geometry
            .branches
            .push(Segment::new(self.state.position, next));
        self.state.position = next;
        self.last_tip = Some(next);
        self.steps += 1;
    }

    fn rotate(&mut self, axis: Vec3, degrees: f32) {
        // a zero direction has no roll axis
        if let Some(axis) = axis.try_normalize() {
            let q = Quat::from_axis_angle(axis, degrees.to_radians());
            self.state.direction = q * self.state.direction;
        }
    }

    fn push(&mut self) {
        self.stack.push(Frame {
            state: self.state,
            steps: self.steps,
        });
        self.max_depth = self.max_depth.max(self.stack.len());
        self.leaf_closed = false;
    }

    fn pop(&mut self, index: usize) -> std::result::Result<(), StructuralError> {
        let frame = self
            .stack
            .pop()
            .ok_or(StructuralError::UnbalancedClose { index })?;
        self.state = frame.state;

        if self.leaf_closed || self.steps == frame.steps {
            return Ok(());
        }
        // The tip of the branch just closed becomes foliage
        if let (Some(tip), Some(_)) = (self.last_tip, self.geometry.branches.pop()) {
            self.geometry
                .leaves
                .push(Segment::new(self.state.position, tip));
            self.leaf_closed = true;
        }
        Ok(())
    }

    fn step(&mut self, index: usize, symbol: char) -> std::result::Result<(), StructuralError> {
        match symbol {
            'F' => self.forward(),
            '+' => self.rotate(TURN_AXIS, self.config.angle_at(index)),
            '-' => self.rotate(TURN_AXIS, -self.config.angle_at(index)),
            '/' => self.rotate(self.state.direction, self.config.angle_at(index)),
            '\\' => self.rotate(self.state.direction, -self.config.angle_at(index)),
            '*' => self.rotate(PITCH_AXIS, self.config.angle_at(index)),
            '^' => self.rotate(PITCH_AXIS, -self.config.angle_at(index)),
            '[' => self.push(),
            ']' => self.pop(index)?,
            _ => {}
        }
        Ok(())
    }
}

// Walk `symbols` left to right and emit branch and leaf segments
// Fails on a `]` without a matching `[` and on any `[` still open at the end
pub fn interpret(symbols: &str, config: &TurtleConfig, start: TurtleState) -> Result<PlantGeometry> {
    config.validate()?;

    let mut turtle = Turtle::new(config, start);
    for (index, symbol) in symbols.chars().enumerate() {
        turtle.step(index, symbol)?;
    }

    if !turtle.stack.is_empty() {
        return Err(StructuralError::UnclosedBranch {
            depth: turtle.stack.len(),
        }
        .into());
    }

    debug!(
        symbols = symbols.len(),
        branches = turtle.geometry.branches.len(),
        leaves = turtle.geometry.leaves.len(),
        max_depth = turtle.max_depth,
        "turtle interpretation finished"
    );
    Ok(turtle.geometry)
}
