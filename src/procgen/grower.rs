//! Branch growth - rings, connections, caps and forks
//!
//! Growth runs as an explicit work list instead of recursion. Each `Grow` task
//! emits one ring; a non-terminal ring pushes a `Fork` check for itself and then
//! its continuation on top, so the whole continuation subtree (including any
//! deeper forks) drains before the fork check at this level draws from the
//! stream. That ordering fixes the draw sequence the output depends on.
//!
//! The vertex budget is the length of the shared mesh buffers: every task sees
//! the count left behind by everything grown before it.

use std::f32::consts::TAU;

use crate::core::types::{Quat, Vec2, Vec3};
use crate::material::MaterialResolver;
use crate::mesh::{LeafPool, MeshBuffers};
use crate::procgen::params::TreeParameters;
use crate::procgen::ring::RingShape;
use crate::procgen::rng::RandomStream;

/// V texture coordinate advance per unit of `segment_length + segment_length / radius`
const TEX_V_STEP: f32 = 0.0625;

/// Half-width of the random part of a fork angle, in degrees
const FORK_SPREAD: f32 = 35.0;

/// Minimum deflection of a fork away from its parent, in degrees
const FORK_MIN_ANGLE: f32 = 10.0;

/// State carried from one ring to the next
#[derive(Debug, Clone, Copy)]
struct Segment {
    position: Vec3,
    orientation: Quat,
    /// First vertex of the ring this segment connects to
    prev_ring: Option<u32>,
    radius: f32,
    tex_v: f32,
}

#[derive(Debug)]
enum Task {
    Grow(Segment),
    /// Possible side branch sharing the parent ring; the segment holds the
    /// parent's orientation and the continuation's start state
    Fork(Segment),
}

/// Counters collected while growing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthStats {
    pub rings: u32,
    /// Side branches started
    pub forks: u32,
    /// Capped branch ends
    pub tips: u32,
    /// Leaves placed at tips
    pub leaves: u32,
    /// Largest work list length seen
    pub peak_pending: usize,
}

/// Apply a local bend of `x` degrees about X, then `z` degrees about Z
fn bend(orientation: Quat, x_degrees: f32, z_degrees: f32) -> Quat {
    (orientation
        * Quat::from_rotation_x(x_degrees.to_radians())
        * Quat::from_rotation_z(z_degrees.to_radians()))
    .normalize()
}

/// Fork angle with magnitude in [FORK_MIN_ANGLE, FORK_MIN_ANGLE + FORK_SPREAD)
fn fork_angle(rng: &mut RandomStream) -> f32 {
    let a = rng.uniform() * FORK_SPREAD * 2.0 - FORK_SPREAD;
    if a > 0.0 { a + FORK_MIN_ANGLE } else { a - FORK_MIN_ANGLE }
}

/// Grows one tree into the given buffers and leaf pool
pub struct BranchGrower<'a> {
    params: &'a TreeParameters,
    shape: &'a RingShape,
    buffers: &'a mut MeshBuffers,
    leaves: &'a mut LeafPool,
    materials: &'a dyn MaterialResolver,
    rng: &'a mut RandomStream,
    stats: GrowthStats,
}

impl<'a> BranchGrower<'a> {
    /// `shape` must have been built for `params.num_sides`
    pub fn new(
        params: &'a TreeParameters,
        shape: &'a RingShape,
        buffers: &'a mut MeshBuffers,
        leaves: &'a mut LeafPool,
        materials: &'a dyn MaterialResolver,
        rng: &'a mut RandomStream,
    ) -> Self {
        debug_assert_eq!(shape.num_sides(), params.num_sides as usize);
        Self {
            params,
            shape,
            buffers,
            leaves,
            materials,
            rng,
            stats: GrowthStats::default(),
        }
    }

    /// Grow from the trunk base at the origin, pointing up local Y
    pub fn grow(mut self) -> GrowthStats {
        let mut pending = vec![Task::Grow(Segment {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            prev_ring: None,
            radius: self.params.trunk_radius,
            tex_v: 0.0,
        })];

        while let Some(task) = pending.pop() {
            match task {
                Task::Grow(segment) => self.grow_segment(segment, &mut pending),
                Task::Fork(origin) => self.try_fork(origin, &mut pending),
            }
            self.stats.peak_pending = self.stats.peak_pending.max(pending.len());
        }

        self.stats
    }

    /// Whether one more ring stays within the vertex budget
    fn ring_fits(&self) -> bool {
        self.buffers.vertex_count() + (self.params.num_sides as usize)
            < self.params.max_vertices as usize
    }

    fn grow_segment(&mut self, segment: Segment, pending: &mut Vec<Task>) {
        let sides = self.params.num_sides;
        let step_u = 1.0 / sides as f32;
        let ring_start = self.emit_ring(&segment, step_u);

        if let Some(prev) = segment.prev_ring {
            for i in 0..sides {
                let p = prev + i;
                let c = ring_start + i;
                self.buffers.push_triangle(p + 1, p, c);
                self.buffers.push_triangle(c, c + 1, p + 1);
            }
        }

        let radius = segment.radius * self.params.radius_step;
        if radius < self.params.branch_tip_radius || !self.ring_fits() {
            self.cap(&segment, ring_start, step_u);
            return;
        }

        let length = self.params.segment_length;
        let twist = self.params.twist;
        let x = (self.rng.uniform() - 0.5) * twist;
        let z = (self.rng.uniform() - 0.5) * twist;

        let next = Segment {
            position: segment.position + segment.orientation * Vec3::new(0.0, length, 0.0),
            orientation: bend(segment.orientation, x, z),
            prev_ring: Some(ring_start),
            radius,
            tex_v: segment.tex_v + TEX_V_STEP * (length + length / radius),
        };

        pending.push(Task::Fork(Segment {
            orientation: segment.orientation,
            ..next
        }));
        pending.push(Task::Grow(next));
    }

    /// Emit `num_sides + 1` ring vertices, returning the first index
    fn emit_ring(&mut self, segment: &Segment, step_u: f32) -> u32 {
        let sides = self.params.num_sides as usize;
        let ring_start = self.buffers.vertex_count() as u32;
        for n in 0..=sides {
            let angle = TAU * step_u * n as f32;
            let r = self.shape.get(n) * segment.radius;
            let offset = Vec3::new(r * angle.cos(), 0.0, r * angle.sin());
            self.buffers.push_vertex(
                segment.position + segment.orientation * offset,
                Vec2::new(step_u * n as f32, segment.tex_v),
            );
        }
        self.stats.rings += 1;
        ring_start
    }

    /// Close the branch with a fan around its center and hang a leaf there
    fn cap(&mut self, segment: &Segment, ring_start: u32, step_u: f32) {
        let sides = self.params.num_sides;
        let last_u = step_u * (sides + 1) as f32;
        let center = self.buffers.push_vertex(
            segment.position,
            Vec2::new(last_u, segment.tex_v) + Vec2::ONE,
        );
        for n in ring_start..ring_start + sides {
            self.buffers.push_triangle(n, center, n + 1);
        }
        self.stats.tips += 1;

        let placed = self.leaves.grow_leaf(
            segment.position,
            self.params.max_leaves,
            self.rng,
            self.materials,
        );
        if placed.is_some() {
            self.stats.leaves += 1;
        }
    }

    fn try_fork(&mut self, origin: Segment, pending: &mut Vec<Task>) {
        // budget first: no draw is spent once the budget is gone
        if !self.ring_fits() || self.rng.uniform() >= self.params.branch_probability {
            return;
        }
        let x = fork_angle(self.rng);
        let z = fork_angle(self.rng);
        pending.push(Task::Grow(Segment {
            orientation: bend(origin.orientation, x, z),
            ..origin
        }));
        self.stats.forks += 1;
    }
}
