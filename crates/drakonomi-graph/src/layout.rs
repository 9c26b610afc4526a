//! Force-directed layout engine.
//!
//! Drives an iterative physics simulation over the current graph
//! snapshot: pairwise charge repulsion, a weak pull toward the origin,
//! attraction along edges, and collision separation. The simulation is
//! frame-driven and budgeted: a reheat runs a fixed warmup synchronously,
//! then settles one tick per frame until the cooldown budget or the
//! alpha floor is reached, after which it goes idle and costs nothing.
//!
//! Body state (position/velocity/pin) lives in an arena keyed by
//! [`DragonId`] and survives snapshot swaps: a body is seeded exactly
//! once, the first time its id is seen. The engine is the sole writer of
//! unpinned positions; the interaction layer writes positions only
//! through the documented drag/pin path.

use crate::similarity::GraphSnapshot;
use crate::Vec2;
use drakonomi_core::DragonId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;

/// All simulation tuning in one explicit struct; no ambient globals.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Many-body charge; strongly negative so nodes push apart.
    pub charge_strength: f32,
    /// Effective distance floor for the charge force, bounding the force
    /// near coincident nodes.
    pub charge_min_distance: f32,
    /// Beyond this distance the charge force is skipped entirely.
    pub charge_max_distance: f32,
    /// Weak pull toward the origin on both axes, preventing drift.
    pub center_strength: f32,
    /// Base link rest length; the per-edge rest length is
    /// `link_distance / (weight * 2)`, so stronger pairs sit closer.
    pub link_distance: f32,
    /// Base link pull; the per-edge strength is `link_strength * weight`.
    pub link_strength: f32,
    /// Padding added to each node radius for collision separation.
    pub collision_padding: f32,
    /// Fraction of each overlap corrected per pass; near 1 so bubbles do
    /// not visually overlap.
    pub collision_strength: f32,
    /// Collision passes per tick.
    pub collision_iterations: usize,
    /// Velocity retained per tick is `1 - velocity_decay`.
    pub velocity_decay: f32,
    /// Cooling rate of the simulation temperature.
    pub alpha_decay: f32,
    /// Temperature floor; below it the simulation is considered settled.
    pub alpha_min: f32,
    /// Ticks run synchronously on reheat before frame-driven settling.
    pub warmup_ticks: u32,
    /// Frame-driven tick budget after warmup.
    pub cooldown_ticks: u32,
    /// Scatter annulus for newly seen bodies.
    pub seed_radius_min: f32,
    pub seed_radius_max: f32,
    /// Optional hard containment radius; off by default.
    pub boundary_radius: Option<f32>,
    /// Fixed RNG seed for reproducible layouts (tests); `None` seeds from
    /// entropy.
    pub rng_seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            charge_strength: -3000.0,
            charge_min_distance: 50.0,
            charge_max_distance: 2000.0,
            center_strength: 0.08,
            link_distance: 120.0,
            link_strength: 0.35,
            collision_padding: 15.0,
            collision_strength: 0.95,
            collision_iterations: 2,
            velocity_decay: 0.4,
            alpha_decay: 0.08,
            alpha_min: 0.001,
            warmup_ticks: 30,
            cooldown_ticks: 40,
            seed_radius_min: 50.0,
            seed_radius_max: 250.0,
            boundary_radius: None,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    /// No graph delivered yet.
    Seeding,
    /// Synchronous warmup inside a reheat.
    Warming,
    /// Frame-driven ticking against the cooldown budget.
    Settling,
    /// Converged or budget exhausted; ticks are free.
    Idle,
}

/// Mutable physics state of one node, owned by the engine.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Set on drag release; a pinned body holds this position but still
    /// exerts forces on its neighbors. Never cleared automatically.
    pub pinned: Option<Vec2>,
}

impl Body {
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    a: usize,
    b: usize,
    rest: f32,
    strength: f32,
}

pub struct ForceLayout {
    config: LayoutConfig,
    bodies: HashMap<DragonId, Body>,
    /// Ids of the current snapshot, in snapshot order; force passes
    /// iterate this so results are deterministic.
    order: Vec<DragonId>,
    radii: Vec<f32>,
    links: Vec<Link>,
    alpha: f32,
    cooldown_remaining: u32,
    phase: LayoutPhase,
    /// Node currently under a drag gesture; excluded from integration.
    held: Option<DragonId>,
    rng: StdRng,
}

impl ForceLayout {
    pub fn new(config: LayoutConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            bodies: HashMap::new(),
            order: Vec::new(),
            radii: Vec::new(),
            links: Vec::new(),
            alpha: 0.0,
            cooldown_remaining: 0,
            phase: LayoutPhase::Seeding,
            held: None,
            rng,
        }
    }

    /// Swap in a new graph snapshot. Bodies for ids seen before keep
    /// their position and velocity untouched; unseen ids are scattered
    /// once. A changed id set reheats the simulation; delivering the same
    /// id set (e.g. a rebuild caused by unrelated state) does not.
    pub fn set_graph(&mut self, snapshot: &GraphSnapshot) {
        let first_delivery = self.phase == LayoutPhase::Seeding;
        let new_order: Vec<DragonId> = snapshot.nodes.iter().map(|n| n.id).collect();
        let changed = {
            let old: HashSet<DragonId> = self.order.iter().copied().collect();
            let new: HashSet<DragonId> = new_order.iter().copied().collect();
            old != new
        };

        for node in &snapshot.nodes {
            if !self.bodies.contains_key(&node.id) {
                let position = self.scatter();
                self.bodies.insert(
                    node.id,
                    Body {
                        position,
                        velocity: Vec2::ZERO,
                        pinned: None,
                    },
                );
            }
        }

        let index: HashMap<DragonId, usize> = new_order
            .iter()
            .copied()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        self.radii = snapshot.nodes.iter().map(|n| n.radius).collect();
        let (link_distance, link_strength) = (self.config.link_distance, self.config.link_strength);
        self.links = snapshot
            .edges
            .iter()
            .filter_map(|edge| match (index.get(&edge.source), index.get(&edge.target)) {
                (Some(&a), Some(&b)) => Some(Link {
                    a,
                    b,
                    rest: link_distance / (edge.weight * 2.0),
                    strength: link_strength * edge.weight,
                }),
                _ => {
                    tracing::warn!(
                        source = %edge.source,
                        target = %edge.target,
                        "dropping edge with endpoint missing from snapshot"
                    );
                    None
                }
            })
            .collect();
        self.order = new_order;

        if changed || first_delivery {
            self.reheat();
        }
    }

    /// Restart the temperature and tick budgets: warmup runs here,
    /// settling continues one tick per [`Self::step_frame`].
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
        self.cooldown_remaining = self.config.cooldown_ticks;
        if self.order.is_empty() {
            self.phase = LayoutPhase::Idle;
            return;
        }

        self.phase = LayoutPhase::Warming;
        for _ in 0..self.config.warmup_ticks {
            self.tick();
            if self.alpha < self.config.alpha_min {
                break;
            }
        }
        self.phase = if self.alpha < self.config.alpha_min {
            LayoutPhase::Idle
        } else {
            LayoutPhase::Settling
        };
    }

    /// Advance the simulation by at most one tick; call once per frame.
    /// A no-op outside the settling phase, which is what makes the
    /// redraw-only path (selection/highlight changes) cheap.
    pub fn step_frame(&mut self) {
        if self.phase != LayoutPhase::Settling {
            return;
        }
        self.tick();
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
        if self.cooldown_remaining == 0 || self.alpha < self.config.alpha_min {
            self.phase = LayoutPhase::Idle;
        }
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn is_settling(&self) -> bool {
        self.phase == LayoutPhase::Settling
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn node_count(&self) -> usize {
        self.order.len()
    }

    pub fn position(&self, id: DragonId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.position)
    }

    pub fn body(&self, id: DragonId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn is_pinned(&self, id: DragonId) -> bool {
        self.bodies.get(&id).is_some_and(Body::is_pinned)
    }

    /// Positions of the current snapshot's nodes, in snapshot order.
    pub fn positions(&self) -> impl Iterator<Item = (DragonId, Vec2)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.bodies.get(id).map(|b| (*id, b.position)))
    }

    /// Hold a node at the pointer during a drag gesture. The engine skips
    /// integrating a held body; it still repels and attracts others.
    pub fn drag_to(&mut self, id: DragonId, position: Vec2) {
        let Some(body) = self.bodies.get_mut(&id) else {
            tracing::warn!(%id, "drag on unknown body");
            return;
        };
        body.position = position;
        body.velocity = Vec2::ZERO;
        if body.pinned.is_some() {
            body.pinned = Some(position);
        }
        self.held = Some(id);
    }

    /// End the drag gesture, pinning the node where it was dropped.
    pub fn release_drag(&mut self) {
        if let Some(id) = self.held.take() {
            if let Some(body) = self.bodies.get_mut(&id) {
                body.pinned = Some(body.position);
                body.velocity = Vec2::ZERO;
            }
        }
    }

    pub fn pin(&mut self, id: DragonId, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
            body.velocity = Vec2::ZERO;
            body.pinned = Some(position);
        }
    }

    /// Release a pin. Does not reheat on its own; callers decide whether
    /// the freed node warrants one.
    pub fn unpin(&mut self, id: DragonId) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.pinned = None;
        }
    }

    fn scatter(&mut self) -> Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        let radius = self
            .rng
            .gen_range(self.config.seed_radius_min..self.config.seed_radius_max);
        Vec2::new(angle.cos(), angle.sin()) * radius
    }

    /// Tiny symmetric random offset to break exact coincidence.
    fn jiggle(&mut self) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * 1e-6
    }

    fn tick(&mut self) {
        let n = self.order.len();
        if n == 0 {
            return;
        }

        self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;

        let mut positions = Vec::with_capacity(n);
        let mut velocities = Vec::with_capacity(n);
        let mut movable = Vec::with_capacity(n);
        for id in &self.order {
            let body = &self.bodies[id];
            positions.push(body.position);
            velocities.push(body.velocity);
            movable.push(body.pinned.is_none() && self.held != Some(*id));
        }

        self.apply_charge(&positions, &mut velocities);
        self.apply_centering(&positions, &mut velocities);
        self.apply_links(&positions, &mut velocities);

        for i in 0..n {
            if !movable[i] {
                velocities[i] = Vec2::ZERO;
                continue;
            }
            velocities[i] = velocities[i] * (1.0 - self.config.velocity_decay);
            positions[i] += velocities[i];
        }

        self.apply_collisions(&mut positions, &movable);

        if let Some(boundary) = self.config.boundary_radius {
            clamp_to_boundary(&mut positions, &mut velocities, &movable, boundary);
        }

        for (i, id) in self.order.iter().enumerate() {
            if let Some(body) = self.bodies.get_mut(id) {
                if movable[i] {
                    body.position = positions[i];
                    body.velocity = velocities[i];
                } else {
                    body.velocity = Vec2::ZERO;
                    if let Some(pinned) = body.pinned {
                        body.position = pinned;
                    }
                }
            }
        }
    }

    fn apply_charge(&mut self, positions: &[Vec2], velocities: &mut [Vec2]) {
        let min_sq = self.config.charge_min_distance * self.config.charge_min_distance;
        let max_sq = self.config.charge_max_distance * self.config.charge_max_distance;

        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let mut delta = positions[i] - positions[j];
                if delta == Vec2::ZERO {
                    delta = Vec2::new(self.jiggle(), self.jiggle());
                }
                let dist_sq = delta.length_sq();
                if dist_sq > max_sq {
                    continue;
                }
                let dist_sq = dist_sq.max(min_sq);
                // charge_strength is negative: the push separates the pair.
                let push = delta * (-self.config.charge_strength * self.alpha / dist_sq);
                velocities[i] += push;
                velocities[j] -= push;
            }
        }
    }

    fn apply_centering(&self, positions: &[Vec2], velocities: &mut [Vec2]) {
        let pull = self.config.center_strength * self.alpha;
        for i in 0..positions.len() {
            velocities[i] += -positions[i] * pull;
        }
    }

    fn apply_links(&mut self, positions: &[Vec2], velocities: &mut [Vec2]) {
        for k in 0..self.links.len() {
            let link = self.links[k];
            let mut delta = positions[link.b] - positions[link.a];
            if delta == Vec2::ZERO {
                delta = Vec2::new(self.jiggle(), self.jiggle());
            }
            let dist = delta.length();
            let adjust = delta * ((dist - link.rest) / dist * self.alpha * link.strength);
            // Split evenly between the endpoints.
            velocities[link.b] -= adjust * 0.5;
            velocities[link.a] += adjust * 0.5;
        }
    }

    fn apply_collisions(&mut self, positions: &mut [Vec2], movable: &[bool]) {
        for _ in 0..self.config.collision_iterations {
            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    let ri = self.radii[i] + self.config.collision_padding;
                    let rj = self.radii[j] + self.config.collision_padding;
                    let min_dist = ri + rj;

                    let mut delta = positions[j] - positions[i];
                    let mut dist = delta.length();
                    if dist >= min_dist {
                        continue;
                    }
                    if dist <= f32::EPSILON {
                        delta = Vec2::new(self.jiggle(), self.jiggle());
                        dist = delta.length();
                    }

                    let correction = delta * ((min_dist - dist) / dist * self.config.collision_strength);
                    // The smaller bubble yields more, like mass-weighted
                    // separation.
                    let wi = rj * rj / (ri * ri + rj * rj);
                    match (movable[i], movable[j]) {
                        (true, true) => {
                            positions[i] -= correction * wi;
                            positions[j] += correction * (1.0 - wi);
                        }
                        (true, false) => positions[i] -= correction,
                        (false, true) => positions[j] += correction,
                        (false, false) => {}
                    }
                }
            }
        }
    }
}

/// Hard radial containment: clamp positions to the boundary circle and
/// damp the velocity of anything that hits it.
fn clamp_to_boundary(
    positions: &mut [Vec2],
    velocities: &mut [Vec2],
    movable: &[bool],
    max_radius: f32,
) {
    for i in 0..positions.len() {
        if !movable[i] {
            continue;
        }
        let dist = positions[i].length();
        if dist > max_radius {
            positions[i] = positions[i] * (max_radius / dist);
            velocities[i] = velocities[i] * 0.5;
        }
    }
}
