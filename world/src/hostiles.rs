//! Enemies, the boss and the projectiles they fire.

use std::time::Duration;

use glam::Vec2;
use snake_arcade_core::{
    CellCoord, Edge, EnemyConfig, EnemyId, EnemyKind, EnemyPattern, EnemySnapshot, Event,
    ProjectileId, ProjectileSnapshot,
};

const SWEEP_SAMPLES_PER_CELL: f32 = 8.0;

/// Parameters for a new enemy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EnemySpec {
    pub(crate) kind: EnemyKind,
    pub(crate) pattern: EnemyPattern,
    pub(crate) edge: Edge,
    pub(crate) offset: u32,
    pub(crate) health: u32,
    pub(crate) fire_interval: Duration,
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    spec: EnemySpec,
    sweep: i64,
    heading: i64,
    ticks_until_teleport: u32,
    position: Vec2,
    aim: Vec2,
    next_fire_at: Duration,
}

impl Enemy {
    fn new(id: EnemyId, spec: EnemySpec, now: Duration, teleport_every: u32) -> Self {
        Self {
            id,
            spec,
            sweep: 0,
            heading: 1,
            ticks_until_teleport: teleport_every.max(1),
            position: Vec2::ZERO,
            aim: Vec2::ZERO,
            next_fire_at: now.saturating_add(spec.fire_interval),
        }
    }

    fn relocate(&mut self, columns: u32, rows: u32) {
        let along = (i64::from(self.spec.offset) + self.sweep) as f32 + 0.5;
        let (width, height) = (columns as f32, rows as f32);
        self.position = match self.spec.edge {
            Edge::North => Vec2::new(along, -0.5),
            Edge::South => Vec2::new(along, height + 0.5),
            Edge::West => Vec2::new(-0.5, along),
            Edge::East => Vec2::new(width + 0.5, along),
        };
        let center = Vec2::new(width / 2.0, height / 2.0);
        self.aim = (center - self.position).normalize_or_zero();
    }

    fn step(&mut self, columns: u32, rows: u32, config: &EnemyConfig) {
        match self.spec.pattern {
            EnemyPattern::Stationary => {}
            EnemyPattern::Oscillating => {
                let range = i64::from(config.oscillation_range);
                let length = i64::from(self.spec.edge.length(columns, rows));
                let anchor = i64::from(self.spec.offset);
                let fits = |sweep: i64| sweep.abs() <= range && (0..length).contains(&(anchor + sweep));

                if !fits(self.sweep + self.heading) {
                    self.heading = -self.heading;
                }
                if fits(self.sweep + self.heading) {
                    self.sweep += self.heading;
                }
                self.relocate(columns, rows);
            }
            EnemyPattern::Teleporting => {
                self.ticks_until_teleport = self.ticks_until_teleport.saturating_sub(1);
                if self.ticks_until_teleport == 0 {
                    self.spec.edge = self.spec.edge.opposite();
                    self.ticks_until_teleport = config.teleport_every.max(1);
                    self.relocate(columns, rows);
                }
            }
        }
    }

    fn try_fire(&mut self, now: Duration) -> Option<Vec2> {
        if now < self.next_fire_at || self.aim == Vec2::ZERO {
            return None;
        }
        self.next_fire_at = now.saturating_add(self.spec.fire_interval);
        Some(self.position)
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.spec.kind,
            pattern: self.spec.pattern,
            edge: self.spec.edge,
            position: self.position,
            aim: self.aim,
            health: self.spec.health,
            next_fire_at: self.next_fire_at,
        }
    }
}

/// Projectile travelling in a straight line at a fixed speed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    owner: EnemyId,
    previous: Vec2,
    position: Vec2,
    velocity: Vec2,
}

impl Projectile {
    fn new(id: ProjectileId, owner: EnemyId, position: Vec2, velocity: Vec2) -> Self {
        Self {
            id,
            owner,
            previous: position,
            position,
            velocity,
        }
    }

    fn fly(&mut self) {
        self.previous = self.position;
        self.position += self.velocity;
    }

    /// Grid cells covered by the last move in travel order, starting cell
    /// included.
    pub(crate) fn swept_cells(&self, columns: u32, rows: u32) -> Vec<CellCoord> {
        let travel = self.position - self.previous;
        let samples = (travel.abs().max_element() * SWEEP_SAMPLES_PER_CELL)
            .ceil()
            .max(1.0) as u32;
        let mut cells: Vec<CellCoord> = Vec::new();
        for sample in 0..=samples {
            let point = self.previous + travel * (sample as f32 / samples as f32);
            if let Some(cell) = cell_under(point, columns, rows) {
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Reports whether the projectile left the grid expanded by one cell.
    pub(crate) fn is_spent(&self, columns: u32, rows: u32) -> bool {
        let Vec2 { x, y } = self.position;
        x < -1.0 || y < -1.0 || x >= columns as f32 + 1.0 || y >= rows as f32 + 1.0
    }

    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            owner: self.owner,
            position: self.position,
            velocity: self.velocity,
        }
    }
}

fn cell_under(point: Vec2, columns: u32, rows: u32) -> Option<CellCoord> {
    CellCoord::from_signed(point.x.floor() as i64, point.y.floor() as i64, columns, rows)
}

/// Registry that stores hostiles and manages identifier allocation.
#[derive(Clone, Debug, Default)]
pub(crate) struct Hostiles {
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    next_enemy_id: u32,
    next_projectile_id: u32,
}

impl Hostiles {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn drone_count(&self) -> u32 {
        let count = self
            .enemies
            .iter()
            .filter(|enemy| enemy.spec.kind == EnemyKind::Drone)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub(crate) fn has_boss(&self) -> bool {
        self.enemies
            .iter()
            .any(|enemy| enemy.spec.kind == EnemyKind::Boss)
    }

    pub(crate) fn spawn(
        &mut self,
        spec: EnemySpec,
        now: Duration,
        columns: u32,
        rows: u32,
        config: &EnemyConfig,
    ) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let mut enemy = Enemy::new(id, spec, now, config.teleport_every);
        enemy.relocate(columns, rows);
        self.enemies.push(enemy);
        id
    }

    /// Deals one hit to the boss and returns its remaining health.
    ///
    /// A boss reduced to zero health is removed along with its projectiles.
    pub(crate) fn damage_boss(&mut self) -> Option<u32> {
        let boss = self
            .enemies
            .iter_mut()
            .find(|enemy| enemy.spec.kind == EnemyKind::Boss)?;
        boss.spec.health = boss.spec.health.saturating_sub(1);
        let (id, health) = (boss.id, boss.spec.health);
        if health == 0 {
            self.remove_where(|enemy| enemy.id == id);
        }
        Some(health)
    }

    /// Removes every regular enemy and its projectiles.
    pub(crate) fn clear_drones(&mut self) -> u32 {
        let before = self.drone_count();
        self.remove_where(|enemy| enemy.spec.kind == EnemyKind::Drone);
        before
    }

    fn remove_where<F>(&mut self, predicate: F)
    where
        F: Fn(&Enemy) -> bool,
    {
        let removed: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|enemy| predicate(enemy))
            .map(|enemy| enemy.id)
            .collect();
        self.enemies.retain(|enemy| !removed.contains(&enemy.id));
        self.projectiles
            .retain(|projectile| !removed.contains(&projectile.owner));
    }

    /// Moves projectiles, then enemies, then lets enemies fire.
    pub(crate) fn advance(
        &mut self,
        now: Duration,
        columns: u32,
        rows: u32,
        config: &EnemyConfig,
        out_events: &mut Vec<Event>,
    ) {
        for projectile in &mut self.projectiles {
            projectile.fly();
        }

        for enemy in &mut self.enemies {
            enemy.step(columns, rows, config);
        }

        for enemy in &mut self.enemies {
            let Some(position) = enemy.try_fire(now) else {
                continue;
            };
            let id = ProjectileId::new(self.next_projectile_id);
            self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
            self.projectiles.push(Projectile::new(
                id,
                enemy.id,
                position,
                enemy.aim * config.projectile_speed,
            ));
            out_events.push(Event::ProjectileFired {
                projectile: id,
                owner: enemy.id,
                position,
            });
        }
    }

    #[cfg(test)]
    pub(crate) fn launch(&mut self, owner: EnemyId, position: Vec2, velocity: Vec2) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles
            .push(Projectile::new(id, owner, position, velocity));
        id
    }

    /// Hands the live projectiles to the caller for collision resolution.
    pub(crate) fn take_projectiles(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.projectiles)
    }

    /// Returns the projectiles that survived collision resolution.
    pub(crate) fn keep_projectiles(&mut self, survivors: Vec<Projectile>) {
        self.projectiles = survivors;
    }

    pub(crate) fn enemy_snapshots(&self) -> Vec<EnemySnapshot> {
        let mut snapshots: Vec<EnemySnapshot> = self.enemies.iter().map(Enemy::snapshot).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    pub(crate) fn projectile_snapshots(&self) -> Vec<ProjectileSnapshot> {
        let mut snapshots: Vec<ProjectileSnapshot> =
            self.projectiles.iter().map(Projectile::snapshot).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }
}
