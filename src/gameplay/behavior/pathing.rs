//! Waypoint paths and the queued path service that computes them.

use std::collections::VecDeque;

use bevy::prelude::*;
use vleue_navigator::prelude::*;

use super::Behavior;

/// Path requests resolved per frame. Extra requests wait for the next one.
const PATHS_PER_FRAME: usize = 8;

/// Waypoint path toward a unit's current target.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct NavPath {
    /// World-space waypoints from the path service.
    pub waypoints: Vec<Vec2>,
    /// Index of the waypoint being steered toward.
    pub current_index: usize,
}

impl NavPath {
    pub fn set(&mut self, waypoints: Vec<Vec2>) {
        self.waypoints = waypoints;
        self.current_index = 0;
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
    }

    #[must_use]
    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.current_index).copied()
    }

    /// Move on to the next waypoint if one remains after the current one.
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.waypoints.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

// === Path service ===

/// Identifies one outstanding path request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct PathTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRequest {
    pub ticket: PathTicket,
    pub unit: Entity,
    pub from: Vec2,
    pub to: Vec2,
}

/// Requests waiting for the path service. Results are delivered back to
/// the requesting unit's [`Behavior`] a frame or more later.
#[derive(Resource, Debug, Default)]
pub struct PathQueue {
    requests: VecDeque<PathRequest>,
    next_ticket: u64,
}

impl PathQueue {
    pub fn request(&mut self, unit: Entity, from: Vec2, to: Vec2) -> PathTicket {
        let ticket = PathTicket(self.next_ticket);
        self.next_ticket += 1;
        self.requests.push_back(PathRequest {
            ticket,
            unit,
            from,
            to,
        });
        ticket
    }

    pub fn pop(&mut self) -> Option<PathRequest> {
        self.requests.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Something that can route between two points.
pub trait Pathfinder {
    /// Waypoints after `from`, ending at `to`. `None` when unreachable.
    fn find_path(&self, from: Vec2, to: Vec2) -> Option<Vec<Vec2>>;
}

impl Pathfinder for NavMesh {
    fn find_path(&self, from: Vec2, to: Vec2) -> Option<Vec<Vec2>> {
        self.path(from, to).map(|path| path.path)
    }
}

/// Answer up to `budget` queued requests.
pub fn resolve_requests(
    queue: &mut PathQueue,
    pathfinder: &impl Pathfinder,
    budget: usize,
    mut deliver: impl FnMut(PathRequest, Option<Vec<Vec2>>),
) {
    for _ in 0..budget {
        let Some(request) = queue.pop() else {
            break;
        };
        let path = pathfinder.find_path(request.from, request.to);
        deliver(request, path);
    }
}

/// Computes queued paths on the navmesh once it is built.
/// Runs in `GameSet::Ai` after the behavior decisions.
pub(super) fn resolve_paths(
    mut queue: ResMut<PathQueue>,
    mut units: Query<&mut Behavior>,
    navmeshes: Option<Res<Assets<NavMesh>>>,
    navmesh_query: Option<Single<(&ManagedNavMesh, &NavMeshStatus)>>,
) {
    if queue.is_empty() {
        return;
    }
    let Some(navmeshes) = navmeshes else {
        return;
    };
    let Some(inner) = navmesh_query else {
        return;
    };
    let (managed, status) = *inner;
    if *status != NavMeshStatus::Built {
        return;
    }
    let Some(navmesh) = navmeshes.get(managed) else {
        return;
    };

    resolve_requests(&mut queue, navmesh, PATHS_PER_FRAME, |request, path| {
        if let Ok(mut behavior) = units.get_mut(request.unit) {
            behavior.on_path_result(request.ticket, path);
        }
    });
}
