//! In-memory host world
//!
//! A minimal object store with groups and a ground profile, implementing
//! [`TrajectoryHost`] so the simulator can run headless (tests, demo binary)
//! without a live editor.

use glam::Vec3;

use super::{FlatGround, GroundQuery, ObjectId, TrajectoryHost};

#[derive(Clone, Debug)]
struct SandboxObject {
    position: Vec3,
    group: Option<usize>,
}

#[derive(Clone, Debug)]
struct SandboxGroup {
    root: ObjectId,
    /// Members in enumeration order, root included
    members: Vec<ObjectId>,
}

/// Headless host holding objects, groups and a ground surface.
#[derive(Clone, Debug)]
pub struct SandboxWorld<G = FlatGround> {
    objects: Vec<Option<SandboxObject>>,
    /// Group slots; a slot is freed when its last member leaves
    groups: Vec<Option<SandboxGroup>>,
    ground: G,
}

impl SandboxWorld<FlatGround> {
    /// World with a horizontal ground plane at `height`.
    pub fn flat(height: f32) -> Self {
        Self::new(FlatGround::new(height))
    }
}

impl Default for SandboxWorld<FlatGround> {
    fn default() -> Self {
        Self::flat(0.0)
    }
}

impl<G: GroundQuery> SandboxWorld<G> {
    pub fn new(ground: G) -> Self {
        Self {
            objects: Vec::new(),
            groups: Vec::new(),
            ground,
        }
    }

    /// Add an object at `position` and return its handle.
    pub fn spawn(&mut self, position: Vec3) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(Some(SandboxObject {
            position,
            group: None,
        }));
        id
    }

    /// Remove an object, dropping it from its group.
    pub fn despawn(&mut self, object: ObjectId) {
        self.leave_group(object);
        if let Some(slot) = self.objects.get_mut(object.0 as usize) {
            *slot = None;
        }
    }

    /// Form a group rooted at `root` with `members` following in order.
    ///
    /// Objects already in another group are moved. Returns the group index,
    /// reusing the slot of a group that has emptied out.
    pub fn create_group(&mut self, root: ObjectId, members: &[ObjectId]) -> usize {
        let mut all = Vec::with_capacity(members.len() + 1);
        all.push(root);
        all.extend(members.iter().copied().filter(|&m| m != root));

        for &member in &all {
            self.leave_group(member);
        }

        let index = match self.groups.iter().position(Option::is_none) {
            Some(free) => free,
            None => {
                self.groups.push(None);
                self.groups.len() - 1
            }
        };
        for &member in &all {
            if let Some(object) = self.object_mut(member) {
                object.group = Some(index);
            }
        }

        self.groups[index] = Some(SandboxGroup { root, members: all });
        index
    }

    /// Take `object` out of its group, if any.
    pub fn leave_group(&mut self, object: ObjectId) {
        let Some(index) = self.object(object).and_then(|o| o.group) else {
            return;
        };
        if let Some(slot) = self.groups.get_mut(index) {
            let emptied = slot.as_mut().is_some_and(|group| {
                group.members.retain(|&m| m != object);
                group.members.is_empty()
            });
            if emptied {
                *slot = None;
            }
        }
        if let Some(object) = self.object_mut(object) {
            object.group = None;
        }
    }

    /// Number of groups with at least one member.
    pub fn group_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_some()).count()
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_some()).count()
    }

    fn object(&self, id: ObjectId) -> Option<&SandboxObject> {
        self.objects.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SandboxObject> {
        self.objects.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    fn group_of(&self, id: ObjectId) -> Option<&SandboxGroup> {
        self.object(id)
            .and_then(|o| o.group)
            .and_then(|index| self.groups.get(index))
            .and_then(Option::as_ref)
    }
}

impl<G: GroundQuery> GroundQuery for SandboxWorld<G> {
    fn ground_height(&self, point: Vec3) -> f32 {
        self.ground.ground_height(point)
    }
}

impl<G: GroundQuery> TrajectoryHost for SandboxWorld<G> {
    fn position(&self, object: ObjectId) -> Option<Vec3> {
        self.object(object).map(|o| o.position)
    }

    fn set_position(&mut self, object: ObjectId, position: Vec3) {
        if let Some(o) = self.object_mut(object) {
            o.position = position;
        }
    }

    fn is_group_root(&self, object: ObjectId) -> bool {
        self.group_of(object).is_some_and(|g| g.root == object)
    }

    fn group_siblings(&self, object: ObjectId) -> Option<Vec<ObjectId>> {
        self.group_of(object).map(|g| {
            g.members
                .iter()
                .copied()
                .filter(|&m| m != object)
                .collect()
        })
    }
}
