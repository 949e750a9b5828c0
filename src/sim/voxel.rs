//! Voxel cells and the live world that owns them

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Hsl;

/// Stable handle for a voxel cell (allocation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VoxelId(pub u32);

/// One terrain block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoxelCell {
    pub id: VoxelId,
    pub grid_x: i32,
    /// Height layer
    pub grid_y: i32,
    pub grid_z: i32,
    /// Scene-local center of the unit cube
    pub position: Vec3,
    pub color: Hsl,
    pub alive: bool,
}

/// Ordered collection of live voxel cells
///
/// Cells stay in generation order. Ids are handed out monotonically, so the
/// vector is always sorted by id and lookups are a binary search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxelWorld {
    cells: Vec<VoxelCell>,
    next_id: u32,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new live cell and return its handle
    pub fn insert(&mut self, grid: (i32, i32, i32), position: Vec3, color: Hsl) -> VoxelId {
        let id = VoxelId(self.next_id);
        self.next_id += 1;
        self.cells.push(VoxelCell {
            id,
            grid_x: grid.0,
            grid_y: grid.1,
            grid_z: grid.2,
            position,
            color,
            alive: true,
        });
        id
    }

    /// Detach a cell. Unknown or already-removed ids are a no-op (returns None).
    pub fn remove(&mut self, id: VoxelId) -> Option<VoxelCell> {
        let index = self.cells.binary_search_by_key(&id, |c| c.id).ok()?;
        let mut cell = self.cells.remove(index);
        cell.alive = false;
        Some(cell)
    }

    pub fn get(&self, id: VoxelId) -> Option<&VoxelCell> {
        self.cells
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.cells[i])
    }

    pub fn contains(&self, id: VoxelId) -> bool {
        self.get(id).is_some()
    }

    /// Live cells in generation order
    pub fn iter(&self) -> impl Iterator<Item = &VoxelCell> {
        self.cells.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VoxelCell> {
        self.cells.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
