//! Bone pickup broad phase.
//!
//! A dense uniform grid over the square arena. Cells hold indices into the
//! arena's bone list and are rebuilt once per tick after agents have moved.

use game_core::{Aabb, Bone, Vec3};

#[derive(Debug, Clone)]
pub struct BoneGrid {
    cells: Vec<Vec<usize>>,
    width: usize,
    cell_size: f32,
    half_extent: f32,
}

impl BoneGrid {
    pub fn new(half_extent: f32, cell_size: f32) -> Self {
        let cell_size = cell_size.max(0.1);
        let width = ((half_extent * 2.0) / cell_size).ceil().max(1.0) as usize;
        Self {
            cells: vec![Vec::new(); width * width],
            width,
            cell_size,
            half_extent,
        }
    }

    fn cell_coord(&self, v: f32) -> usize {
        let cell = ((v + self.half_extent) / self.cell_size).floor();
        (cell.max(0.0) as usize).min(self.width - 1)
    }

    pub fn get_cell_index(&self, position: Vec3) -> usize {
        self.cell_coord(position.z) * self.width + self.cell_coord(position.x)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Re-buckets every collectible bone.
    pub fn rebuild(&mut self, bones: &[Bone]) {
        self.clear();
        for (index, bone) in bones.iter().enumerate() {
            if bone.is_collectible() {
                let cell = self.get_cell_index(bone.position);
                self.cells[cell].push(index);
            }
        }
    }

    /// Indices of bones in every cell touched by a square of `radius`
    /// around `center`.
    pub fn query(&self, center: Vec3, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let x0 = self.cell_coord(center.x - radius);
        let x1 = self.cell_coord(center.x + radius);
        let z0 = self.cell_coord(center.z - radius);
        let z1 = self.cell_coord(center.z + radius);
        (z0..=z1).flat_map(move |z| {
            (x0..=x1).flat_map(move |x| self.cells[z * self.width + x].iter().copied())
        })
    }
}

/// Whether a bone at `position` is within `radius` of the body box.
pub fn touches(body: &Aabb, position: Vec3, radius: f32) -> bool {
    body.distance_squared(position) <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::BoneId;

    fn bones(points: &[(f32, f32)]) -> Vec<Bone> {
        points
            .iter()
            .enumerate()
            .map(|(i, (x, z))| Bone::settled(BoneId(i as u32), Vec3::new(*x, 0.0, *z), 0.0))
            .collect()
    }

    #[test]
    fn query_returns_only_neighbouring_cells() {
        let list = bones(&[(0.5, 0.5), (1.5, 0.5), (30.0, 30.0), (-39.9, -39.9)]);
        let mut grid = BoneGrid::new(40.0, 4.0);
        grid.rebuild(&list);

        let mut near: Vec<usize> = grid.query(Vec3::new(1.0, 0.0, 1.0), 1.0).collect();
        near.sort_unstable();
        assert_eq!(near, vec![0, 1]);

        let corner: Vec<usize> = grid.query(Vec3::new(-39.0, 0.0, -39.0), 1.0).collect();
        assert_eq!(corner, vec![3]);
    }

    #[test]
    fn collected_bones_are_not_indexed() {
        let mut list = bones(&[(0.0, 0.0)]);
        list[0].collected = true;
        let mut grid = BoneGrid::new(40.0, 4.0);
        grid.rebuild(&list);
        assert_eq!(grid.query(Vec3::ZERO, 2.0).count(), 0);
    }

    #[test]
    fn out_of_bounds_positions_clamp_to_edge_cells() {
        let grid = BoneGrid::new(40.0, 4.0);
        assert_eq!(grid.get_cell_index(Vec3::new(-100.0, 0.0, -100.0)), 0);
        assert_eq!(grid.get_cell_index(Vec3::new(100.0, 0.0, 100.0)), 20 * 20 - 1);
    }

    #[test]
    fn touch_uses_box_distance() {
        let body = Aabb::from_center_size(Vec3::new(0.0, 0.5, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(touches(&body, Vec3::new(1.0, 0.0, 0.0), 0.6));
        assert!(!touches(&body, Vec3::new(1.2, 0.0, 0.0), 0.6));
    }
}
