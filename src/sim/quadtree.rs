//! Quadtree membership index over static platform boxes
//!
//! Boxes are routed by their four corners, so a box straddling a split line
//! is registered in every quadrant it touches. Queries use the same routing
//! and deduplicate ids. This is a membership index, not a partition.

use std::collections::BTreeSet;

use glam::Vec2;

use super::geometry::Rect;
use crate::consts::DEFAULT_MAX_HOLD;

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: usize,
    bounds: Rect,
}

#[derive(Debug, Clone)]
struct Quadrant {
    bounds: Rect,
    mid: Vec2,
    max_hold: usize,
    hold: Vec<Entry>,
    /// Indexed by `(x > mid.x) << 1 | (y > mid.y)`
    children: Option<Box<[Quadrant; 4]>>,
}

impl Quadrant {
    fn new(bounds: Rect, max_hold: usize) -> Self {
        Self {
            bounds,
            mid: bounds.center(),
            max_hold,
            hold: Vec::new(),
            children: None,
        }
    }

    #[inline]
    fn sector(&self, point: Vec2) -> usize {
        (usize::from(point.x > self.mid.x) << 1) | usize::from(point.y > self.mid.y)
    }

    /// Quadrants reached by the corners of `area`, each at most once
    fn sectors(&self, area: &Rect) -> [bool; 4] {
        let mut visited = [false; 4];
        for corner in area.corners() {
            visited[self.sector(corner)] = true;
        }
        visited
    }

    fn insert(&mut self, entry: Entry) {
        let visited = self.sectors(&entry.bounds);
        if let Some(children) = self.children.as_mut() {
            for (child, hit) in children.iter_mut().zip(visited) {
                if hit {
                    child.insert(entry);
                }
            }
            return;
        }

        self.hold.push(entry);
        if self.hold.len() > self.max_hold {
            self.split();
        }
    }

    fn split(&mut self) {
        let half_w = self.bounds.width / 2.0;
        let half_h = self.bounds.height / 2.0;
        let Vec2 { x, y } = self.bounds.pos;
        let cap = self.max_hold + 1;

        self.children = Some(Box::new([
            Quadrant::new(Rect::new(x, y, half_w, half_h), cap),
            Quadrant::new(Rect::new(x, self.mid.y, half_w, half_h), cap),
            Quadrant::new(Rect::new(self.mid.x, y, half_w, half_h), cap),
            Quadrant::new(Rect::new(self.mid.x, self.mid.y, half_w, half_h), cap),
        ]));

        for entry in std::mem::take(&mut self.hold) {
            self.insert(entry);
        }
    }

    fn collect(&self, area: &Rect, out: &mut BTreeSet<usize>) {
        match &self.children {
            Some(children) => {
                let visited = self.sectors(area);
                for (child, hit) in children.iter().zip(visited) {
                    if hit {
                        child.collect(area, out);
                    }
                }
            }
            None => out.extend(self.hold.iter().map(|e| e.id)),
        }
    }

    fn collect_all(&self, out: &mut BTreeSet<usize>) {
        match &self.children {
            Some(children) => children.iter().for_each(|c| c.collect_all(out)),
            None => out.extend(self.hold.iter().map(|e| e.id)),
        }
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Quadrant)) {
        visit(self);
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.walk(visit);
            }
        }
    }
}

/// Spatial index answering "which box ids overlap this query box"
#[derive(Debug, Clone)]
pub struct QuadTree {
    start_max_hold: usize,
    root: Quadrant,
    len: usize,
}

impl Default for QuadTree {
    /// Zero-sized root at the origin; size it with `reset` before use
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, DEFAULT_MAX_HOLD)
    }
}

impl QuadTree {
    pub fn new(x: f32, y: f32, width: f32, height: f32, start_max_hold: usize) -> Self {
        Self {
            start_max_hold,
            root: Quadrant::new(Rect::new(x, y, width, height), start_max_hold),
            len: 0,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Number of registered boxes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry and rebuild an empty root, keeping its origin
    pub fn reset(&mut self, width: f32, height: f32) {
        let pos = self.root.bounds.pos;
        self.root = Quadrant::new(Rect::new(pos.x, pos.y, width, height), self.start_max_hold);
        self.len = 0;
    }

    /// Register a box under `id`. Returns false if it lies outside the root.
    pub fn create(&mut self, id: usize, x: f32, y: f32, width: f32, height: f32) -> bool {
        let bounds = Rect::new(x, y, width, height);
        if !bounds.overlaps(&self.root.bounds) {
            log::debug!("Quadtree ignoring box {} outside root bounds", id);
            return false;
        }
        self.root.insert(Entry { id, bounds });
        self.len += 1;
        true
    }

    /// Ids registered in every leaf the query box reaches, ascending
    pub fn get(&self, x: f32, y: f32, width: f32, height: f32) -> Vec<usize> {
        self.query(&Rect::new(x, y, width, height))
    }

    pub fn query(&self, area: &Rect) -> Vec<usize> {
        // Corner routing only holds for boxes that touch the node
        if !area.overlaps(&self.root.bounds) {
            return Vec::new();
        }
        let mut out = BTreeSet::new();
        self.root.collect(area, &mut out);
        out.into_iter().collect()
    }

    pub fn get_all(&self) -> Vec<usize> {
        let mut out = BTreeSet::new();
        self.root.collect_all(&mut out);
        out.into_iter().collect()
    }

    /// Bounds of every node, root first (for visualizing the subdivision)
    pub fn splits(&self) -> Vec<Rect> {
        let mut out = Vec::new();
        self.root.walk(&mut |node| out.push(node.bounds));
        out
    }
}
