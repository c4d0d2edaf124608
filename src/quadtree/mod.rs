use crate::boid::BoidId;
use crate::geometry::{Circle, Point, Rect};

#[cfg(test)]
mod tests;

/// Nodes at this depth never subdivide, they keep accepting entries past their capacity.
/// Without the cap, more than `capacity` coincident boids would split forever.
pub const MAX_DEPTH: u32 = 32;

/// A boid as seen by the index: where it was at build time and which boid it is.
pub type Entry = (Point, BoidId);

// | nw | ne |
// | -- | -- |
// | sw | se |
type Children = Option<Box<[Quadtree; 4]>>;

/// Region quadtree over boid positions.
///
/// A node is either a leaf holding up to `capacity` entries, or an internal node holding no
/// entries and exactly four children that split its bounds into equal quadrants.
/// The tree never shrinks; it is meant to be thrown away and rebuilt.
#[derive(Debug, Clone)]
pub struct Quadtree {
    bounds: Rect,
    capacity: usize,
    level: u32,

    children: Children,

    entries: Vec<Entry>,
}

impl Quadtree {
    pub fn new(bounds: Rect, capacity: usize) -> Self {
        assert!(capacity > 0, "a leaf must hold at least one entry");
        assert!(bounds.width >= 0.0 && bounds.height >= 0.0);
        Self::with_level(bounds, capacity, 0)
    }

    fn with_level(bounds: Rect, capacity: usize, level: u32) -> Self {
        Self {
            bounds,
            capacity,
            level,
            children: None,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn from_iterator<It>(bounds: Rect, capacity: usize, it: It) -> Self
    where
        It: IntoIterator<Item = Entry>,
    {
        let mut tree = Self::new(bounds, capacity);
        tree.extend(it);
        tree
    }

    /// Insert every entry. Rejected entries are logged and skipped; compare `len` against the
    /// number of entries handed in to detect them.
    pub fn extend<It>(&mut self, it: It)
    where
        It: IntoIterator<Item = Entry>,
    {
        for (point, id) in it {
            if let Err(point) = self.insert(point, id) {
                log::warn!("{:?} at {:?} was not accepted by the index", id, point);
            }
        }
    }

    /// Returns `Err` with the rejected point if no node accepted it.
    ///
    /// Failure is expected for points outside `bounds`. Inside the bounds it can only happen
    /// when rounding in the quadrant split leaves a sliver no child covers.
    pub fn insert(&mut self, point: Point, id: BoidId) -> Result<(), Point> {
        if !self.bounds.contains(&point) {
            return Err(point);
        }

        if self.children.is_none() {
            if self.entries.len() < self.capacity || self.level >= MAX_DEPTH {
                self.entries.push((point, id));
                return Ok(());
            }
            self.subdivide();
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.insert(point, id).is_ok() {
                    return Ok(());
                }
            }
        }
        Err(point)
    }

    /// Split this node into four quadrants and push its entries down into them.
    ///
    /// Every entry goes to the first child, in nw, ne, sw, se order, that takes it.
    /// Does nothing if the node is already split.
    pub fn subdivide(&mut self) {
        if self.children.is_some() {
            return;
        }

        let [nw, ne, sw, se] = self.bounds.quadrants();
        let level = self.level + 1;
        let mut children = Box::new([
            Self::with_level(nw, self.capacity, level),
            Self::with_level(ne, self.capacity, level),
            Self::with_level(sw, self.capacity, level),
            Self::with_level(se, self.capacity, level),
        ]);

        for (point, id) in self.entries.drain(..) {
            let accepted = children
                .iter_mut()
                .any(|child| child.insert(point, id).is_ok());
            if !accepted {
                log::warn!("{:?} at {:?} was dropped while subdividing", id, point);
            }
        }
        self.entries = Vec::new();
        self.children = Some(children);
    }

    /// Every entry within `circle`, appended to `out`.
    pub fn query_range<'a>(&'a self, circle: &Circle, out: &mut Vec<&'a Entry>) {
        let hint = circle.bounding_rect();
        self.query_range_with_hint(circle, &hint, out);
    }

    /// Like `query_range`, with the bounding square of `circle` computed by the caller.
    ///
    /// The traversal prunes and collects with the cheap rectangle test only; the exact
    /// distance test runs once over the collected candidates.
    pub fn query_range_with_hint<'a>(
        &'a self,
        circle: &Circle,
        hint: &Rect,
        out: &mut Vec<&'a Entry>,
    ) {
        let start = out.len();
        self.collect_in_rect(hint, out);

        let candidates = out.split_off(start);
        out.extend(
            candidates
                .into_iter()
                .filter(|(point, _)| circle.contains(point)),
        );
    }

    /// Concatenated `query_range` results of all `circles`.
    ///
    /// Not deduplicated: an entry inside two overlapping circles is reported twice.
    pub fn query_ranges<'a>(&'a self, circles: &[Circle], out: &mut Vec<&'a Entry>) {
        for circle in circles {
            self.query_range(circle, out);
        }
    }

    fn collect_in_rect<'a>(&'a self, rect: &Rect, out: &mut Vec<&'a Entry>) {
        if !self.bounds.intersects(rect) {
            return;
        }

        out.extend(self.entries.iter().filter(|(point, _)| rect.contains(point)));

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.collect_in_rect(rect, out);
            }
        }
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Distance from the root, which is at level 0.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The `[nw, ne, sw, se]` children, if this node has been subdivided.
    pub fn children(&self) -> Option<&[Quadtree; 4]> {
        self.children.as_deref()
    }

    /// Entries held directly by this node. Always empty for internal nodes.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// All entries in the subtree.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.nodes().flat_map(|node| node.entries.iter())
    }

    /// Number of entries in the subtree.
    pub fn len(&self) -> usize {
        self.nodes().map(|node| node.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Number of levels below this node; 0 for a leaf.
    pub fn depth(&self) -> u32 {
        self.nodes()
            .map(|node| node.level - self.level)
            .max()
            .unwrap_or(0)
    }
}

pub struct Nodes<'a> {
    stack: Vec<&'a Quadtree>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Quadtree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(ref children) = node.children {
            // reversed so that nw comes out first
            self.stack.extend(children.iter().rev());
        }
        Some(node)
    }
}
