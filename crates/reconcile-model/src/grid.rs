use reconcile_xml::NodeId;

/// The role a cell in the [`VirtualGrid`] plays after expanding
/// `w:gridSpan`/`w:vMerge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRole {
    None,
    VMergeStart,
    VMergeContinue,
    GridSpanOrigin,
    GridSpanContinue,
}

/// One logical cell of the dense grid. Continuation cells (`VMergeContinue`,
/// `GridSpanContinue`) carry the coordinates of their origin so a later pass
/// never needs to re-derive them.
#[derive(Debug, Clone)]
pub struct VirtualCell {
    pub source: Option<NodeId>,
    pub text: String,
    pub merge_role: MergeRole,
    /// Origin coordinates for continuation cells; `None` for origins.
    pub origin: Option<(usize, usize)>,
    pub row_span: usize,
    pub col_span: usize,
}

impl VirtualCell {
    pub fn origin_cell(source: NodeId, text: impl Into<String>) -> Self {
        VirtualCell {
            source: Some(source),
            text: text.into(),
            merge_role: MergeRole::None,
            origin: None,
            row_span: 1,
            col_span: 1,
        }
    }
}

/// A dense `row_count x col_count` expansion of an OOXML table: every
/// logical cell, including merge continuations, occupies a coordinate.
/// `col_count` is the maximum `gridSpan`-expanded width observed across rows.
#[derive(Debug, Clone)]
pub struct VirtualGrid {
    pub row_count: usize,
    pub col_count: usize,
    cells: Vec<Option<VirtualCell>>,
}

impl VirtualGrid {
    pub fn new(row_count: usize, col_count: usize) -> Self {
        let mut cells = Vec::with_capacity(row_count * col_count);
        cells.resize_with(row_count * col_count, || None);
        VirtualGrid {
            row_count,
            col_count,
            cells,
        }
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.col_count + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&VirtualCell> {
        self.cells.get(self.index(row, col))?.as_ref()
    }

    pub fn set(&mut self, row: usize, col: usize, cell: VirtualCell) {
        let idx = self.index(row, col);
        self.cells[idx] = Some(cell);
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<&VirtualCell>> {
        (0..self.col_count).map(move |c| self.get(row, c))
    }

    /// Cell text for every column in `row`, empty string for a hole.
    pub fn row_texts(&self, row: usize) -> Vec<String> {
        self.row(row)
            .map(|c| c.map(|c| c.text.clone()).unwrap_or_default())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indextree::Arena;

    #[test]
    fn vmerge_continuation_points_back_to_its_origin() {
        let mut arena: Arena<()> = Arena::new();
        let node = arena.new_node(());
        let mut grid = VirtualGrid::new(2, 2);
        grid.set(0, 0, VirtualCell::origin_cell(node, "a"));
        grid.set(
            1,
            0,
            VirtualCell {
                source: None,
                text: String::new(),
                merge_role: MergeRole::VMergeContinue,
                origin: Some((0, 0)),
                row_span: 1,
                col_span: 1,
            },
        );
        assert_eq!(grid.get(1, 0).unwrap().origin, Some((0, 0)));
    }

    #[test]
    fn col_count_is_the_max_expanded_width() {
        let grid = VirtualGrid::new(3, 4);
        assert_eq!(grid.col_count, 4);
        assert_eq!(grid.row_texts(0).len(), 4);
    }
}
