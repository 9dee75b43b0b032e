//! Table layout.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! "In a visual medium, CSS tables can also be used to achieve specific
//! layouts."
//!
//! The table is measured on a [`TableSizeGrid`]: content widths of columns
//! and content heights of rows, interleaved with the non-content gutters
//! (borders, padding and spacing) between them. Column widths are measured
//! twice, once with minimum and once with preferred cell widths, and the
//! used grid is chosen or blended from the two.

use serde::Serialize;

use crate::box_tree::BoxTree;
use crate::error::Result;
use crate::style::values::{BorderCollapse, Display, LengthPercentageAuto, VerticalAlign};

use super::block::{self, outer_box};
use super::box_model::{EdgeSizes, Rect};
use super::intrinsic::{self, Strategy};
use super::sizing;
use super::tree::{LayoutId, LayoutKind, LayoutTree, SizeValue, TableData};
use super::LayoutContext;

/// Column widths and row heights of a table.
///
/// `non_content_width[i]` is the gutter left of column `i`; the last entry
/// is the gutter right of the last column. Gutters at the table's edges
/// include the table's own border and padding, so the grid sums to the
/// table's border-box size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSizeGrid {
    /// Content width of each column.
    pub content_width: Vec<f32>,
    /// Content height of each row.
    pub content_height: Vec<f32>,
    /// Gutters between and around columns; one more than the columns.
    pub non_content_width: Vec<f32>,
    /// Gutters between and around rows; one more than the rows.
    pub non_content_height: Vec<f32>,
}

/// Grow `sizes[start..start + span]` so that together with the inner
/// gutters they reach `size`. A single slot takes the maximum; a span
/// shares the shortfall evenly.
fn apply(sizes: &mut [f32], gutters: &[f32], start: usize, span: usize, size: f32) {
    let end = (start + span).min(sizes.len());
    if start >= end {
        return;
    }
    let available: f32 = sizes[start..end].iter().sum::<f32>() + gutters[start + 1..end].iter().sum::<f32>();
    if size > available {
        let share = (size - available) / (end - start) as f32;
        for value in &mut sizes[start..end] {
            *value += share;
        }
    }
}

impl TableSizeGrid {
    /// An empty grid of `columns` by `rows`.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            content_width: vec![0.0; columns],
            content_height: vec![0.0; rows],
            non_content_width: vec![0.0; columns + 1],
            non_content_height: vec![0.0; rows + 1],
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.content_width.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.content_height.len()
    }

    /// Require `width` of content for a cell in `column..column + span`.
    pub fn apply_width(&mut self, column: usize, span: usize, width: f32) {
        apply(&mut self.content_width, &self.non_content_width, column, span, width);
    }

    /// Require `height` of content for a cell in `row..row + span`.
    pub fn apply_height(&mut self, row: usize, span: usize, height: f32) {
        apply(&mut self.content_height, &self.non_content_height, row, span, height);
    }

    /// The table's border-box width.
    #[must_use]
    pub fn total_width(&self) -> f32 {
        self.content_width.iter().sum::<f32>() + self.non_content_width.iter().sum::<f32>()
    }

    /// The table's border-box height, captions excluded.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.content_height.iter().sum::<f32>() + self.non_content_height.iter().sum::<f32>()
    }

    /// Offset of the content of `column` from the table's left border edge.
    #[must_use]
    pub fn column_x(&self, column: usize) -> f32 {
        self.non_content_width[..=column].iter().sum::<f32>() + self.content_width[..column].iter().sum::<f32>()
    }

    /// Offset of the content of `row` from the table's top border edge.
    #[must_use]
    pub fn row_y(&self, row: usize) -> f32 {
        self.non_content_height[..=row].iter().sum::<f32>() + self.content_height[..row].iter().sum::<f32>()
    }

    /// Content width of a cell spanning `span` columns from `column`.
    #[must_use]
    pub fn span_width(&self, column: usize, span: usize) -> f32 {
        let end = (column + span).min(self.columns());
        self.content_width[column..end].iter().sum::<f32>() + self.non_content_width[column + 1..end].iter().sum::<f32>()
    }

    /// Content height of a cell spanning `span` rows from `row`.
    #[must_use]
    pub fn span_height(&self, row: usize, span: usize) -> f32 {
        let end = (row + span).min(self.rows());
        self.content_height[row..end].iter().sum::<f32>() + self.non_content_height[row + 1..end].iter().sum::<f32>()
    }

    /// Widen the columns until the grid is `target` wide, in proportion to
    /// their widths, or evenly if they are all zero.
    pub fn expand_to(&mut self, target: f32) {
        let extra = target - self.total_width();
        if extra <= 0.0 || self.content_width.is_empty() {
            return;
        }
        let sum: f32 = self.content_width.iter().sum();
        let count = self.content_width.len() as f32;
        for width in &mut self.content_width {
            *width += if sum > 0.0 { extra * *width / sum } else { extra / count };
        }
    }

    /// [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
    ///
    /// A grid `target` wide between `minimum` and `preferred`: each column
    /// gets its minimum plus a share of the room left, in proportion to how
    /// much it would like to grow.
    #[must_use]
    pub fn blend(minimum: &Self, preferred: &Self, target: f32) -> Self {
        let min_total = minimum.total_width();
        let pref_total = preferred.total_width();
        if target >= pref_total {
            let mut grid = preferred.clone();
            grid.expand_to(target);
            return grid;
        }
        if target <= min_total || pref_total <= min_total {
            let mut grid = minimum.clone();
            grid.expand_to(target);
            return grid;
        }
        let ratio = (target - min_total) / (pref_total - min_total);
        let mut grid = minimum.clone();
        for (width, (min, pref)) in grid
            .content_width
            .iter_mut()
            .zip(minimum.content_width.iter().zip(&preferred.content_width))
        {
            *width = min + (pref - min).max(0.0) * ratio;
        }
        grid
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Structure
// ─────────────────────────────────────────────────────────────────────────────

/// One cell and the grid slots it covers.
#[derive(Debug, Clone, Copy)]
struct CellSlot {
    node: LayoutId,
    row: usize,
    column: usize,
    rowspan: usize,
    colspan: usize,
}

/// Rows, cells, columns and captions of one table, in grid order.
#[derive(Debug, Default)]
struct TableStructure {
    rows: Vec<LayoutId>,
    /// Row groups with the range of rows they hold.
    groups: Vec<(LayoutId, usize, usize)>,
    cells: Vec<CellSlot>,
    columns: usize,
    /// Column boxes with the first column they cover and their span.
    column_boxes: Vec<(LayoutId, usize, usize)>,
    captions: Vec<LayoutId>,
}

impl TableStructure {
    /// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
    ///
    /// "Cells may span several rows or columns. [...] Each cell is thus a
    /// rectangular box, one or more grid cells wide and high."
    ///
    /// [§ 17.2] "'table-header-group' [...] the row group is always displayed
    /// before all other rows and row groups", and footers after them.
    fn collect(tree: &LayoutTree, boxes: &BoxTree, table: LayoutId) -> Self {
        let mut structure = Self::default();
        let mut headers: Vec<(Option<LayoutId>, Vec<LayoutId>)> = Vec::new();
        let mut bodies: Vec<(Option<LayoutId>, Vec<LayoutId>)> = Vec::new();
        let mut footers: Vec<(Option<LayoutId>, Vec<LayoutId>)> = Vec::new();
        let mut columns: Vec<LayoutId> = Vec::new();

        for &child in &tree[table].children {
            let node = &tree[child];
            if node.is_out_of_flow() {
                continue;
            }
            match node.kind {
                LayoutKind::TableRowGroup => {
                    let rows = node
                        .children
                        .iter()
                        .copied()
                        .filter(|&r| matches!(tree[r].kind, LayoutKind::TableRow))
                        .collect();
                    match node.display {
                        Display::TableHeaderGroup => headers.push((Some(child), rows)),
                        Display::TableFooterGroup => footers.push((Some(child), rows)),
                        _ => bodies.push((Some(child), rows)),
                    }
                }
                LayoutKind::TableRow => bodies.push((None, vec![child])),
                LayoutKind::TableColumn => columns.push(child),
                _ if node.display == Display::TableCaption => structure.captions.push(child),
                _ => {}
            }
        }

        for (group, rows) in headers.into_iter().chain(bodies).chain(footers) {
            let first = structure.rows.len();
            structure.rows.extend(rows);
            if let Some(group) = group {
                structure.groups.push((group, first, structure.rows.len()));
            }
        }

        // Slots taken by row-spanning cells from earlier rows.
        let row_count = structure.rows.len();
        let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); row_count];
        for (r, &row) in structure.rows.iter().enumerate() {
            let mut column = 0;
            for &cell in &tree[row].children {
                if tree[cell].display != Display::TableCell || tree[cell].is_out_of_flow() {
                    continue;
                }
                while occupied[r].get(column).copied().unwrap_or(false) {
                    column += 1;
                }
                let element = boxes.element(tree[cell].box_id);
                let colspan = element.map_or(1, |e| e.span_attr("colspan"));
                let rowspan = element.map_or(1, |e| e.span_attr("rowspan")).min(row_count - r);
                for taken in &mut occupied[r..r + rowspan] {
                    if taken.len() < column + colspan {
                        taken.resize(column + colspan, false);
                    }
                    for slot in &mut taken[column..column + colspan] {
                        *slot = true;
                    }
                }
                structure.cells.push(CellSlot {
                    node: cell,
                    row: r,
                    column,
                    rowspan,
                    colspan,
                });
                column += colspan;
                structure.columns = structure.columns.max(column);
            }
        }

        // Column boxes: a group with columns inside counts its columns, an
        // empty group counts itself.
        let mut next = 0;
        for group in columns {
            let leaves: Vec<LayoutId> = tree[group]
                .children
                .iter()
                .copied()
                .filter(|&c| matches!(tree[c].kind, LayoutKind::TableColumn))
                .collect();
            let leaves = if leaves.is_empty() { vec![group] } else { leaves };
            for column in leaves {
                let span = boxes.element(tree[column].box_id).map_or(1, |e| e.span_attr("span"));
                structure.column_boxes.push((column, next, span));
                next += span;
            }
        }
        structure.columns = structure.columns.max(next);
        structure
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Edges
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the edges of the table and its cells against `basis`.
///
/// [§ 17.6.2 The collapsing border model](https://www.w3.org/TR/CSS2/tables.html#collapsing-borders)
///
/// "In this model, each cell's border is shared with its neighbors. [...]
/// Note that in this model, the width of the table includes half the table
/// border."
///
/// With collapsing borders each grid line gets the widest border that
/// touches it. Cells use half of a shared line on each side; lines at the
/// table's edge belong to the table, which drops its padding.
fn resolve_edges(cx: &mut LayoutContext<'_>, table: LayoutId, structure: &TableStructure, basis: f32) {
    {
        let node = &mut cx.tree[table];
        node.containing_width = basis;
        sizing::resolve_edges(node);
    }
    for cell in &structure.cells {
        let node = &mut cx.tree[cell.node];
        node.containing_width = basis;
        node.containing_height = None;
        sizing::resolve_edges(node);
        // [§ 17.5] Cells have no margins.
        node.margin = EdgeSizes::default();
    }
    for &row in &structure.rows {
        cx.tree[row].margin = EdgeSizes::default();
    }
    if cx.tree[table].style.border_collapse != BorderCollapse::Collapse {
        return;
    }

    let columns = structure.columns;
    let rows = structure.rows.len();
    let table_border = cx.tree[table].style.border_width;
    let mut vertical = vec![0.0_f32; columns + 1];
    let mut horizontal = vec![0.0_f32; rows + 1];
    vertical[0] = table_border.left;
    vertical[columns] = vertical[columns].max(table_border.right);
    horizontal[0] = table_border.top;
    horizontal[rows] = horizontal[rows].max(table_border.bottom);
    for cell in &structure.cells {
        let widths = cx.tree[cell.node].style.border_width;
        let right = cell.column + cell.colspan;
        let bottom = cell.row + cell.rowspan;
        vertical[cell.column] = vertical[cell.column].max(widths.left);
        vertical[right] = vertical[right].max(widths.right);
        horizontal[cell.row] = horizontal[cell.row].max(widths.top);
        horizontal[bottom] = horizontal[bottom].max(widths.bottom);
    }

    let half = |lines: &[f32], index: usize, last: usize| {
        if index == 0 || index == last { 0.0 } else { lines[index] / 2.0 }
    };
    for cell in &structure.cells {
        let node = &mut cx.tree[cell.node];
        node.border = EdgeSizes {
            top: half(&horizontal, cell.row, rows),
            right: half(&vertical, cell.column + cell.colspan, columns),
            bottom: half(&horizontal, cell.row + cell.rowspan, rows),
            left: half(&vertical, cell.column, columns),
        };
    }
    let node = &mut cx.tree[table];
    node.padding = EdgeSizes::default();
    if columns > 0 {
        node.border.left = vertical[0];
        node.border.right = vertical[columns];
    }
    if rows > 0 {
        node.border.top = horizontal[0];
        node.border.bottom = horizontal[rows];
    }
}

/// Gutters of one axis: the cell edges on both sides of each grid line,
/// the spacing, and the table's own edges at the ends.
fn gutters(count: usize, starts: &[f32], ends: &[f32], spacing: f32, table_start: f32, table_end: f32) -> Vec<f32> {
    let spacing = if count > 0 { spacing } else { 0.0 };
    let mut out: Vec<f32> = (0..=count).map(|i| ends[i] + starts[i] + spacing).collect();
    out[0] += table_start;
    out[count] += table_end;
    out
}

/// Spacing between cells: zero when borders collapse.
fn spacing(cx: &LayoutContext<'_>, table: LayoutId) -> (f32, f32) {
    let style = &cx.tree[table].style;
    match style.border_collapse {
        BorderCollapse::Collapse => (0.0, 0.0),
        BorderCollapse::Separate => style.border_spacing,
    }
}

fn horizontal_gutters(cx: &LayoutContext<'_>, table: LayoutId, structure: &TableStructure) -> Vec<f32> {
    let columns = structure.columns;
    let mut starts = vec![0.0_f32; columns + 1];
    let mut ends = vec![0.0_f32; columns + 1];
    for cell in &structure.cells {
        let node = &cx.tree[cell.node];
        starts[cell.column] = starts[cell.column].max(node.border.left + node.padding.left);
        let end = cell.column + cell.colspan;
        ends[end] = ends[end].max(node.border.right + node.padding.right);
    }
    let node = &cx.tree[table];
    gutters(
        columns,
        &starts,
        &ends,
        spacing(cx, table).0,
        node.border.left + node.padding.left,
        node.border.right + node.padding.right,
    )
}

fn vertical_gutters(cx: &LayoutContext<'_>, table: LayoutId, structure: &TableStructure) -> Vec<f32> {
    let rows = structure.rows.len();
    let mut starts = vec![0.0_f32; rows + 1];
    let mut ends = vec![0.0_f32; rows + 1];
    for cell in &structure.cells {
        let node = &cx.tree[cell.node];
        starts[cell.row] = starts[cell.row].max(node.border.top + node.padding.top);
        let end = cell.row + cell.rowspan;
        ends[end] = ends[end].max(node.border.bottom + node.padding.bottom);
    }
    let node = &cx.tree[table];
    gutters(
        rows,
        &starts,
        &ends,
        spacing(cx, table).1,
        node.border.top + node.padding.top,
        node.border.bottom + node.padding.bottom,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Column widths
// ─────────────────────────────────────────────────────────────────────────────

/// Content width a cell asks for under `strategy`. A fixed `width` raises
/// it but never below the minimum content width.
fn cell_width(cx: &mut LayoutContext<'_>, cell: LayoutId, strategy: Strategy) -> Result<f32> {
    let content = intrinsic::content_width(cx, cell, strategy)?;
    let LengthPercentageAuto::Px(fixed) = cx.tree[cell].style.width else {
        return Ok(content);
    };
    Ok(match strategy {
        Strategy::Minimum => content.max(fixed),
        Strategy::Preferred => fixed.max(intrinsic::content_width(cx, cell, Strategy::Minimum)?),
    })
}

/// The column grid with every cell at its `strategy` width.
fn column_grid(
    cx: &mut LayoutContext<'_>,
    table: LayoutId,
    structure: &TableStructure,
    strategy: Strategy,
) -> Result<TableSizeGrid> {
    let mut grid = TableSizeGrid::new(structure.columns, structure.rows.len());
    grid.non_content_width = horizontal_gutters(cx, table, structure);

    // Single-column cells first, so spans only add what is still missing.
    let mut cells = structure.cells.clone();
    cells.sort_by_key(|c| c.colspan);
    for cell in &cells {
        let width = cell_width(cx, cell.node, strategy)?;
        grid.apply_width(cell.column, cell.colspan, width);
    }
    for &(column, first, span) in &structure.column_boxes {
        if let LengthPercentageAuto::Px(width) = cx.tree[column].style.width {
            for index in first..(first + span).min(structure.columns) {
                grid.apply_width(index, 1, width);
            }
        }
    }
    Ok(grid)
}

/// Border-box width of the table under `strategy`, for shrink-to-fit.
///
/// # Errors
///
/// Propagates errors from measuring the cells.
pub(crate) fn measure_table(cx: &mut LayoutContext<'_>, table: LayoutId, strategy: Strategy) -> Result<f32> {
    let structure = TableStructure::collect(&cx.tree, cx.boxes, table);
    resolve_edges(cx, table, &structure, 0.0);
    let mut width = column_grid(cx, table, &structure, strategy)?.total_width();
    if let LengthPercentageAuto::Px(fixed) = cx.tree[table].style.width {
        width = width.max(fixed);
    }
    for &caption in &structure.captions {
        width = width.max(intrinsic::outer_width(cx, caption, Strategy::Minimum)?);
    }
    Ok(width)
}

/// [§ 17.5.2 Table width algorithms](https://www.w3.org/TR/CSS2/tables.html#width-layout)
///
/// Choose the column widths of `table` placed in `available` pixels, then
/// set its content width and horizontal margins. A specified `width` is the
/// table's border-box width.
///
/// # Errors
///
/// Propagates errors from measuring the cells.
pub(crate) fn resolve_table_width(cx: &mut LayoutContext<'_>, table: LayoutId, available: f32) -> Result<()> {
    let structure = TableStructure::collect(&cx.tree, cx.boxes, table);
    resolve_edges(cx, table, &structure, available);
    let minimum = column_grid(cx, table, &structure, Strategy::Minimum)?;
    let preferred = column_grid(cx, table, &structure, Strategy::Preferred)?;

    let node = &cx.tree[table];
    let room = (available - node.margin.horizontal()).max(0.0);
    let grid = match node.style.width.resolve(Some(available)) {
        // "the used width is the greater of W and the minimum width required
        // by all the columns plus cell spacing or borders"
        Some(width) => TableSizeGrid::blend(&minimum, &preferred, width.max(minimum.total_width())),
        None if preferred.total_width() <= room => preferred,
        None => TableSizeGrid::blend(&minimum, &preferred, room.max(minimum.total_width())),
    };

    let node = &mut cx.tree[table];
    let border_box = grid.total_width();
    node.width = SizeValue::fixed((border_box - node.border.horizontal() - node.padding.horizontal()).max(0.0));
    sizing::resolve_horizontal_margins(node, border_box, available);
    if let LayoutKind::Table(data) = &mut node.kind {
        data.grid = grid;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Rows and placement
// ─────────────────────────────────────────────────────────────────────────────

/// Lay out the captions, rows and cells of a table whose content box is
/// positioned and whose columns are resolved.
///
/// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
///
/// "The caption boxes are block-level boxes that retain their own content,
/// padding, margin, and border areas, and are rendered as normal block
/// boxes inside the table wrapper box."
///
/// # Errors
///
/// Propagates errors from laying out the cells and captions.
pub(crate) fn layout_table_contents(cx: &mut LayoutContext<'_>, table: LayoutId) -> Result<()> {
    let structure = TableStructure::collect(&cx.tree, cx.boxes, table);
    let basis = cx.tree[table].containing_width;
    // Margins were solved against the table's width when it was placed.
    let margin = cx.tree[table].margin;
    resolve_edges(cx, table, &structure, basis);
    cx.tree[table].margin = margin;
    let mut grid = match &cx.tree[table].kind {
        LayoutKind::Table(data) => data.grid.clone(),
        _ => TableSizeGrid::default(),
    };
    if grid.columns() != structure.columns || grid.rows() != structure.rows.len() {
        resolve_table_width(cx, table, basis)?;
        if let LayoutKind::Table(data) = &cx.tree[table].kind {
            grid = data.grid.clone();
        }
    }

    // STEP 1: Captions go above the table box, which moves down past them.
    let border_box = cx.tree[table].border_box();
    let top = border_box.y - cx.tree[table].margin.top;
    let mut caption_height = 0.0;
    for &caption in &structure.captions {
        block::layout_detached(cx, caption, border_box.width, None)?;
        let outer = outer_box(&cx.tree[caption]);
        cx.tree
            .translate_subtree(caption, border_box.x - outer.x, top + caption_height - outer.y);
        caption_height += outer.height;
    }
    cx.tree[table].content_box.y += caption_height;
    let border_box = cx.tree[table].border_box();

    // STEP 2: Lay out each cell at its column width to learn its height.
    let table_width = cx.tree[table].width.value;
    for cell in &structure.cells {
        let width = grid.span_width(cell.column, cell.colspan);
        {
            let node = &mut cx.tree[cell.node];
            node.containing_width = table_width;
            node.containing_height = None;
            node.width = SizeValue::fixed(width);
            node.content_box = Rect::new(0.0, 0.0, width, 0.0);
        }
        block::layout_box_contents(cx, cell.node)?;
    }

    // STEP 3: Row heights.
    grid.non_content_height = vertical_gutters(cx, table, &structure);
    for (r, &row) in structure.rows.iter().enumerate() {
        // A specified row height is a minimum.
        if let LengthPercentageAuto::Px(height) = cx.tree[row].style.height {
            grid.apply_height(r, 1, height);
        }
    }
    let mut cells = structure.cells.clone();
    cells.sort_by_key(|c| c.rowspan);
    for cell in &cells {
        grid.apply_height(cell.row, cell.rowspan, cx.tree[cell.node].content_box.height);
    }

    // A specified table height larger than the rows is shared by the rows.
    let node = &cx.tree[table];
    let edges = node.border.vertical() + node.padding.vertical();
    if let Some(height) = sizing::specified_height(node)
        && grid.rows() > 0
    {
        let extra = sizing::clamp_height(node, height) - (grid.total_height() - edges);
        if extra > 0.0 {
            let share = extra / grid.rows() as f32;
            for row in &mut grid.content_height {
                *row += share;
            }
        }
    }

    // STEP 4: Place the cells.
    // [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
    //
    // "The height of a cell box is the minimum height required by the
    // content. The table cell's 'height' property can influence the height
    // of the row [...]. 'middle': The center of the cell is aligned with the
    // center of the rows it spans."
    for cell in &structure.cells {
        let height = grid.span_height(cell.row, cell.rowspan);
        let x = border_box.x + grid.column_x(cell.column);
        let y = border_box.y + grid.row_y(cell.row);
        let node = &cx.tree[cell.node];
        let slack = (height - node.content_box.height).max(0.0);
        let offset = match node.style.vertical_align {
            VerticalAlign::Middle => slack / 2.0,
            VerticalAlign::Bottom => slack,
            _ => 0.0,
        };
        let current = node.content_box;
        cx.tree.translate_subtree(cell.node, x - current.x, y - current.y + offset);
        let node = &mut cx.tree[cell.node];
        node.content_box.y = y;
        node.content_box.height = height;
        node.height = SizeValue::fixed(height);
    }

    // STEP 5: Rows, row groups and columns cover their part of the grid.
    let content = cx.tree[table].content_box;
    for (r, &row) in structure.rows.iter().enumerate() {
        let node = &mut cx.tree[row];
        node.content_box = Rect::new(
            content.x,
            border_box.y + grid.row_y(r),
            content.width,
            grid.content_height[r],
        );
        node.width = SizeValue::fixed(content.width);
        node.height = SizeValue::fixed(grid.content_height[r]);
    }
    for &(group, first, end) in &structure.groups {
        let rect = structure.rows[first..end]
            .iter()
            .map(|&r| cx.tree[r].content_box)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Rect::new(content.x, content.y, content.width, 0.0));
        let node = &mut cx.tree[group];
        node.content_box = rect;
        node.width = SizeValue::fixed(rect.width);
        node.height = SizeValue::fixed(rect.height);
    }
    let rows_height = if grid.rows() > 0 {
        grid.span_height(0, grid.rows())
    } else {
        0.0
    };
    for &(column, first, span) in &structure.column_boxes {
        if first >= grid.columns() {
            continue;
        }
        let rect = Rect::new(
            border_box.x + grid.column_x(first),
            border_box.y + grid.row_y(0),
            grid.span_width(first, span),
            rows_height,
        );
        let node = &mut cx.tree[column];
        node.content_box = rect;
        node.width = SizeValue::fixed(rect.width);
        node.height = SizeValue::fixed(rect.height);
    }

    // STEP 6: The table's own height.
    let node = &mut cx.tree[table];
    let height = (grid.total_height() - node.border.vertical() - node.padding.vertical()).max(0.0);
    let height = sizing::clamp_height(node, height).max(height);
    node.height = SizeValue::fixed(height);
    node.content_box.height = height;
    node.kind = LayoutKind::Table(TableData { grid, caption_height });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: usize) -> TableSizeGrid {
        let mut grid = TableSizeGrid::new(columns, 1);
        grid.non_content_width = vec![5.0; columns + 1];
        grid
    }

    #[test]
    fn single_cells_take_the_maximum() {
        let mut g = grid(2);
        g.apply_width(0, 1, 30.0);
        g.apply_width(0, 1, 20.0);
        g.apply_width(1, 1, 40.0);
        assert_eq!(g.content_width, vec![30.0, 40.0]);
        assert_eq!(g.total_width(), 85.0);
    }

    #[test]
    fn spans_share_the_shortfall() {
        let mut g = grid(2);
        g.apply_width(0, 1, 10.0);
        g.apply_width(1, 1, 10.0);
        // 10 + 5 + 10 = 25 available; 45 needed.
        g.apply_width(0, 2, 45.0);
        assert_eq!(g.content_width, vec![20.0, 20.0]);
        assert_eq!(g.span_width(0, 2), 45.0);
    }

    #[test]
    fn spans_that_fit_change_nothing() {
        let mut g = grid(2);
        g.apply_width(0, 1, 30.0);
        g.apply_width(0, 2, 20.0);
        assert_eq!(g.content_width, vec![30.0, 0.0]);
    }

    #[test]
    fn offsets_walk_the_gutters() {
        let mut g = grid(3);
        g.content_width = vec![10.0, 20.0, 30.0];
        assert_eq!(g.column_x(0), 5.0);
        assert_eq!(g.column_x(2), 5.0 + 10.0 + 5.0 + 20.0 + 5.0);
    }

    #[test]
    fn expand_keeps_proportions() {
        let mut g = grid(2);
        g.content_width = vec![10.0, 30.0];
        g.expand_to(95.0);
        assert_eq!(g.content_width, vec![20.0, 60.0]);
        assert_eq!(g.total_width(), 95.0);
    }

    #[test]
    fn blend_interpolates_between_grids() {
        let mut minimum = grid(2);
        minimum.content_width = vec![10.0, 10.0];
        let mut preferred = grid(2);
        preferred.content_width = vec![30.0, 50.0];
        // min total 35, preferred 95, target 65: half way.
        let g = TableSizeGrid::blend(&minimum, &preferred, 65.0);
        assert_eq!(g.content_width, vec![20.0, 30.0]);
        assert_eq!(g.total_width(), 65.0);
    }

    #[test]
    fn gutters_include_the_table_edges() {
        let g = gutters(2, &[1.0, 1.0, 0.0], &[0.0, 2.0, 2.0], 5.0, 3.0, 4.0);
        assert_eq!(g, vec![9.0, 8.0, 11.0]);
    }

    #[test]
    fn empty_table_is_only_edges() {
        let g = gutters(0, &[0.0], &[0.0], 5.0, 3.0, 4.0);
        assert_eq!(g, vec![7.0]);
    }
}
