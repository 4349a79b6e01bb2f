//! Responsive column layout for the pull-request table.
//!
//! Given the record set and the width left over after the fzf overlay,
//! [`compute_layout`] decides which optional columns are shown and how wide
//! each variable column gets. Fixed columns (number, +/- counts, file count)
//! are sized to their widest value and never shrink: the `#<num>` prefix and
//! the `+a/-d` pair are parsed back out of the selected line, so corrupting
//! them is not an option. Variable columns shrink down to per-column
//! minimums, and whole columns are dropped in a fixed order when even the
//! minimums don't fit.
//!
//! The function is total: when nothing fits it settles on minimum widths
//! with only the branch column (and the fixed columns) visible and lets the
//! line overflow rather than failing.

use crate::display::display_width;
use crate::model::PullRequest;

/// Floor for the PR-number column, wide enough for `#9999`.
pub const NUMBER_MIN_WIDTH: usize = 4;

/// Cells reserved for the date column when shown: two-cell separator plus a
/// 20-character RFC 3339 timestamp.
const DATE_COLUMN_COST: usize = 22;

/// Cells between adjacent columns.
const SEPARATOR_WIDTH: usize = 2;

/// A column whose width follows its content, bounded below by a minimum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarColumn {
    Title,
    Author,
    Branch,
}

impl VarColumn {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            Self::Title => 0,
            Self::Author => 1,
            Self::Branch => 2,
        }
    }

    /// Narrowest useful width for the column; shrinking stops here.
    pub fn min_width(self) -> usize {
        match self {
            Self::Title => 15,
            Self::Author => 6,
            Self::Branch => 12,
        }
    }

    fn field(self, pr: &PullRequest) -> &str {
        match self {
            Self::Title => &pr.title,
            Self::Author => &pr.author_name,
            Self::Branch => &pr.head_ref_name,
        }
    }
}

/// Order in which variable columns absorb shrinkage. The first column is
/// narrowed first; later columns only shrink if that did not free enough
/// room. Branch comes last and is additionally exempt from removal.
pub const SHRINK_PRIORITY: [VarColumn; VarColumn::COUNT] =
    [VarColumn::Title, VarColumn::Author, VarColumn::Branch];

/// A column that can be removed entirely under space pressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropColumn {
    /// Fixed-width changed-files column.
    Files,
    /// Fixed-width date column.
    Date,
    /// A variable column (branch never appears here).
    Var(VarColumn),
}

/// Order in which columns are removed when minimum widths still overflow.
pub const DROP_ORDER: [DropColumn; 4] = [
    DropColumn::Files,
    DropColumn::Date,
    DropColumn::Var(VarColumn::Title),
    DropColumn::Var(VarColumn::Author),
];

/// The computed column assignment for one render pass.
///
/// Fixed widths are always populated; a variable column's width is 0 when
/// the matching `show_*` flag is off (branch has no flag and is always
/// shown). Plans carry no state between calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnPlan {
    pub number_width: usize,
    pub added_width: usize,
    pub deleted_width: usize,
    pub files_width: usize,

    pub title_width: usize,
    pub author_width: usize,
    pub branch_width: usize,

    pub show_files: bool,
    pub show_date: bool,
    pub show_title: bool,
    pub show_author: bool,
}

fn digit_count(value: u64) -> usize {
    value.to_string().len()
}

/// Budget left for variable-column content after fixed costs, the currently
/// visible droppable columns, and per-column separators. Signed: a narrow
/// terminal can push this negative, which drives the degradation loop.
fn remaining_budget(
    base: isize,
    show_files: bool,
    files_cost: usize,
    show_date: bool,
    visible_vars: usize,
) -> isize {
    let mut avail = base;
    if show_files {
        avail -= files_cost as isize;
    }
    if show_date {
        avail -= DATE_COLUMN_COST as isize;
    }
    avail - (SEPARATOR_WIDTH * visible_vars) as isize
}

/// One fitting pass over `cols` (in shrink-priority order) against `avail`.
///
/// If the natural widths fit, every column gets its natural width. Otherwise
/// columns are visited in order and each is assigned the width left after
/// accounting for the others (already-assigned widths for earlier columns,
/// natural widths standing in for unvisited ones), clamped to
/// `[min_width, natural]`. As soon as the running total fits, remaining
/// unassigned columns take their natural width and the pass succeeds.
///
/// This is a deliberate one-pass heuristic: earlier columns are never
/// revisited after a later one shrinks, so the budget can end up slightly
/// under-used. Callers (and tests) depend on these exact tie-breaks.
fn try_fit(
    avail: isize,
    cols: &[VarColumn],
    natural: &[usize; VarColumn::COUNT],
    assigned: &mut [Option<usize>; VarColumn::COUNT],
) -> bool {
    let width_of = |col: VarColumn, assigned: &[Option<usize>; VarColumn::COUNT]| {
        assigned[col.index()].unwrap_or(natural[col.index()]) as isize
    };

    let nat_total: isize = cols.iter().map(|c| natural[c.index()] as isize).sum();
    if nat_total <= avail {
        for &col in cols {
            assigned[col.index()] = Some(natural[col.index()]);
        }
        return true;
    }

    for (i, &col) in cols.iter().enumerate() {
        let others: isize = cols
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, &c)| width_of(c, assigned))
            .sum();
        let width = (avail - others)
            .max(col.min_width() as isize)
            .min(natural[col.index()] as isize);
        assigned[col.index()] = Some(width as usize);

        let total: isize = cols.iter().map(|&c| width_of(c, assigned)).sum();
        if total <= avail {
            for &later in &cols[i + 1..] {
                if assigned[later.index()].is_none() {
                    assigned[later.index()] = Some(natural[later.index()]);
                }
            }
            return true;
        }
    }
    false
}

/// Compute the column plan for `prs` within `available_width` cells.
///
/// `available_width` is the terminal width minus whatever margin the
/// selector overlay reserves; it may be zero or negative, in which case the
/// plan degrades to its minimal form immediately.
pub fn compute_layout(prs: &[PullRequest], available_width: isize) -> ColumnPlan {
    if prs.is_empty() {
        return ColumnPlan {
            number_width: NUMBER_MIN_WIDTH,
            added_width: 0,
            deleted_width: 0,
            files_width: 0,
            title_width: 0,
            author_width: 0,
            branch_width: 0,
            show_files: true,
            show_date: true,
            show_title: true,
            show_author: true,
        };
    }

    let mut number_width = NUMBER_MIN_WIDTH;
    let mut added_width = 1;
    let mut deleted_width = 1;
    let mut files_width = 1;
    for pr in prs {
        number_width = number_width.max(digit_count(pr.number));
        added_width = added_width.max(digit_count(pr.additions));
        deleted_width = deleted_width.max(digit_count(pr.deletions));
        files_width = files_width.max(digit_count(pr.changed_files));
    }

    let mut natural = [0usize; VarColumn::COUNT];
    for pr in prs {
        for col in SHRINK_PRIORITY {
            natural[col.index()] = natural[col.index()].max(display_width(col.field(pr)));
        }
    }

    // `#N  ` plus the `+a/-d` pair and their separators.
    let required = (number_width + 3) + (added_width + deleted_width + 3);
    let base_avail = available_width - required as isize;

    // `  N files  `
    let files_cost = files_width + 10;

    let mut show_files = true;
    let mut show_date = true;
    let mut show_var = [true; VarColumn::COUNT];
    let mut assigned: [Option<usize>; VarColumn::COUNT] = [None; VarColumn::COUNT];

    let visible = |show_var: &[bool; VarColumn::COUNT]| -> Vec<VarColumn> {
        SHRINK_PRIORITY
            .into_iter()
            .filter(|col| show_var[col.index()])
            .collect()
    };

    let cols = visible(&show_var);
    let avail = remaining_budget(base_avail, show_files, files_cost, show_date, cols.len());
    if !try_fit(avail, &cols, &natural, &mut assigned) {
        // Even fully shrunk nothing fits: pin every variable column at its
        // minimum, then remove columns one at a time until a re-fit succeeds.
        for col in SHRINK_PRIORITY {
            assigned[col.index()] = Some(col.min_width());
        }

        for drop in DROP_ORDER {
            let cols = visible(&show_var);
            let avail = remaining_budget(base_avail, show_files, files_cost, show_date, cols.len());
            let total: isize = cols
                .iter()
                .map(|c| assigned[c.index()].unwrap_or(natural[c.index()]) as isize)
                .sum();
            if total <= avail {
                break;
            }

            match drop {
                DropColumn::Files => show_files = false,
                DropColumn::Date => show_date = false,
                DropColumn::Var(col) => {
                    show_var[col.index()] = false;
                    assigned[col.index()] = None;
                }
            }

            let cols = visible(&show_var);
            let avail = remaining_budget(base_avail, show_files, files_cost, show_date, cols.len());
            if try_fit(avail, &cols, &natural, &mut assigned) {
                break;
            }
        }
    }

    let var_width = |col: VarColumn| {
        if show_var[col.index()] {
            assigned[col.index()].unwrap_or(0)
        } else {
            0
        }
    };

    ColumnPlan {
        number_width,
        added_width,
        deleted_width,
        files_width,
        title_width: var_width(VarColumn::Title),
        author_width: var_width(VarColumn::Author),
        branch_width: var_width(VarColumn::Branch),
        show_files,
        show_date,
        show_title: show_var[VarColumn::Title.index()],
        show_author: show_var[VarColumn::Author.index()],
    }
}
