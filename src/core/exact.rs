//! 0/1 背包的精確解：表格式動態規劃。
//!
//! `dp[i][w]` 為只使用前 `i` 個物品、總重量不超過 `w` 時可達到的最大價值。
//! 時間與空間皆為 `O(n * capacity)`。

use crate::domain::model::{Solution, TableLayout};
use crate::domain::ports::{check_solver_inputs, Solver};
use crate::utils::error::{BenchError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSolver {
    layout: TableLayout,
}

impl ExactSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: TableLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }
}

/// 表格寬度 (capacity + 1)
fn row_width(capacity: u64) -> Result<usize> {
    usize::try_from(capacity)
        .ok()
        .and_then(|c| c.checked_add(1))
        .ok_or_else(|| {
            BenchError::invalid_input(format!(
                "capacity {} is too large to index a table on this platform",
                capacity
            ))
        })
}

fn allocate_table(cells: usize) -> Result<Vec<f64>> {
    let mut table = Vec::new();
    table.try_reserve_exact(cells).map_err(|e| {
        BenchError::invalid_input(format!(
            "dp table of {} cells cannot be allocated: {}",
            cells, e
        ))
    })?;
    table.resize(cells, 0.0);
    Ok(table)
}

/// 由上一列推出下一列
fn fill_row(prev: &[f64], cur: &mut [f64], weight: u64, value: f64) {
    for (w, cell) in cur.iter_mut().enumerate() {
        *cell = if weight > w as u64 {
            prev[w]
        } else {
            prev[w].max(prev[w - weight as usize] + value)
        };
    }
}

fn fill_full_table(weights: &[u64], values: &[f64], width: usize) -> Result<Vec<f64>> {
    let rows = weights.len() + 1;
    let cells = rows.checked_mul(width).ok_or_else(|| {
        BenchError::invalid_input(format!(
            "dp table of {} x {} cells overflows the address space",
            rows, width
        ))
    })?;

    // dp[0][w] = 0
    let mut table = allocate_table(cells)?;
    for i in 1..rows {
        let (before, after) = table.split_at_mut(i * width);
        let prev = &before[(i - 1) * width..];
        fill_row(prev, &mut after[..width], weights[i - 1], values[i - 1]);
    }
    Ok(table)
}

fn fill_rolling(weights: &[u64], values: &[f64], width: usize) -> Result<f64> {
    let mut prev = allocate_table(width)?;
    let mut cur = allocate_table(width)?;
    for (&weight, &value) in weights.iter().zip(values) {
        fill_row(&prev, &mut cur, weight, value);
        std::mem::swap(&mut prev, &mut cur);
    }
    Ok(prev[width - 1])
}

/// 從完整表格回推選取的物品
fn trace_selection(table: &[f64], weights: &[u64], width: usize) -> Vec<usize> {
    let mut selected = Vec::new();
    let mut w = width - 1;
    for i in (1..=weights.len()).rev() {
        if table[i * width + w] != table[(i - 1) * width + w] {
            selected.push(i - 1);
            w -= weights[i - 1] as usize;
        }
    }
    selected.reverse();
    selected
}

impl Solver for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<f64> {
        check_solver_inputs(weights, values)?;
        let width = row_width(capacity)?;

        match self.layout {
            TableLayout::Full => {
                let table = fill_full_table(weights, values, width)?;
                Ok(table[weights.len() * width + width - 1])
            }
            TableLayout::Rolling => fill_rolling(weights, values, width),
        }
    }

    /// 回推需要完整表格，因此不論 `layout` 設定一律使用 `TableLayout::Full`
    fn solve_detailed(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<Solution> {
        check_solver_inputs(weights, values)?;
        let width = row_width(capacity)?;

        let table = fill_full_table(weights, values, width)?;
        let value = table[weights.len() * width + width - 1];
        let items = trace_selection(&table, weights, width);
        Ok(Solution { value, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_instance_optimum() {
        let solver = ExactSolver::new();
        let value = solver.solve(&[2, 3, 4, 5], &[3.0, 4.0, 5.0, 6.0], 5).unwrap();
        assert_eq!(value, 7.0);
    }

    #[test]
    fn test_gap_instance_optimum_and_trace() {
        let solver = ExactSolver::new();
        let solution = solver
            .solve_detailed(&[10, 20, 30], &[60.0, 100.0, 120.0], 50)
            .unwrap();
        assert_eq!(solution.value, 220.0);
        assert_eq!(solution.items, vec![1, 2]);
    }

    #[test]
    fn test_rolling_layout_matches_full() {
        let weights = [5, 4, 6, 3, 7, 2];
        let values = [10.0, 40.0, 30.0, 50.0, 35.0, 12.5];
        let full = ExactSolver::with_layout(TableLayout::Full);
        let rolling = ExactSolver::with_layout(TableLayout::Rolling);
        for capacity in 0..=27 {
            assert_eq!(
                full.solve(&weights, &values, capacity).unwrap(),
                rolling.solve(&weights, &values, capacity).unwrap(),
                "capacity {}",
                capacity
            );
        }
    }

    #[test]
    fn test_zero_capacity_and_empty_instance() {
        let solver = ExactSolver::new();
        assert_eq!(solver.solve(&[1, 2], &[5.0, 6.0], 0).unwrap(), 0.0);
        assert_eq!(solver.solve(&[], &[], 100).unwrap(), 0.0);
        assert_eq!(solver.solve_detailed(&[], &[], 0).unwrap().items, Vec::<usize>::new());
    }

    #[test]
    fn test_zero_weight_item_is_always_taken() {
        let solver = ExactSolver::new();
        let solution = solver.solve_detailed(&[0, 3], &[2.0, 5.0], 2).unwrap();
        assert_eq!(solution.value, 2.0);
        assert_eq!(solution.items, vec![0]);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let solver = ExactSolver::new();
        let result = solver.solve(&[1, 2, 3], &[1.0, 2.0], 10);
        assert!(matches!(result, Err(BenchError::InvalidInput { .. })));
    }

    #[test]
    fn test_negative_value_rejected() {
        let solver = ExactSolver::new();
        let result = solver.solve(&[1], &[-1.0], 10);
        assert!(matches!(result, Err(BenchError::InvalidInput { .. })));
    }

    #[test]
    fn test_trace_weight_within_capacity() {
        let weights = [12, 7, 11, 8, 9];
        let values = [24.0, 13.0, 23.0, 15.0, 16.0];
        let solution = ExactSolver::new()
            .solve_detailed(&weights, &values, 26)
            .unwrap();
        let weight: u64 = solution.items.iter().map(|&i| weights[i]).sum();
        let value: f64 = solution.items.iter().map(|&i| values[i]).sum();
        assert!(weight <= 26);
        assert_eq!(value, solution.value);
        assert_eq!(solution.value, 51.0);
    }
}
