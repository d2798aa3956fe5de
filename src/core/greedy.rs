//! 價值密度貪婪法：依 value / weight 由大到小排序後依序放入，
//! 遇到第一個放不下的物品即停止 (不再嘗試後面較小的物品)。
//!
//! 重量為 0 的物品視為密度無限大，排在最前面並且一定放得下。
//! 密度相同的物品維持原始順序 (穩定排序)。

use crate::domain::model::Solution;
use crate::domain::ports::{check_solver_inputs, Solver};
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl GreedySolver {
    pub fn new() -> Self {
        Self
    }
}

fn density(weight: u64, value: f64) -> f64 {
    if weight == 0 {
        f64::INFINITY
    } else {
        value / weight as f64
    }
}

/// 依密度遞減排列的物品索引
pub fn rank_by_density(weights: &[u64], values: &[f64]) -> Vec<usize> {
    let densities: Vec<f64> = weights
        .iter()
        .zip(values)
        .map(|(&weight, &value)| density(weight, value))
        .collect();

    let mut order: Vec<usize> = (0..densities.len()).collect();
    order.sort_by(|&a, &b| densities[b].total_cmp(&densities[a]));
    order
}

impl Solver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<f64> {
        Ok(self.solve_detailed(weights, values, capacity)?.value)
    }

    fn solve_detailed(&self, weights: &[u64], values: &[f64], capacity: u64) -> Result<Solution> {
        check_solver_inputs(weights, values)?;

        let mut total_weight: u64 = 0;
        let mut total_value = 0.0;
        let mut items = Vec::new();

        for index in rank_by_density(weights, values) {
            match total_weight.checked_add(weights[index]) {
                Some(next) if next <= capacity => {
                    total_weight = next;
                    total_value += values[index];
                    items.push(index);
                }
                _ => break,
            }
        }

        items.sort_unstable();
        Ok(Solution {
            value: total_value,
            items,
        })
    }
}
