// 領域層：背包實例、基準紀錄與各個埠 (trait)

pub mod model;
pub mod ports;
