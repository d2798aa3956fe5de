//! 記憶體量測：以 `GlobalAlloc` 包裝系統配置器，統計量測視窗內的配置量。
//!
//! 計數為每執行緒獨立。量測視窗開始前已配置的區塊若在視窗內釋放，
//! 目前用量會在 0 處截止，不會變成負值。

use crate::utils::error::{BenchError, Result};
use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::marker::PhantomData;

pub struct TrackingAllocator;

struct TrackingState {
    active: Cell<bool>,
    current: Cell<usize>,
    peak: Cell<usize>,
}

thread_local! {
    static STATE: TrackingState = const {
        TrackingState {
            active: Cell::new(false),
            current: Cell::new(0),
            peak: Cell::new(0),
        }
    };
}

fn record_alloc(size: usize) {
    // 執行緒結束時 TLS 可能已失效，忽略即可
    let _ = STATE.try_with(|state| {
        if state.active.get() {
            let current = state.current.get().saturating_add(size);
            state.current.set(current);
            if current > state.peak.get() {
                state.peak.set(current);
            }
        }
    });
}

fn record_dealloc(size: usize) {
    let _ = STATE.try_with(|state| {
        if state.active.get() {
            state.current.set(state.current.get().saturating_sub(size));
        }
    });
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// 量測視窗。建立時開始追蹤，drop 時停止並重置計數。
///
/// 同一執行緒同時只能有一個視窗；重複啟動會回傳 `MeasurementFailure`。
pub struct MemoryTracker {
    // 追蹤狀態屬於建立它的執行緒
    _not_send: PhantomData<*const ()>,
}

impl MemoryTracker {
    pub fn start() -> Result<Self> {
        tracing::debug!("Starting memory tracking");
        STATE
            .try_with(|state| {
                if state.active.get() {
                    return Err(BenchError::measurement(
                        "memory tracking is already active on this thread",
                    ));
                }
                state.current.set(0);
                state.peak.set(0);
                state.active.set(true);
                Ok(())
            })
            .map_err(|_| BenchError::measurement("thread-local tracking state is unavailable"))??;

        Ok(Self {
            _not_send: PhantomData,
        })
    }

    pub fn current_bytes(&self) -> usize {
        STATE.try_with(|state| state.current.get()).unwrap_or(0)
    }

    pub fn peak_bytes(&self) -> usize {
        STATE.try_with(|state| state.peak.get()).unwrap_or(0)
    }

    pub fn peak_kb(&self) -> f64 {
        self.peak_bytes() as f64 / 1024.0
    }

    /// 結束量測並回傳峰值 (KB)
    pub fn stop(self) -> f64 {
        let peak = self.peak_kb();
        drop(self);
        tracing::debug!("Memory tracking stopped, peak {:.2} KB", peak);
        peak
    }
}

impl Drop for MemoryTracker {
    fn drop(&mut self) {
        let _ = STATE.try_with(|state| {
            state.active.set(false);
            state.current.set(0);
            state.peak.set(0);
        });
    }
}

pub fn is_tracking() -> bool {
    STATE.try_with(|state| state.active.get()).unwrap_or(false)
}
