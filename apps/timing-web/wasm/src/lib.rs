//! WASM bindings for navigation timing metrics
//!
//! Exposes the timing collector to JavaScript. The collector and its metric
//! registry live in Rust; JavaScript only registers producers and reads
//! results.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { collect, register, printTable, printSimpleTable } from './pkg/timing_wasm.js';
//!
//! await init();
//!
//! // Constant and computed metrics
//! register('budget', 1500);
//! register('overBudget', (m) => m.loadTime > 1500 ? 1 : 0);
//!
//! // A producer may write extra keys and return nothing
//! register('ttfb', (m) => { m.ttfbStart = m.requestStart; m.ttfbEnd = m.responseStart; });
//!
//! const metrics = collect();            // false when no performance API exists
//! const summary = collect({ simple: true });
//!
//! printTable();                         // console.table of { ms, s } rows
//! printSimpleTable();
//! ```

pub mod logging;
pub mod platform;
pub mod producer;

use std::cell::RefCell;

use js_sys::Reflect;
use serde::Serialize;
use timing_core::{CollectOptions, Collector};
use wasm_bindgen::prelude::*;

/// Seconds column precision of the printed tables
const TABLE_PRECISION: u8 = 2;

thread_local! {
    static COLLECTOR: RefCell<Collector> = RefCell::new(Collector::new(platform::browser_probes()));
}

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Collect timing metrics
///
/// Returns an object of metric name to value, or `false` when the page has
/// no performance API. `opts.simple` (truthy) leaves out the raw timing fields.
#[wasm_bindgen]
pub fn collect(opts: JsValue) -> Result<JsValue, JsValue> {
    let opts = collect_options(&opts);
    match with_collector(|collector| collector.collect(&opts)) {
        Some(metrics) => to_js(&metrics),
        None => Ok(JsValue::FALSE),
    }
}

/// Register or overwrite a custom metric
///
/// `producer` is either a number or a function receiving the metrics
/// collected so far.
#[wasm_bindgen]
pub fn register(name: String, producer: JsValue) -> Result<(), JsValue> {
    let producer = producer::producer_from_js(producer)?;
    // A running collection holds a shared borrow, so this fails inside a producer
    COLLECTOR.with(|collector| {
        collector
            .try_borrow_mut()
            .map(|mut collector| collector.register(name, producer))
            .map_err(|_| JsValue::from_str("register() cannot be called from inside a metric producer"))
    })
}

/// Print all metrics with `console.table`
#[wasm_bindgen(js_name = printTable)]
pub fn print_table(opts: JsValue) -> Result<(), JsValue> {
    let opts = collect_options(&opts);
    let table = with_collector(|collector| collector.timing_table(&opts, TABLE_PRECISION));

    web_sys::console::table_1(&to_js(&table.to_map())?);
    Ok(())
}

/// Print metrics without the raw timing fields
#[wasm_bindgen(js_name = printSimpleTable)]
pub fn print_simple_table() -> Result<(), JsValue> {
    let opts = js_sys::Object::new();
    Reflect::set(&opts, &JsValue::from_str("simple"), &JsValue::TRUE)?;
    print_table(opts.into())
}

/// Run `f` against the shared collector.
///
/// The mutable borrow taken by `register` never spans a call into JS, so this
/// shared borrow cannot conflict with it.
fn with_collector<R>(f: impl FnOnce(&Collector) -> R) -> R {
    COLLECTOR.with(|collector| f(&collector.borrow()))
}

fn collect_options(opts: &JsValue) -> CollectOptions {
    if !opts.is_object() {
        return CollectOptions::default();
    }
    CollectOptions {
        simple: platform::get(opts, "simple").is_some_and(|simple| simple.is_truthy()),
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
