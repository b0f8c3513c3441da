//! Browser timing sources
//!
//! Reads the performance API through `js_sys::Reflect` rather than typed
//! `web_sys` bindings, since the vendor-prefixed globals and the Chrome
//! `loadTimes()` accessor have no typed equivalent.

use js_sys::{Array, Function, Object, Reflect};
use timing_core::{
    FieldValue, LoadTimes, NavigationEntry, PaintEntry, TimingProbe, TimingSnapshot, TimingSource,
};
use wasm_bindgen::{JsCast, JsValue};

/// Global accessors for the performance API, in preference order
pub const PERFORMANCE_ACCESSORS: [&str; 4] = [
    "performance",
    "webkitPerformance",
    "msPerformance",
    "mozPerformance",
];

/// Legacy `performance.timing` attributes, read explicitly because they live
/// on the prototype and are not own properties of the timing object
const LEGACY_FIELDS: &[&str] = &[
    "navigationStart",
    "unloadEventStart",
    "unloadEventEnd",
    "redirectStart",
    "redirectEnd",
    "fetchStart",
    "domainLookupStart",
    "domainLookupEnd",
    "connectStart",
    "connectEnd",
    "secureConnectionStart",
    "requestStart",
    "responseStart",
    "responseEnd",
    "domLoading",
    "domInteractive",
    "domContentLoadedEventStart",
    "domContentLoadedEventEnd",
    "domComplete",
    "loadEventStart",
    "loadEventEnd",
    "msFirstPaint",
];

/// Probes for every known performance global, standard name first
pub fn browser_probes() -> Vec<Box<dyn TimingProbe>> {
    PERFORMANCE_ACCESSORS
        .iter()
        .map(|&accessor| Box::new(GlobalPerformanceProbe::new(accessor)) as Box<dyn TimingProbe>)
        .collect()
}

/// Looks up one performance global on the JS global object
#[derive(Debug, Clone, Copy)]
pub struct GlobalPerformanceProbe {
    accessor: &'static str,
}

impl GlobalPerformanceProbe {
    pub fn new(accessor: &'static str) -> Self {
        Self { accessor }
    }
}

impl TimingProbe for GlobalPerformanceProbe {
    fn name(&self) -> &str {
        self.accessor
    }

    fn probe(&self) -> Option<Box<dyn TimingSource>> {
        let global: JsValue = js_sys::global().into();
        let performance = get(&global, self.accessor)?;
        Some(Box::new(WebTimingSource {
            label: format!("window.{}", self.accessor),
            global,
            performance,
        }))
    }
}

/// The performance API of the running page
pub struct WebTimingSource {
    label: String,
    global: JsValue,
    performance: JsValue,
}

impl WebTimingSource {
    fn has_global(&self, name: &str) -> bool {
        get(&self.global, name).is_some()
    }

    fn entries_by_type(&self, kind: &str) -> Vec<JsValue> {
        call_method(&self.performance, "getEntriesByType", &[JsValue::from_str(kind)])
            .and_then(|list| list.dyn_into::<Array>().ok())
            .map(|list| list.to_vec())
            .unwrap_or_default()
    }
}

impl TimingSource for WebTimingSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn snapshot(&self) -> Option<TimingSnapshot> {
        let timing = get(&self.performance, "timing")?;
        let mut snapshot = TimingSnapshot::new();

        if let Some(json) = call_method(&timing, "toJSON", &[]) {
            read_entries(&json, &mut snapshot);
        }
        read_entries(&timing, &mut snapshot);
        for name in LEGACY_FIELDS {
            if let Some(value) = get(&timing, name) {
                snapshot.insert(*name, field_value(&value));
            }
        }

        Some(snapshot)
    }

    fn time_origin(&self) -> Option<f64> {
        get(&self.performance, "timeOrigin")?.as_f64()
    }

    fn navigation_entries(&self) -> Option<Vec<NavigationEntry>> {
        if !self.has_global("PerformanceNavigationTiming") {
            return None;
        }
        let entries = self
            .entries_by_type("navigation")
            .iter()
            .map(|entry| NavigationEntry {
                load_event_end: get_f64(entry, "loadEventEnd").unwrap_or(f64::NAN),
            })
            .collect();
        Some(entries)
    }

    fn paint_entries(&self) -> Option<Vec<PaintEntry>> {
        if !self.has_global("PerformancePaintTiming") {
            return None;
        }
        let entries = self
            .entries_by_type("paint")
            .iter()
            .map(|entry| PaintEntry {
                name: get(entry, "name")
                    .and_then(|name| name.as_string())
                    .unwrap_or_default(),
                start_time: get_f64(entry, "startTime").unwrap_or(0.0),
            })
            .collect();
        Some(entries)
    }

    fn load_times(&self) -> Option<LoadTimes> {
        let chrome = get(&self.global, "chrome")?;
        let load_times = call_method(&chrome, "loadTimes", &[])?;
        Some(LoadTimes {
            first_paint_time: get_f64(&load_times, "firstPaintTime").unwrap_or(f64::NAN),
            start_load_time: get_f64(&load_times, "startLoadTime").unwrap_or(f64::NAN),
        })
    }
}

/// `target[key]`, treating `undefined`, `null` and getter exceptions as absent
pub(crate) fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(key)).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}

fn get_f64(target: &JsValue, key: &str) -> Option<f64> {
    get(target, key)?.as_f64()
}

fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Option<JsValue> {
    let method = get(target, name)?.dyn_into::<Function>().ok()?;
    let args: Array = args.iter().collect();
    let result = method.apply(target, &args).ok()?;
    (!result.is_undefined() && !result.is_null()).then_some(result)
}

/// Copy the own enumerable properties of a JS object into the snapshot
fn read_entries(object: &JsValue, snapshot: &mut TimingSnapshot) {
    if !object.is_object() {
        return;
    }
    for entry in Object::entries(object.unchecked_ref::<Object>()).iter() {
        let pair: Array = entry.unchecked_into();
        if let Some(name) = pair.get(0).as_string() {
            snapshot.insert(name, field_value(&pair.get(1)));
        }
    }
}

fn field_value(value: &JsValue) -> FieldValue {
    if let Some(number) = value.as_f64() {
        FieldValue::Number(number)
    } else if let Some(text) = value.as_string() {
        FieldValue::Text(text)
    } else if let Some(flag) = value.as_bool() {
        FieldValue::Other(serde_json::Value::Bool(flag))
    } else if value.is_null() {
        FieldValue::Other(serde_json::Value::Null)
    } else {
        // undefined, objects and functions subtract to NaN
        FieldValue::Other(serde_json::Value::Object(serde_json::Map::new()))
    }
}
