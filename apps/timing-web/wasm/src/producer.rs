//! JavaScript metric producers
//!
//! A JS producer is called with a plain object holding the metrics collected
//! so far. Whatever numbers it leaves on that object are merged back, so a
//! producer may publish extra keys instead of (or as well as) returning a
//! value. Returning `undefined` leaves the producer's own key out.

use anyhow::anyhow;
use js_sys::{Array, Function, Object, Reflect};
use timing_core::{Metrics, Producer};
use wasm_bindgen::{JsCast, JsValue};

/// Convert a value passed to `register` into a [`Producer`]
pub fn producer_from_js(value: JsValue) -> Result<Producer, JsValue> {
    if let Some(function) = value.dyn_ref::<Function>() {
        let function = function.clone();
        return Ok(Producer::compute(move |metrics: &mut Metrics| {
            call_producer(&function, metrics)
        }));
    }

    value
        .as_f64()
        .map(Producer::constant)
        .ok_or_else(|| JsValue::from_str("A metric producer must be a function or a number"))
}

fn call_producer(function: &Function, metrics: &mut Metrics) -> anyhow::Result<Option<f64>> {
    let object = metrics_to_object(metrics);
    let result = function.call1(&JsValue::UNDEFINED, &object);

    // Writes made before a throw are kept too
    merge_from_object(&object, metrics);

    let value = result.map_err(|e| anyhow!(describe_js_error(&e)))?;
    if value.is_undefined() {
        return Ok(None);
    }
    // Non-numbers go through `Number(..)`, so `null` is stored as 0
    Ok(Some(
        value
            .as_f64()
            .unwrap_or_else(|| js_sys::Number::new(&value).value_of()),
    ))
}

fn metrics_to_object(metrics: &Metrics) -> Object {
    let object = Object::new();
    for (name, value) in metrics.iter() {
        // Setting a data property on a fresh plain object cannot fail
        let _ = Reflect::set(&object, &JsValue::from_str(name), &JsValue::from_f64(value));
    }
    object
}

/// Replace `metrics` with the numeric properties of `object`
fn merge_from_object(object: &Object, metrics: &mut Metrics) {
    metrics.clear();
    for entry in Object::entries(object).iter() {
        let pair: Array = entry.unchecked_into();
        if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_f64()) {
            metrics.insert(name, value);
        }
    }
}

fn describe_js_error(error: &JsValue) -> String {
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    error
        .as_string()
        .unwrap_or_else(|| format!("{:?}", error))
}
