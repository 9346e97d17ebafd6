#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Generate bone chains along 3D curves.
//!
//! [`rig`] holds the host-independent pipeline, [`host`] the traits a scene
//! application implements plus an in-memory scene, and [`RigEngine`] exposes
//! the in-memory scene to JavaScript.

pub mod geom;
pub mod host;
pub mod rig;

use std::fmt;

use geom::{Point3, Transform};
use host::{CurveHandle, MemoryScene, ObjectId, RigAssembler, RigContext, RigOutcome};
use rig::{RigError, RigOptions};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Malformed input handed over from JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("coordinate list length {0} is not a multiple of 3")]
    RaggedCoordinates(usize),
    #[error("transform needs 16 finite values, got {0}")]
    BadMatrix(usize),
    #[error("object {0} is not a curve")]
    NotACurve(u32),
    #[error("object {0} is not an armature")]
    NotAnArmature(u32),
}

/// Public entry point for JavaScript consumers: an in-memory scene with an
/// active-object slot and a rig generator.
#[wasm_bindgen]
pub struct RigEngine {
    scene: MemoryScene,
    assembler: RigAssembler,
    context: RigContext,
}

impl Default for RigEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RigEngine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> RigEngine {
        RigEngine {
            scene: MemoryScene::new(),
            assembler: RigAssembler::default(),
            context: RigContext::default(),
        }
    }

    /// Add a tessellated curve given as `[x0, y0, z0, x1, ...]` in local
    /// space. Returns its object id.
    #[wasm_bindgen]
    pub fn add_curve(&mut self, name: &str, flat_xyz: Vec<f64>) -> Result<u32, JsValue> {
        let points = points_from_flat(&flat_xyz).map_err(to_js_error)?;
        Ok(self.scene.add_curve(name, points).id().0)
    }

    /// Set a curve's local-to-world matrix from 16 row-major values.
    #[wasm_bindgen]
    pub fn set_curve_transform(&mut self, id: u32, matrix: Vec<f64>) -> Result<(), JsValue> {
        let transform = Transform::from_row_major(&matrix)
            .ok_or(InputError::BadMatrix(matrix.len()))
            .map_err(to_js_error)?;
        let curve = self.curve(id).map_err(to_js_error)?;
        self.scene
            .set_curve_transform(curve, transform)
            .map_err(to_js_error)
    }

    /// Make object `id` the active object. It need not be a curve.
    #[wasm_bindgen]
    pub fn set_active(&mut self, id: u32) {
        self.context = RigContext::with_active(ObjectId(id));
    }

    #[wasm_bindgen]
    pub fn clear_active(&mut self) {
        self.context = RigContext::default();
    }

    /// Rig the active curve. `options` is `{ boneCount, equalLength,
    /// addIkTarget }` with every field optional; `undefined` uses defaults.
    #[wasm_bindgen]
    pub fn rig_active(&mut self, options: JsValue) -> Result<JsValue, JsValue> {
        let options: RigOptions = if options.is_undefined() || options.is_null() {
            RigOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
        };

        let outcome = self.rig_with(&options).map_err(to_js_error)?;
        for entry in &outcome.report.entries {
            log::info!("{entry}");
            debug_log!("{entry}");
        }
        serde_wasm_bindgen::to_value(&outcome).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Bones and constraints of a generated armature.
    #[wasm_bindgen]
    pub fn get_armature(&self, id: u32) -> Result<JsValue, JsValue> {
        let armature = self
            .scene
            .armature(host::ArmatureHandle(ObjectId(id)))
            .ok_or(InputError::NotAnArmature(id))
            .map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(armature).map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    #[must_use]
    pub fn armature_count(&self) -> usize {
        self.scene.armature_count()
    }
}

impl RigEngine {
    /// Rig the active curve with already parsed options.
    ///
    /// # Errors
    ///
    /// See [`RigAssembler::run`].
    pub fn rig_with(&mut self, options: &RigOptions) -> Result<RigOutcome, RigError> {
        self.assembler.run(&mut self.scene, &self.context, options)
    }

    #[must_use]
    pub fn scene(&self) -> &MemoryScene {
        &self.scene
    }

    fn curve(&self, id: u32) -> Result<CurveHandle, InputError> {
        let handle = CurveHandle(ObjectId(id));
        self.scene
            .curve(handle)
            .map(|_| handle)
            .ok_or(InputError::NotACurve(id))
    }
}

/// Group a flat coordinate list into points.
///
/// # Errors
///
/// [`InputError::RaggedCoordinates`] when the length is not a multiple of 3.
pub fn points_from_flat(flat: &[f64]) -> Result<Vec<Point3>, InputError> {
    if flat.len() % 3 != 0 {
        return Err(InputError::RaggedCoordinates(flat.len()));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|xyz| Point3::new(xyz[0], xyz[1], xyz[2]))
        .collect())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_xyz(points: usize) -> Vec<f64> {
        (0..points).flat_map(|i| [i as f64, 0.0, 0.0]).collect()
    }

    #[test]
    fn flat_coordinates_group_into_points() {
        let points = points_from_flat(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(
            points,
            vec![Point3::new(0.0, 1.0, 2.0), Point3::new(3.0, 4.0, 5.0)]
        );
        assert_eq!(
            points_from_flat(&[1.0, 2.0]),
            Err(InputError::RaggedCoordinates(2))
        );
    }

    #[test]
    fn engine_rigs_active_curve() {
        let mut engine = RigEngine::new();
        let id = engine.add_curve("Curve", line_xyz(11)).unwrap();
        engine.set_active(id);

        let outcome = engine
            .rig_with(&RigOptions {
                bone_count: 5,
                equal_length: true,
                add_ik_target: false,
            })
            .unwrap();
        assert_eq!(outcome.plan.chain_length(), 5);
        assert_eq!(engine.armature_count(), 1);
        assert!(engine.scene().armature(outcome.armature).is_some());
    }

    #[test]
    fn engine_without_active_curve_fails() {
        let mut engine = RigEngine::new();
        engine.add_curve("Curve", line_xyz(4)).unwrap();
        engine.clear_active();
        assert_eq!(
            engine.rig_with(&RigOptions::default()),
            Err(RigError::NoCurveSelected)
        );
        assert_eq!(engine.armature_count(), 0);
    }

    #[test]
    fn engine_transform_reaches_the_rig() {
        let mut engine = RigEngine::new();
        let id = engine.add_curve("Curve", line_xyz(3)).unwrap();
        #[rustfmt::skip]
        let matrix = vec![
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 7.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        engine.set_curve_transform(id, matrix).unwrap();
        engine.set_active(id);

        let outcome = engine
            .rig_with(&RigOptions {
                bone_count: 2,
                ..RigOptions::default()
            })
            .unwrap();
        assert_eq!(outcome.plan.bones()[0].head, Point3::new(0.0, 7.0, 0.0));
        assert!(engine.set_curve_transform(id, vec![1.0; 4]).is_err());
    }
}
