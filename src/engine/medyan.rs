use super::config::FiberEngineConfig;
use super::error::Error;
use super::process::{Invoker, ProcessInvoker};
use super::template::{ConfigRenderer, PlaceholderTemplate};
use super::FiberEngine;
use crate::geometry::translate;
use crate::io::{self, TrajectoryCodec};
use crate::model::fiber::{Fiber, FiberState};
use crate::model::types::Point3;
use crate::translate::crop_to_box;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use tracing::{debug, info, warn};

const AXIS_KEYS: [&str; 3] = ["n_compartments_x", "n_compartments_y", "n_compartments_z"];

/// Fiber engine adapter driving a MEDYAN-style executable through files.
///
/// One step writes the filament listing and the rendered system file into the
/// input directory, runs the engine, and reads the last timepoint of its
/// snapshot back. Fiber points are moved into the engine frame by the
/// configured offset on the way in and back out on the way out.
#[derive(Debug)]
pub struct MedyanEngine<I = ProcessInvoker, R = PlaceholderTemplate> {
    config: FiberEngineConfig,
    codec: TrajectoryCodec,
    invoker: I,
    renderer: R,
}

impl MedyanEngine {
    /// Builds the adapter with a real process invoker and the configured
    /// template (the bundled one when none is set).
    pub fn new(config: FiberEngineConfig) -> Result<Self, Error> {
        let renderer = match &config.template {
            Some(path) => PlaceholderTemplate::new(
                fs::read_to_string(path).map_err(|e| Error::io(path, e))?,
            ),
            None => PlaceholderTemplate::bundled(),
        };
        let invoker = ProcessInvoker::new(&config.executable)
            .with_success_marker(config.success_marker.as_str())
            .with_timeout(config.timeout());
        Ok(Self::with_parts(config, invoker, renderer))
    }
}

impl<I: Invoker, R: ConfigRenderer> MedyanEngine<I, R> {
    pub fn with_parts(config: FiberEngineConfig, invoker: I, renderer: R) -> Self {
        let codec = TrajectoryCodec::new(config.type_encoding);
        Self {
            config,
            codec,
            invoker,
            renderer,
        }
    }

    #[inline]
    pub fn config(&self) -> &FiberEngineConfig {
        &self.config
    }

    #[inline]
    pub fn codec(&self) -> &TrajectoryCodec {
        &self.codec
    }

    fn box_extent(&self, state: &FiberState) -> Result<Point3, Error> {
        if state.has_box_extent() {
            return Ok(state.box_extent);
        }
        match self.config.box_extent {
            Some(extent) => {
                warn!(?extent, "fiber state has no box extent, using configured one");
                Ok(extent)
            }
            None => Err(Error::MissingBoxExtent),
        }
    }

    /// Moves fibers into the engine frame and crops them to its box.
    fn prepare(&self, state: &FiberState, extent: Point3) -> BTreeMap<String, Fiber> {
        let framed: BTreeMap<String, Fiber> = state
            .fibers
            .iter()
            .map(|(id, fiber)| {
                let points = translate(&fiber.points, self.config.transform, false);
                (id.clone(), Fiber { points, ..fiber.clone() })
            })
            .collect();
        let cropped = crop_to_box(&framed, [0.0; 3], extent);
        if cropped.len() < framed.len() {
            debug!(
                dropped = framed.len() - cropped.len(),
                "fibers outside the engine box"
            );
        }
        cropped
    }

    fn render_params(
        &self,
        fibers: &BTreeMap<String, Fiber>,
        extent: Point3,
        dt: f64,
    ) -> BTreeMap<&'static str, String> {
        let size = self.config.compartment_size;
        let types: BTreeSet<&str> = fibers.values().map(|f| f.type_name.as_str()).collect();
        let snapshot_time = self.config.snapshot.min(dt);

        let mut params = BTreeMap::from([
            ("fiber_file", self.config.fiber_file.clone()),
            ("num_fiber_types", types.len().max(1).to_string()),
            ("timestep", dt.to_string()),
            ("snapshot_time", snapshot_time.to_string()),
            ("compartment_size", size.to_string()),
        ]);
        for (key, axis_extent) in AXIS_KEYS.into_iter().zip(extent) {
            params.insert(key, n_compartments(axis_extent, size).to_string());
        }
        params
    }
}

/// Compartments along one axis, `round(extent / compartment_size)`, at least one.
pub fn n_compartments(extent: f64, compartment_size: f64) -> u64 {
    ((extent / compartment_size).round() as u64).max(1)
}

impl<I: Invoker, R: ConfigRenderer> FiberEngine for MedyanEngine<I, R> {
    fn step(&mut self, state: &FiberState, dt: f64) -> Result<FiberState, Error> {
        let extent = self.box_extent(state)?;
        let fibers = self.prepare(state, extent);

        let input = self.config.input_directory.clone();
        let output = self.config.output_directory.clone();
        for dir in [&input, &output] {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }

        let listing = input.join(&self.config.fiber_file);
        let file = File::create(&listing).map_err(|e| Error::io(&listing, e))?;
        let submitted = self.codec.write_filaments(BufWriter::new(file), fibers.values())?;

        let params = self.render_params(&fibers, extent, dt);
        let system_text = self.renderer.render(&params)?;
        let system_name = self.config.system_file_name();
        let system_path = input.join(&system_name);
        fs::write(&system_path, &system_text).map_err(|e| Error::io(&system_path, e))?;

        let recovered = io::recover_box_extent(&system_text)?;
        let box_extent = if recovered.iter().all(|&v| v > 0.0) {
            recovered
        } else {
            warn!(?recovered, "rendered configuration lacks box geometry, keeping previous extent");
            extent
        };

        let snapshot_path = output.join(&self.config.snapshot_file);
        match fs::remove_file(&snapshot_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                return Err(Error::io(&snapshot_path, e));
            }
            _ => {}
        }

        info!(fibers = submitted.len(), dt, "running fiber engine");
        let engine_output = self.invoker.invoke(&input, &output, &system_name)?;
        debug!(output = %engine_output, "fiber engine finished");

        let snapshot = File::open(&snapshot_path).map_err(|e| Error::io(&snapshot_path, e))?;
        let decoded = self.codec.decode_snapshot(BufReader::new(snapshot))?;
        let remapped = io::remap_fiber_ids(&submitted, decoded)?;

        Ok(FiberState::with_fibers(
            box_extent,
            remapped.into_values().map(|mut fiber| {
                fiber.points = translate(&fiber.points, self.config.transform, true);
                fiber
            }),
        ))
    }
}
