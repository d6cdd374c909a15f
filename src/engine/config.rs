use crate::io::TypeEncoding;
use crate::model::types::Point3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the MEDYAN-style fiber engine adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiberEngineConfig {
    pub executable: PathBuf,
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    /// Base name of the rendered system file, written as `<model_name>.txt`.
    pub model_name: String,
    pub fiber_file: String,
    pub snapshot_file: String,
    /// Snapshot interval passed to the engine.
    pub snapshot: f64,
    pub time_step: f64,
    pub compartment_size: f64,
    /// Offset from the shared global frame into the engine's box frame.
    pub transform: Point3,
    pub type_encoding: TypeEncoding,
    /// Text the engine prints on success. Empty disables the check.
    pub success_marker: String,
    pub timeout_secs: Option<u64>,
    /// System configuration template. The bundled template is used when unset.
    pub template: Option<PathBuf>,
    /// Box extent used when the fiber state carries none.
    pub box_extent: Option<Point3>,
}

impl Default for FiberEngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("medyan"),
            input_directory: PathBuf::from("out/medyan/input"),
            output_directory: PathBuf::from("out/medyan/output"),
            model_name: "medyan".to_string(),
            fiber_file: "filaments.txt".to_string(),
            snapshot_file: "snapshot.traj".to_string(),
            snapshot: 1.0,
            time_step: 5.0,
            compartment_size: 500.0,
            transform: [0.0; 3],
            type_encoding: TypeEncoding::Name,
            success_marker: "Done with simulation!".to_string(),
            timeout_secs: None,
            template: None,
            box_extent: None,
        }
    }
}

impl FiberEngineConfig {
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    #[inline]
    pub fn system_file_name(&self) -> String {
        format!("{}.txt", self.model_name)
    }
}
