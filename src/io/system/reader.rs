use crate::io::{Format, error::Error};
use crate::model::types::Point3;
use tracing::warn;

const AXES: [&str; 3] = ["X", "Y", "Z"];

#[derive(Clone, Copy)]
enum GeometryKey {
    Count(usize),
    Size(usize),
}

fn geometry_key(key: &str) -> Option<GeometryKey> {
    let axis = |rest: &str| AXES.iter().position(|a| *a == rest);
    if let Some(rest) = key.strip_prefix("COMPARTMENTSIZE") {
        axis(rest).map(GeometryKey::Size)
    } else if let Some(rest) = key.strip_prefix('N') {
        axis(rest).map(GeometryKey::Count)
    } else {
        None
    }
}

/// Recovers the simulation box extent from rendered configuration text.
///
/// Each axis is `N<axis>` (compartment count) times `COMPARTMENTSIZE<axis>`.
/// Missing keys count as zero; a zero axis therefore means "unknown".
pub fn recover_box_extent(config_text: &str) -> Result<Point3, Error> {
    let mut counts = [None; 3];
    let mut sizes = [None; 3];

    for (i, raw) in config_text.lines().enumerate() {
        let content = raw.split('#').next().unwrap_or_default();
        let Some((key, value)) = content.split_once(':') else {
            continue;
        };
        let key = key.trim();
        match geometry_key(key) {
            Some(GeometryKey::Count(axis)) => counts[axis] = Some(parse_value(value, i + 1, key)?),
            Some(GeometryKey::Size(axis)) => sizes[axis] = Some(parse_value(value, i + 1, key)?),
            None => {}
        }
    }

    let mut extent = [0.0; 3];
    for (axis, name) in AXES.iter().enumerate() {
        if counts[axis].is_none() {
            warn!(key = %format!("N{name}"), "geometry key missing, using 0");
        }
        if sizes[axis].is_none() {
            warn!(key = %format!("COMPARTMENTSIZE{name}"), "geometry key missing, using 0");
        }
        extent[axis] = counts[axis].unwrap_or(0.0) * sizes[axis].unwrap_or(0.0);
    }
    Ok(extent)
}

fn parse_value(value: &str, line: usize, key: &str) -> Result<f64, Error> {
    let token = value.split_whitespace().next().ok_or_else(|| {
        Error::parse(Format::SystemConfig, line, format!("{key} has no value"))
    })?;
    token.parse::<f64>().map_err(|_| {
        Error::parse(
            Format::SystemConfig,
            line,
            format!("{key} value '{token}' is not numeric"),
        )
    })
}
