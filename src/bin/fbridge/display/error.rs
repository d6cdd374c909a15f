use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        let first_line = cause.to_string();
        let first_line = first_line.lines().next().unwrap_or_default();
        for line in wrap(first_line, 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");

    if let Some(output) = engine_output(err).filter(|o| !o.trim().is_empty()) {
        let _ = writeln!(stderr);
        let _ = writeln!(stderr, "   Captured engine output (last lines):");
        let lines: Vec<&str> = output.lines().collect();
        for line in &lines[lines.len().saturating_sub(15)..] {
            let _ = writeln!(stderr, "   │ {}", line);
        }
    }
    let _ = writeln!(stderr);
}

fn find<T: std::error::Error + 'static>(err: &Error) -> Option<&T> {
    err.chain().find_map(|cause| cause.downcast_ref::<T>())
}

fn engine_output(err: &Error) -> Option<&str> {
    find::<filament_bridge::engine::Error>(err).and_then(|e| e.output())
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_engine_hints(err);
        collector.collect_codec_hints(err);
        collector.collect_coupling_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_codec_hints(&mut self, err: &Error) {
        use filament_bridge::io::Format;
        use filament_bridge::io::error::Error as CodecError;

        let Some(codec_err) = find::<CodecError>(err) else {
            return;
        };

        self.mark_typed();

        match codec_err {
            CodecError::Io { source } => self.collect_std_io_hints(source),

            CodecError::Parse { format, line, .. } => {
                self.add(format!("Parser stopped near line {line} of the {format}"));
                match format {
                    Format::Snapshot => {
                        self.add("FILAMENT headers need 6 fields: FILAMENT id type length delta_l delta_r");
                        self.add("Each header must be followed by a line of 3*N coordinates");
                    }
                    Format::Filament => {
                        self.add("Listing lines read: FILAMENT <type> x1 y1 z1 x2 y2 z2 ...");
                    }
                    Format::SystemConfig => {
                        self.add("Geometry keys (NX, COMPARTMENTSIZEX, ...) must have numeric values");
                    }
                }
            }

            CodecError::UnknownTypeIndex { index, .. } => {
                self.add(format!("Type index {index} was never written by this run"));
                self.add("Pass every type name with --type in listing order, or use type_encoding = \"name\"");
            }

            CodecError::UnmappableFiberId { submitted, decoded, .. } => {
                self.add(format!("{submitted} fibers were submitted but {decoded} came back"));
                self.add("The engine split, merged or reordered filaments; ids cannot be mapped back");
                self.add("Disable severing/branching reactions in the engine chemistry");
            }
        }
    }

    fn collect_engine_hints(&mut self, err: &Error) {
        use filament_bridge::engine::Error as EngineError;

        let Some(engine_err) = find::<EngineError>(err) else {
            return;
        };

        self.mark_typed();

        match engine_err {
            EngineError::Invocation { .. } => {
                self.add("The fiber engine did not complete; see its captured output below");
                self.add("Check fiber_engine.executable and the rendered system file in the input directory");
                self.add("An empty fiber_engine.success_marker disables the completion check");
            }
            EngineError::Timeout { after, .. } => {
                self.add(format!("The fiber engine was stopped after {after:?}"));
                self.add("Raise fiber_engine.timeout_secs or shorten fiber_engine.time_step");
                self.add("The coupled state was left unchanged; the run can be resumed");
            }
            EngineError::Io { source, .. } => self.collect_std_io_hints(source),
            EngineError::Template(_) => {
                self.add("The system template uses a placeholder the adapter does not provide");
                self.add("Available: fiber_file, num_fiber_types, timestep, snapshot_time, compartment_size, n_compartments_x/y/z");
            }
            EngineError::MissingBoxExtent => {
                self.add("Set fiber_engine.box_extent in the configuration or pass --extent X,Y,Z");
            }
            EngineError::Codec(_) | EngineError::Particle(_) => {}
        }
    }

    fn collect_coupling_hints(&mut self, err: &Error) {
        use filament_bridge::{CouplingError, TranslateError};

        if let Some(translate_err) = find::<TranslateError>(err) {
            self.mark_typed();
            match translate_err {
                TranslateError::UnknownParticle { .. } => {
                    self.add("The particle engine returned a topology with a dangling particle id");
                }
                TranslateError::InvalidSpacing(_) => {
                    self.add("Set translator.monomer_spacing to a positive length");
                }
            }
        }

        let Some(coupling_err) = find::<CouplingError>(err) else {
            return;
        };
        self.mark_typed();
        match coupling_err {
            CouplingError::Config(_) => {
                self.add("The configuration file has invalid TOML or a mistyped value");
                self.add("Sections: [alternator], [fiber_engine], [translator], [particle_engine]");
            }
            CouplingError::InvalidConfig(_) => {
                self.add("Adjust the named value; periods, time steps and spacing must be positive");
            }
            CouplingError::Engine(_) | CouplingError::Translate(_) => {}
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File, directory or executable not found");
                self.add("Check the path spelling and ensure it exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied");
                self.add("Check permissions with `ls -la`; the engine executable must be executable");
            }

            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file encountered");
                self.add("The file may be truncated or incomplete");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.add("Provide an input file or pipe data to stdin");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
