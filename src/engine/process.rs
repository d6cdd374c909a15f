use super::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the external fiber engine once.
///
/// Returns the captured process output. Implementations report abnormal
/// termination and a missing completion marker as [`Error::Invocation`].
pub trait Invoker {
    fn invoke(
        &mut self,
        input_directory: &Path,
        output_directory: &Path,
        system_file: &str,
    ) -> Result<String, Error>;
}

/// Spawns the engine executable as `<exe> -s <system> -i <input> -o <output>`.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    executable: PathBuf,
    success_marker: String,
    timeout: Option<Duration>,
}

impl ProcessInvoker {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            success_marker: String::new(),
            timeout: None,
        }
    }

    pub fn with_success_marker(mut self, marker: impl Into<String>) -> Self {
        self.success_marker = marker.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn wait(&self, child: &mut Child) -> Result<Option<std::process::ExitStatus>, Error> {
        let Some(limit) = self.timeout else {
            return child
                .wait()
                .map(Some)
                .map_err(|e| Error::io(&self.executable, e));
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| Error::io(&self.executable, e))?
            {
                return Ok(Some(status));
            }
            if started.elapsed() >= limit {
                // The child may exit between the poll and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Invoker for ProcessInvoker {
    fn invoke(
        &mut self,
        input_directory: &Path,
        output_directory: &Path,
        system_file: &str,
    ) -> Result<String, Error> {
        let system_path = input_directory.join(system_file);
        info!(
            executable = %self.executable.display(),
            system = %system_path.display(),
            "invoking fiber engine"
        );

        let mut child = Command::new(&self.executable)
            .arg("-s")
            .arg(&system_path)
            .arg("-i")
            .arg(input_directory)
            .arg("-o")
            .arg(output_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::io(&self.executable, e))?;

        let stdout = capture(child.stdout.take());
        let stderr = capture(child.stderr.take());
        let status = self.wait(&mut child)?;

        let mut output = stdout.join().unwrap_or_default();
        let errors = stderr.join().unwrap_or_default();
        if !errors.is_empty() {
            output.push_str(&errors);
        }
        debug!(output = %output, "fiber engine output");

        let Some(status) = status else {
            return Err(Error::Timeout {
                after: self.timeout.unwrap_or_default(),
                output,
            });
        };
        let completed = self.success_marker.is_empty() || output.contains(&self.success_marker);
        if !status.success() || !completed {
            return Err(Error::Invocation {
                status: Some(status),
                output,
            });
        }
        Ok(output)
    }
}

fn capture<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            let mut bytes = Vec::new();
            if pipe.read_to_end(&mut bytes).is_ok() {
                text = String::from_utf8_lossy(&bytes).into_owned();
            }
        }
        text
    })
}
