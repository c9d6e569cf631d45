//! Tesseract command-line backend
//!
//! Writes the region to a temporary PNG and runs
//! `tesseract <png> stdout -l <lang> [--psm N]`. The process is watched
//! while it runs and killed once the request is cancelled.

use image::{ImageFormat, RgbaImage};
use std::ffi::OsString;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::OcrSettings;
use crate::vision::{CancelToken, OcrCapability, OcrError};

/// How often a running tesseract process is checked
const PROCESS_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Tesseract OCR via its CLI
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    /// Executable name or full path
    command: PathBuf,
    /// Language pack(s), e.g. "eng" or "eng+deu"
    language: String,
    /// Page segmentation mode, tesseract's default when unset
    psm: Option<u32>,
}

impl TesseractOcr {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
            psm: None,
        }
    }

    /// Build from the `[ocr]` config section
    pub fn from_settings(settings: &OcrSettings) -> Self {
        Self::new(&settings.command, &settings.language).with_psm(settings.page_segmentation_mode)
    }

    pub fn with_psm(mut self, psm: Option<u32>) -> Self {
        self.psm = psm;
        self
    }

    /// Arguments passed to tesseract for the given input file
    fn args(&self, input: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            input.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.language.clone().into(),
        ];
        if let Some(psm) = self.psm {
            args.push("--psm".into());
            args.push(psm.to_string().into());
        }
        args
    }

    /// Wait for the process to exit, killing it if `cancel` is set first
    fn supervise(&self, child: &mut Child, cancel: &CancelToken) -> Result<ExitStatus, OcrError> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if cancel.is_cancelled() {
                if let Err(e) = child.kill() {
                    warn!("Failed to kill {:?} (pid {}): {}", self.command, child.id(), e);
                }
                // Reap it so no zombie is left behind
                child.wait()?;
                debug!("Killed {:?} (pid {}) after cancellation", self.command, child.id());
                return Err(OcrError::Cancelled);
            }
            std::thread::sleep(PROCESS_POLL_INTERVAL);
        }
    }
}

impl OcrCapability for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, region: &RgbaImage, cancel: &CancelToken) -> Result<String, OcrError> {
        let input = tempfile::Builder::new()
            .prefix("imgview-ocr-")
            .suffix(".png")
            .tempfile()?;
        region.save_with_format(input.path(), ImageFormat::Png)?;

        debug!(
            "Running {:?} on {}x{} region",
            self.command,
            region.width(),
            region.height()
        );

        // Output goes to files so a chatty process never blocks on a full pipe
        let mut stdout = tempfile::tempfile()?;
        let mut stderr = tempfile::tempfile()?;

        let mut child = Command::new(&self.command)
            .args(self.args(input.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout.try_clone()?))
            .stderr(Stdio::from(stderr.try_clone()?))
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    OcrError::EngineNotFound(format!("{} (is tesseract installed?)", self.command.display()))
                }
                _ => OcrError::Io(e),
            })?;

        let status = self.supervise(&mut child, cancel)?;

        if !status.success() {
            let stderr = read_all(&mut stderr)?;
            warn!("tesseract exited with {}: {}", status, stderr.trim());
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        Ok(clean_output(&read_all(&mut stdout)?))
    }
}

/// Read a captured output file from the start, decoding lossily
fn read_all(file: &mut File) -> Result<String, OcrError> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Drop the form feed tesseract emits as a page separator
fn clean_output(stdout: &str) -> String {
    stdout.trim_end_matches('\u{c}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_args_without_psm() {
        let ocr = TesseractOcr::new("tesseract", "eng");
        let args = ocr.args(Path::new("/tmp/in.png"));
        assert_eq!(args, vec!["/tmp/in.png", "stdout", "-l", "eng"]);
    }

    #[test]
    fn test_args_with_psm() {
        let ocr = TesseractOcr::new("tesseract", "eng+deu").with_psm(Some(7));
        let args = ocr.args(Path::new("in.png"));
        assert_eq!(args, vec!["in.png", "stdout", "-l", "eng+deu", "--psm", "7"]);
    }

    #[test]
    fn test_from_settings() {
        let settings = OcrSettings {
            command: PathBuf::from("/opt/tesseract/bin/tesseract"),
            language: "fra".to_string(),
            page_segmentation_mode: Some(6),
            ..Default::default()
        };
        let ocr = TesseractOcr::from_settings(&settings);
        assert_eq!(ocr.command, PathBuf::from("/opt/tesseract/bin/tesseract"));
        assert_eq!(ocr.args(Path::new("x.png"))[3], "fra");
    }

    #[test]
    fn test_clean_output() {
        assert_eq!(clean_output("26.10.24\n\u{c}"), "26.10.24\n");
        assert_eq!(clean_output("plain"), "plain");
    }

    #[test]
    fn test_missing_binary_is_engine_not_found() {
        let ocr = TesseractOcr::new("/nonexistent/bin/tesseract-ocr", "eng");
        let result = ocr.recognize(&RgbaImage::new(4, 4), &CancelToken::new());
        assert!(matches!(result, Err(OcrError::EngineNotFound(_))));
    }

    #[cfg(unix)]
    mod fake_engine {
        use super::*;
        use crate::error::ViewerError;
        use crate::vision::{OcrPoll, OcrWorker};
        use std::os::unix::fs::PermissionsExt;
        use std::sync::Arc;

        /// Write an executable shell script standing in for tesseract
        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn is_alive(pid: &str) -> bool {
            Command::new("kill")
                .args(["-0", pid])
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false)
        }

        fn read_pid(path: &Path) -> String {
            let started = Instant::now();
            loop {
                if let Ok(pid) = std::fs::read_to_string(path) {
                    let pid = pid.trim().to_string();
                    if !pid.is_empty() {
                        return pid;
                    }
                }
                assert!(started.elapsed() < Duration::from_secs(5), "engine never started");
                std::thread::sleep(Duration::from_millis(10));
            }
        }

        #[test]
        fn test_reads_stdout_and_strips_form_feed() {
            let dir = tempfile::tempdir().unwrap();
            let engine = script(dir.path(), "tesseract", "printf '26.10.24\\n\\f'");
            let ocr = TesseractOcr::new(engine, "eng");

            let text = ocr.recognize(&RgbaImage::new(4, 4), &CancelToken::new()).unwrap();
            assert_eq!(text, "26.10.24\n");
        }

        #[test]
        fn test_failing_exit_reports_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let engine = script(dir.path(), "tesseract", "echo 'no language pack' >&2; exit 1");
            let ocr = TesseractOcr::new(engine, "xyz");

            match ocr.recognize(&RgbaImage::new(4, 4), &CancelToken::new()) {
                Err(OcrError::Recognition(message)) => assert!(message.contains("no language pack")),
                other => panic!("unexpected {other:?}"),
            }
        }

        #[test]
        fn test_cancel_kills_process() {
            let dir = tempfile::tempdir().unwrap();
            let engine = script(dir.path(), "tesseract", "exec sleep 30");
            let ocr = TesseractOcr::new(engine, "eng");
            let cancel = CancelToken::new();

            let thread_cancel = cancel.clone();
            let handle = std::thread::spawn(move || {
                let started = Instant::now();
                let result = ocr.recognize(&RgbaImage::new(4, 4), &thread_cancel);
                (result, started.elapsed())
            });

            std::thread::sleep(Duration::from_millis(200));
            cancel.cancel();

            let (result, elapsed) = handle.join().unwrap();
            assert!(matches!(result, Err(OcrError::Cancelled)));
            assert!(elapsed < Duration::from_secs(10), "waited {elapsed:?}");
        }

        #[test]
        fn test_worker_timeout_kills_hung_engine() {
            let dir = tempfile::tempdir().unwrap();
            let pid_file = dir.path().join("pid");
            let engine = script(
                dir.path(),
                "tesseract",
                &format!("echo $$ > '{}'\nexec sleep 30", pid_file.display()),
            );
            let mut worker = OcrWorker::new(
                Arc::new(TesseractOcr::new(engine, "eng")),
                Duration::from_millis(500),
            );

            worker.submit(RgbaImage::new(4, 4));
            let pid = read_pid(&pid_file);
            assert!(matches!(
                worker.wait(),
                OcrPoll::Finished(Err(ViewerError::OcrTimeout(_)))
            ));

            let started = Instant::now();
            while is_alive(&pid) {
                assert!(
                    started.elapsed() < Duration::from_secs(5),
                    "engine process {pid} still alive after timeout"
                );
                std::thread::sleep(Duration::from_millis(20));
            }
        }
    }
}
