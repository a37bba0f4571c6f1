//! JSON output adapter.

use anyhow::Result;
use lens_qa_core::{AnalysisResult, ResultOutput};
use std::io::{self, Write};
use std::sync::Mutex;

use crate::commands::check::OutputFormat;

/// JSON / JSON Lines output adapter.
///
/// In JSON Lines mode every result is written immediately. In JSON mode
/// results are buffered and written as one array on `flush`.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
    pretty: bool,
    pending: Mutex<Vec<AnalysisResult>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), format, pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
            pretty,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn write_line(&self, json: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, result: &AnalysisResult) -> Result<()> {
        match self.format {
            OutputFormat::Jsonl => self.write_line(&serde_json::to_string(result)?),
            OutputFormat::Json => {
                self.pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                    .push(result.clone());
                Ok(())
            }
        }
    }

    fn flush(&self) -> Result<()> {
        if self.format == OutputFormat::Json {
            let results = std::mem::take(
                &mut *self
                    .pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if self.pretty {
                serde_json::to_string_pretty(&results)?
            } else {
                serde_json::to_string(&results)?
            };
            self.write_line(&json)?;
        }

        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lens_qa_core::ImageDimensions;
    use std::sync::Arc;

    /// Writer that shares its buffer with the test.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn result(path: &str) -> AnalysisResult {
        AnalysisResult {
            path: path.into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            dimensions: ImageDimensions::new(10, 10),
            score: Some(0.25),
            is_dirty: false,
            issues: vec![],
        }
    }

    #[test]
    fn test_jsonl_writes_immediately() {
        let buf = SharedBuf::default();
        let output = JsonOutput::new(Box::new(buf.clone()), OutputFormat::Jsonl, false);

        output.write(&result("a.png")).unwrap();
        output.write(&result("b.png")).unwrap();

        let text = buf.contents();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["path"], "a.png");
        assert_eq!(first["is_dirty"], false);
    }

    #[test]
    fn test_json_buffers_until_flush() {
        let buf = SharedBuf::default();
        let output = JsonOutput::new(Box::new(buf.clone()), OutputFormat::Json, false);

        output.write(&result("a.png")).unwrap();
        assert!(buf.contents().is_empty());

        output.flush().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(buf.contents().trim()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_json_empty_batch_is_empty_array() {
        let buf = SharedBuf::default();
        let output = JsonOutput::new(Box::new(buf.clone()), OutputFormat::Json, true);
        output.flush().unwrap();
        assert_eq!(buf.contents().trim(), "[]");
    }
}
