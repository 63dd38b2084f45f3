use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use modelgen_core::Generator;

use crate::errors::{PipelineError, SinkError};

/// A writable destination that must be released exactly once per run.
pub trait Sink: Write {
    /// Flush and close. Calling it again is a no-op.
    fn release(&mut self) -> io::Result<()>;
}

/// Generated text destination: a file (created or truncated) or stdout.
#[derive(Debug)]
pub enum OutputSink {
    File {
        path: PathBuf,
        writer: Option<BufWriter<File>>,
    },
    Stdout(Option<Stdout>),
}

impl OutputSink {
    pub fn acquire(path: Option<&Path>) -> Result<Self, SinkError> {
        match path {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|source| SinkError::Open {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Ok(OutputSink::File {
                    path: path.to_path_buf(),
                    writer: Some(BufWriter::new(file)),
                })
            }
            None => Ok(OutputSink::Stdout(Some(io::stdout()))),
        }
    }

    /// Path of the output file, `None` for stdout.
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputSink::File { path, .. } => Some(path),
            OutputSink::Stdout(_) => None,
        }
    }

    pub fn is_released(&self) -> bool {
        match self {
            OutputSink::File { writer, .. } => writer.is_none(),
            OutputSink::Stdout(out) => out.is_none(),
        }
    }

    fn writer(&mut self) -> io::Result<&mut dyn Write> {
        let writer: Option<&mut dyn Write> = match self {
            OutputSink::File { writer, .. } => writer.as_mut().map(|w| w as &mut dyn Write),
            OutputSink::Stdout(out) => out.as_mut().map(|w| w as &mut dyn Write),
        };
        writer.ok_or_else(|| io::Error::other("output sink already released"))
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Sink for OutputSink {
    fn release(&mut self) -> io::Result<()> {
        match self {
            OutputSink::File { writer, .. } => match writer.take() {
                Some(writer) => {
                    let file = writer.into_inner().map_err(|err| err.into_error())?;
                    file.sync_all()
                }
                None => Ok(()),
            },
            OutputSink::Stdout(out) => match out.take() {
                Some(mut out) => out.flush(),
                None => Ok(()),
            },
        }
    }
}

impl Drop for OutputSink {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::warn!(event = "sink_release_failed", error = %err);
        }
    }
}

/// Generate, write and release. The sink is released on every path; the
/// first error wins.
pub fn emit<S: Sink + ?Sized>(
    generator: &dyn Generator,
    sink: &mut S,
) -> Result<usize, PipelineError> {
    emit_with(generator, sink, |_| {})
}

/// [`emit`] with a hook invoked between generation and writing.
pub fn emit_with<S, F>(
    generator: &dyn Generator,
    sink: &mut S,
    on_generated: F,
) -> Result<usize, PipelineError>
where
    S: Sink + ?Sized,
    F: FnOnce(usize),
{
    let written = generator
        .generate()
        .map_err(PipelineError::from)
        .and_then(|text| {
            on_generated(text.len());
            sink.write_all(text.as_bytes())
                .map(|()| text.len())
                .map_err(|err| SinkError::Write(err).into())
        });

    let released = sink.release();
    match (written, released) {
        (Ok(bytes), Ok(())) => Ok(bytes),
        (Ok(_), Err(err)) => Err(SinkError::Release(err).into()),
        (Err(err), released) => {
            if let Err(release_err) = released {
                tracing::warn!(event = "sink_release_failed", error = %release_err);
            }
            Err(err)
        }
    }
}
