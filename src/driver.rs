//! Input loop
//!
//! Reads newline-delimited commands until end of input, feeding each into a
//! [`BatchProcessor`], then terminates the processor. Lines are taken as raw
//! bytes; invalid UTF-8 is replaced rather than rejected.

use std::borrow::Cow;
use std::io::BufRead;

use tracing::{trace, warn};

use crate::BulkError;
use crate::clock::Clock;
use crate::processor::{BatchProcessor, RunSummary};

/// Feed every line of `reader` into `processor` and finish the run
///
/// # Errors
///
/// Returns `BulkError::IoError` if reading the input stream fails. The
/// processor is still terminated first, so a pending batch outside any
/// dynamic block is delivered before the error is returned. A partially read
/// line is discarded.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use bulk::{BatchProcessor, ConsoleSink, driver};
///
/// let mut console = ConsoleSink::with_writer(Vec::new());
/// let mut processor = BatchProcessor::new(NonZeroUsize::new(3).unwrap());
/// processor.subscribe(&mut console);
///
/// let input = "cmd1\ncmd2\n{\ncmd3\ncmd4\n}\n";
/// driver::run(input.as_bytes(), processor).unwrap();
///
/// assert_eq!(console.into_inner(), b"bulk: cmd1, cmd2\nbulk: cmd3, cmd4\n");
/// ```
pub fn run<R: BufRead, C: Clock>(
    mut reader: R,
    mut processor: BatchProcessor<'_, C>,
) -> Result<RunSummary, BulkError> {
    let mut buf = Vec::new();
    let mut number = 0usize;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                number += 1;
                let line = decode_line(&buf);
                trace!(line = number, text = %line, "read");
                processor.on_line(&line);
            }
            Err(e) => {
                warn!(line = number + 1, error = %e, "input stream failed");
                processor.terminate();
                return Err(e.into());
            }
        }
    }
    Ok(processor.terminate())
}

/// Strip the `\n` or `\r\n` terminator and decode, replacing invalid UTF-8
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = match raw.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => raw,
    };
    String::from_utf8_lossy(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSink, size};
    use std::io::{self, Read};

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stdin closed"))
        }
    }

    #[test]
    fn test_run_handles_missing_final_newline() {
        let mut sink = RecordingSink::new();
        let mut processor = BatchProcessor::new(size(3));
        processor.subscribe(&mut sink);

        let summary = run("cmd1\ncmd2".as_bytes(), processor).unwrap();

        assert_eq!(summary.batches, 1);
        assert_eq!(
            sink.batches(),
            vec![vec!["cmd1".to_string(), "cmd2".to_string()]]
        );
    }

    #[test]
    fn test_run_strips_crlf() {
        let mut sink = RecordingSink::new();
        let mut processor = BatchProcessor::new(size(2));
        processor.subscribe(&mut sink);

        run("a\r\nb\r\n".as_bytes(), processor).unwrap();

        assert_eq!(sink.batches(), vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_run_keeps_empty_lines_as_commands() {
        let mut sink = RecordingSink::new();
        let mut processor = BatchProcessor::new(size(2));
        processor.subscribe(&mut sink);

        run("\n\n".as_bytes(), processor).unwrap();

        assert_eq!(sink.batches(), vec![vec![String::new(), String::new()]]);
    }

    #[test]
    fn test_run_accepts_invalid_utf8_lines() {
        let mut sink = RecordingSink::new();
        let mut processor = BatchProcessor::new(size(3));
        processor.subscribe(&mut sink);

        let summary = run(&b"cmd1\ncaf\xe9\ncmd3\ncmd4\n"[..], processor).unwrap();

        assert_eq!(summary.batches, 2);
        assert_eq!(
            sink.batches(),
            vec![
                vec![
                    "cmd1".to_string(),
                    "caf\u{FFFD}".to_string(),
                    "cmd3".to_string()
                ],
                vec!["cmd4".to_string()],
            ]
        );
    }

    #[test]
    fn test_run_flushes_pending_batch_on_read_error() {
        let mut sink = RecordingSink::new();
        let mut processor = BatchProcessor::new(size(3));
        processor.subscribe(&mut sink);

        let reader = io::BufReader::new((&b"cmd1\ncmd2\n"[..]).chain(BrokenReader));
        let err = run(reader, processor).unwrap_err();

        assert!(matches!(err, BulkError::IoError(_)));
        assert_eq!(
            sink.batches(),
            vec![vec!["cmd1".to_string(), "cmd2".to_string()]]
        );
    }

    #[test]
    fn test_decode_line_strips_terminators() {
        assert_eq!(decode_line(b"a\r\n"), "a");
        assert_eq!(decode_line(b"a\n"), "a");
        assert_eq!(decode_line(b"a\r"), "a\r");
        assert_eq!(decode_line(b"a\rb"), "a\rb");
        assert_eq!(decode_line(b"\xff"), "\u{FFFD}");
    }

    #[test]
    fn test_run_propagates_read_error() {
        let processor = BatchProcessor::new(size(3));
        let err = run(io::BufReader::new(BrokenReader), processor).unwrap_err();

        assert!(matches!(err, BulkError::IoError(_)));
    }
}
