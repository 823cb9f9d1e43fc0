// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Channel host: newline-delimited JSON in, newline-delimited JSON out.
//
//   in:  {"id": 7, "method": "getExifTimestamps", "arguments": {"filePath": "/x.jpg"}}
//   out: {"id": 7, "status": "success", "value": {...}}
//
// The loop below is the foreground: it reads requests and delivers
// completions, so every reply callback (and therefore every write to the
// output) happens on the thread running `serve`.

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, warn};

use imagesorter_channel::{CompletionQueue, Dispatcher};
use imagesorter_core::types::{ErrorCode, MethodCall, Response};

/// Output sink shared with the reply callbacks.
pub type SharedOutput<W> = Arc<Mutex<W>>;

/// One output line.
#[derive(Debug, Serialize)]
struct ResponseLine {
    id: Value,
    #[serde(flatten)]
    response: Response,
}

/// Serve requests from `input` until it ends, then wait for every accepted
/// request to answer. Returns the number of request lines handled.
pub async fn serve<R, W>(
    dispatcher: Dispatcher,
    mut queue: CompletionQueue,
    input: R,
    output: SharedOutput<W>,
) -> usize
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    let mut lines = input.lines();
    let mut handled = 0;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    handle_line(&dispatcher, &line, &output);
                    handled += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "failed to read request stream");
                    break;
                }
            },
            Some(completion) = queue.next() => completion.deliver(),
        }
    }

    debug!(handled, "input closed, draining outstanding requests");
    drop(dispatcher);
    queue.drain().await;
    handled
}

fn handle_line<W>(dispatcher: &Dispatcher, line: &str, output: &SharedOutput<W>)
where
    W: Write + Send + 'static,
{
    let mut envelope = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(envelope)) => envelope,
        Ok(_) => return reject(output, Value::Null, "expected a JSON object"),
        Err(e) => return reject(output, Value::Null, &e.to_string()),
    };
    let id = envelope.remove("id").unwrap_or(Value::Null);

    match serde_json::from_value::<MethodCall>(Value::Object(envelope)) {
        Ok(call) => {
            let output = Arc::clone(output);
            dispatcher.invoke(call, move |response| write_response(&output, id, response));
        }
        Err(e) => reject(output, id, &e.to_string()),
    }
}

/// Answer a line that never reached the dispatcher.
fn reject<W: Write>(output: &SharedOutput<W>, id: Value, detail: &str) {
    warn!(%id, error = detail, "malformed request line");
    write_response(
        output,
        id,
        Response::error(ErrorCode::InvalidArguments, format!("malformed request: {detail}")),
    );
}

fn write_response<W: Write>(output: &SharedOutput<W>, id: Value, response: Response) {
    let line = match serde_json::to_string(&ResponseLine { id, response }) {
        Ok(line) => line,
        Err(e) => {
            error!(error = %e, "failed to encode response");
            return;
        }
    };
    let Ok(mut out) = output.lock() else {
        error!("output lock poisoned, response dropped");
        return;
    };
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        error!(error = %e, "failed to write response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagesorter_core::BridgeConfig;
    use serde_json::json;
    use std::collections::HashMap;

    async fn run(input: String) -> Vec<Value> {
        let config = BridgeConfig {
            scan_after_exif_write: false,
            ..BridgeConfig::default()
        };
        let (dispatcher, queue) = Dispatcher::new(
            imagesorter_bridge::platform_bridge(),
            &config,
            tokio::runtime::Handle::current(),
        );
        let output: SharedOutput<Vec<u8>> = Arc::new(Mutex::new(Vec::new()));

        serve(dispatcher, queue, input.as_bytes(), Arc::clone(&output)).await;

        let bytes = output.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn by_id(lines: Vec<Value>) -> HashMap<String, Value> {
        let mut map = HashMap::new();
        for line in lines {
            let id = line["id"].to_string();
            assert!(map.insert(id, line).is_none(), "duplicate response");
        }
        map
    }

    #[tokio::test]
    async fn every_request_gets_exactly_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("photo.jpg");
        std::fs::write(&file, b"bytes").unwrap();
        let path = file.to_string_lossy();

        let input = [
            json!({"id": 1, "method": "getFileSystemTimestamps", "arguments": {"filePath": path}}),
            json!({"id": 2, "method": "getExifTimestamps", "arguments": {"filePath": path}}),
            json!({"id": 3, "method": "triggerMediaScan", "arguments": {"filePath": "/nonexistent"}}),
            json!({"id": 4, "method": "setLastModifiedTime", "arguments": {"filePath": path}}),
            json!({"id": 5, "method": "rename"}),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        let responses = by_id(run(input).await);
        assert_eq!(responses.len(), 5);

        assert_eq!(responses["1"]["status"], "success");
        assert!(responses["1"]["value"]["modified"].is_i64());
        assert_eq!(
            responses["2"]["value"],
            json!({"dateTime": null, "dateTimeOriginal": null, "dateTimeDigitized": null})
        );
        assert_eq!(responses["3"]["value"], json!(false));
        assert_eq!(responses["4"]["code"], "INVALID_ARGUMENTS");
        assert_eq!(responses["5"]["status"], "notImplemented");
    }

    #[tokio::test]
    async fn malformed_lines_answer_with_null_id() {
        let lines = run("not json\n\n".to_owned()).await;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["id"], Value::Null);
        assert_eq!(lines[0]["code"], "INVALID_ARGUMENTS");
    }

    #[tokio::test]
    async fn bad_fields_keep_the_request_id() {
        let input = [
            json!({"id": "a", "method": 42}),
            json!({"id": 9, "arguments": {"filePath": "/x.jpg"}}),
            json!(["not", "an", "object"]),
        ]
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join("\n");

        let responses = by_id(run(input).await);
        assert_eq!(responses.len(), 3);
        for id in ["\"a\"", "9", "null"] {
            assert_eq!(responses[id]["code"], "INVALID_ARGUMENTS", "{id}");
        }
    }

    #[tokio::test]
    async fn empty_input_exits_cleanly() {
        assert!(run(String::new()).await.is_empty());
    }
}
