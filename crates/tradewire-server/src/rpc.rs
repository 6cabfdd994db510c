//! Server RPC entry point.
//!
//! Reads a single JSON request from the reader, dispatches it through
//! the interceptor chain, and writes a single JSON response to the
//! writer. The transport that delivers those bytes (and sets the
//! cancellation signal) is an external collaborator; [`serve`] wires the
//! stdio variant used when the server runs as a forced command.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tradewire_contract::{CallContext, CancelToken, CallStatus, RpcRequest, RpcResponse};

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::ledger::Ledger;

/// Exit code when the call was cancelled by a shutdown signal.
pub const EXIT_CODE_CANCELLED: i32 = 80;

/// Serves one call over a reader/writer pair.
pub struct RpcHandler {
    dispatcher: Dispatcher,
}

impl RpcHandler {
    /// Create a handler around an existing binding.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Read one request, dispatch it, write one response.
    ///
    /// Parse failures produce an `INVALID_REQUEST` error response rather
    /// than an error return; `Err` is reserved for I/O failures.
    pub fn run_with_io<R: BufRead, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
        cancel: CancelToken,
    ) -> io::Result<()> {
        let request = match self.read_request(reader) {
            Ok(request) => request,
            Err(status) => {
                let response = RpcResponse::rejected(0, String::new(), status);
                return self.write_response(writer, &response);
            }
        };

        let mut ctx = CallContext::with_cancel_token(request.metadata(), cancel);
        let response = self.dispatcher.dispatch(&request, &mut ctx);
        self.write_response(writer, &response)
    }

    fn read_request<R: BufRead>(&self, reader: &mut R) -> Result<RpcRequest, CallStatus> {
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| CallStatus::invalid_request(format!("failed to read request: {}", e)))?;
        serde_json::from_str(&line)
            .map_err(|e| CallStatus::invalid_request(format!("invalid JSON: {}", e)))
    }

    fn write_response<W: Write>(&self, writer: &mut W, response: &RpcResponse) -> io::Result<()> {
        let text = serde_json::to_string(response)?;
        writeln!(writer, "{}", text)?;
        writer.flush()
    }
}

/// Run the stdio server for one call and return the process exit code.
///
/// Acquires stdin/stdout and the interrupt hook up front; both are
/// released on every exit path since nothing here outlives the function.
pub fn serve(config: &ServerConfig) -> i32 {
    let ledger = Arc::new(Ledger::from_config(config));
    let dispatcher = Dispatcher::new(ledger, config);
    let handler = RpcHandler::new(dispatcher);

    let cancel = CancelToken::new();
    let hook_token = cancel.clone();
    // A second signal keeps flipping the same flag, which is harmless.
    if let Err(e) = ctrlc::set_handler(move || hook_token.cancel()) {
        eprintln!("failed to install shutdown handler: {}", e);
        return 1;
    }

    let result = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        handler.run_with_io(&mut stdin.lock(), &mut stdout.lock(), cancel.clone())
    };

    match result {
        Ok(()) if cancel.is_cancelled() => EXIT_CODE_CANCELLED,
        Ok(()) => 0,
        Err(e) => {
            eprintln!("rpc handler error: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradewire_contract::ops::names;
    use tradewire_contract::{StatusCode, API_KEY_HEADER};

    fn handler() -> RpcHandler {
        let config = ServerConfig::default();
        let ledger = Arc::new(Ledger::from_config(&config));
        RpcHandler::new(Dispatcher::new(ledger, &config))
    }

    fn roundtrip(input: &str) -> RpcResponse {
        let mut output = Vec::new();
        handler()
            .run_with_io(&mut input.as_bytes(), &mut output, CancelToken::new())
            .unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_serves_one_call() {
        let request = RpcRequest {
            protocol_version: 1,
            op: names::GET_WALLETS.to_string(),
            request_id: "io-1".to_string(),
            metadata: vec![(API_KEY_HEADER.to_string(), "k".to_string())],
            payload: serde_json::Value::Null,
        };
        let line = format!("{}\n", serde_json::to_string(&request).unwrap());
        let response = roundtrip(&line);
        assert_eq!(response.status.code, StatusCode::Ok);
        assert_eq!(response.request_id, "io-1");
    }

    #[test]
    fn test_invalid_json_yields_error_response() {
        let response = roundtrip("this is not json\n");
        assert_eq!(response.status.code, StatusCode::InvalidRequest);
        assert!(response.payload.is_none());
    }

    #[test]
    fn test_cancelled_before_read() {
        let request = RpcRequest {
            protocol_version: 1,
            op: names::GET_WALLETS.to_string(),
            request_id: "io-2".to_string(),
            metadata: vec![(API_KEY_HEADER.to_string(), "k".to_string())],
            payload: serde_json::Value::Null,
        };
        let line = format!("{}\n", serde_json::to_string(&request).unwrap());

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut output = Vec::new();
        handler()
            .run_with_io(&mut line.as_bytes(), &mut output, cancel)
            .unwrap();
        let response: RpcResponse = serde_json::from_slice(&output).unwrap();
        assert_eq!(response.status.code, StatusCode::Cancelled);
    }
}
