//! Bound each oracle call by a timeout; a late answer counts as "not found".

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use super::{ExistenceOracle, OracleError};

#[derive(Debug, Clone, Copy)]
enum Query {
    Exists,
    IsImage,
}

struct Request {
    query: Query,
    path: String,
    reply: mpsc::Sender<Result<bool, OracleError>>,
}

/// Forwards every call to one worker thread that owns the wrapped oracle and
/// waits at most `timeout` for its answer.
///
/// A hung backend stalls only that worker: later calls queue behind it and
/// time out in turn, so no extra threads pile up. Late answers go to a reply
/// channel nobody listens to any more. The worker exits once the
/// `TimeoutOracle` is dropped and its current lookup returns.
pub struct TimeoutOracle {
    requests: mpsc::Sender<Request>,
    timeout: Duration,
}

impl TimeoutOracle {
    pub fn new(inner: Arc<dyn ExistenceOracle>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel::<Request>();
        std::thread::spawn(move || {
            for request in rx {
                let answer = match request.query {
                    Query::Exists => inner.exists(&request.path),
                    Query::IsImage => inner.is_image(&request.path),
                };
                let _ = request.reply.send(answer);
            }
        });
        Self {
            requests: tx,
            timeout,
        }
    }

    fn bounded(&self, query: Query, path: &str) -> Result<bool, OracleError> {
        let (reply, answer) = mpsc::channel();
        let request = Request {
            query,
            path: path.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            return Err(OracleError::Unavailable("oracle worker has stopped".into()));
        }

        match answer.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(OracleError::Timeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(OracleError::Unavailable(
                "oracle worker exited without answering".into(),
            )),
        }
    }
}

impl ExistenceOracle for TimeoutOracle {
    fn exists(&self, path: &str) -> Result<bool, OracleError> {
        self.bounded(Query::Exists, path)
    }

    fn is_image(&self, path: &str) -> Result<bool, OracleError> {
        self.bounded(Query::IsImage, path)
    }
}
