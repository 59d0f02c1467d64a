use std::future::Future;
use std::time::Duration;

use crate::error::{timeout_error, Error};

/// Bounds a remote call; an elapsed deadline becomes a timeout error.
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| timeout_error())?
}

#[tokio::test]
async fn elapsed_call_becomes_timeout_error() {
    let result = with_timeout(
        Duration::from_millis(10),
        std::future::pending::<Result<(), Error>>(),
    )
    .await;
    assert_eq!(result.unwrap_err().code, 6);

    let result = with_timeout(Duration::from_millis(10), async { Ok::<u8, Error>(7) }).await;
    assert_eq!(result.unwrap(), 7);
}
