// Chunked JSON streaming utilities
use crate::application::refresh::RefreshHandle;
use crate::domain::dashboard::DashboardSnapshot;
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{Response, StatusCode, header};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::StreamExt;
use futures::stream::Stream;
use serde::Serialize;
use tokio::sync::mpsc;

/// Create a chunked response of length-prefixed JSON messages
pub fn chunked_json_stream<S, T>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream =
        stream.then(move |msg| async move { serialize_chunk(&msg, compress).await });

    // Chunks are compressed individually, so no Content-Encoding on the response
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::TRANSFER_ENCODING, "chunked")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize one message as a 4-byte big-endian length followed by the payload
pub async fn serialize_chunk<T: Serialize>(
    msg: &T,
    compress: bool,
) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(msg)?;

    let payload = if compress {
        brotli_compress(&json).await?
    } else {
        json
    };

    let length = u32::try_from(payload.len())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidData, "chunk too large"))?;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Stream snapshots from a running refresh scheduler. The scheduler is
/// cancelled when the client goes away and the body is dropped, or when the
/// scheduler task itself dies.
pub fn stream_from_scheduler(
    handle: RefreshHandle,
    rx: mpsc::Receiver<DashboardSnapshot>,
    compress: bool,
) -> impl IntoResponse {
    match chunked_json_stream(scheduler_stream(handle, rx), compress) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

fn scheduler_stream(
    mut handle: RefreshHandle,
    mut rx: mpsc::Receiver<DashboardSnapshot>,
) -> impl Stream<Item = DashboardSnapshot> + Send + 'static {
    async_stream::stream! {
        while let Some(snapshot) = rx.recv().await {
            yield snapshot;
        }
        handle.cancel();
        handle.stopped().await;
    }
}
