use axum::body::{Body, Bytes};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bson::{Bson, Document};
use futures::{stream, Stream, StreamExt};

/// Couple a store cursor to the outbound response.
///
/// Emits `{"count":N,"data":[` immediately, then one chunk per document
/// as the cursor yields it, then `]}`. Documents are never collected into
/// an in-memory vector; backpressure from a slow client suspends cursor
/// polling, and a client disconnect drops the stream, which drops the
/// cursor and releases it server-side. A cursor error mid-stream aborts
/// the response body; the 200 status has already been sent at that point.
pub fn stream_list<S>(count: u64, documents: S) -> Response
where
    S: Stream<Item = Result<Document, mongodb::error::Error>> + Send + 'static,
{
    let head = stream::once(async move {
        Ok(Bytes::from(format!("{{\"count\":{count},\"data\":[")))
    });
    let mut first = true;
    let body = documents.map(move |item| {
        item.map(|doc| {
            let rendered = Bson::Document(doc).into_relaxed_extjson().to_string();
            if first {
                first = false;
                Bytes::from(rendered)
            } else {
                Bytes::from(format!(",{rendered}"))
            }
        })
    });
    let tail = stream::once(async { Ok(Bytes::from("]}")) });

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(head.chain(body).chain(tail)),
    )
        .into_response()
}
