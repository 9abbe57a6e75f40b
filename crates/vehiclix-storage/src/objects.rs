use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

/// Raw bytes of a stored object and the ETag they were read at.
pub struct StoredObject {
    pub body: Vec<u8>,
    pub etag: String,
}

/// Precondition attached to a conditional PUT.
#[derive(Debug, Clone, Copy)]
pub enum WriteCondition<'a> {
    /// `If-None-Match: *`, the key must not exist yet.
    Absent,
    /// `If-Match: <etag>`, the object must be unchanged since it was read.
    Matches(&'a str),
}

pub async fn get_object(client: &Client, bucket: &str, key: &str) -> Result<StoredObject, StorageError> {
    let resp = match client.get_object().bucket(bucket).key(key).send().await {
        Ok(resp) => resp,
        Err(e) => {
            let err = e.into_service_error();
            return Err(if err.is_no_such_key() {
                StorageError::NotFound { key: key.to_string() }
            } else {
                StorageError::GetObject(err.to_string())
            });
        }
    };

    let etag = resp.e_tag().unwrap_or_default().to_string();
    let data = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?;

    Ok(StoredObject {
        body: data.into_bytes().to_vec(),
        etag,
    })
}

/// Whether `key` exists, via a HEAD request.
pub async fn object_exists(client: &Client, bucket: &str, key: &str) -> Result<bool, StorageError> {
    match client.head_object().bucket(bucket).key(key).send().await {
        Ok(_) => Ok(true),
        Err(e) => {
            let err = e.into_service_error();
            if err.is_not_found() {
                Ok(false)
            } else {
                Err(StorageError::GetObject(err.to_string()))
            }
        }
    }
}

/// Conditional JSON PUT. Returns the new ETag, or `PreconditionFailed` when
/// the condition does not hold.
pub async fn put_json(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    condition: WriteCondition<'_>,
) -> Result<String, StorageError> {
    let req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type("application/json")
        .body(ByteStream::from(body));

    let req = match condition {
        WriteCondition::Absent => req.if_none_match("*"),
        WriteCondition::Matches(etag) => req.if_match(etag),
    };

    match req.send().await {
        Ok(resp) => Ok(resp.e_tag().unwrap_or_default().to_string()),
        Err(e) => {
            let message = e.into_service_error().to_string();
            // 412 when the condition fails, 409 while a competing
            // conditional write is still in flight.
            if message.contains("PreconditionFailed") || message.contains("ConditionalRequestConflict") {
                Err(StorageError::PreconditionFailed { key: key.to_string() })
            } else {
                Err(StorageError::PutObject(message))
            }
        }
    }
}

pub async fn delete_object(client: &Client, bucket: &str, key: &str) -> Result<(), StorageError> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| StorageError::DeleteObject(e.into_service_error().to_string()))?;
    Ok(())
}

/// Every key under `prefix`, following continuation pages.
pub async fn list_keys(client: &Client, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
    let mut pages = client
        .list_objects_v2()
        .bucket(bucket)
        .prefix(prefix)
        .into_paginator()
        .send();

    let mut keys = Vec::new();
    while let Some(page) = pages.next().await {
        let page = page.map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;
        keys.extend(page.contents().iter().filter_map(|obj| obj.key().map(str::to_string)));
    }
    Ok(keys)
}
